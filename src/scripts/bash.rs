//! Bash dialect: double-quoted word lists fed to `compgen -W`.

use super::{function_name, value_flag_names, ScriptFlag, ScriptPath, ScriptValues};

/// Escape for a bash double-quoted string.
pub(super) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn flag_patterns(key: &str, flag: &ScriptFlag) -> String {
    std::iter::once(&flag.long)
        .chain(flag.short.iter())
        .map(|name| quote(&format!("{}|{}", key, name)))
        .collect::<Vec<_>>()
        .join("|")
}

pub(super) fn render(paths: &[ScriptPath], program: &str) -> String {
    let name = function_name(program);
    let dynamic = format!("_{}_dynamic", name);
    let mut lines = vec![
        format!("# bash completion for {}", program),
        format!(
            "# Load with: source <({} completion bash)",
            program
        ),
        String::new(),
        format!("{}() {{", dynamic),
        format!(
            "    {} __complete \"${{COMP_WORDS[@]:1:COMP_CWORD}}\" 2>/dev/null | cut -f1",
            program
        ),
        "}".to_string(),
        String::new(),
        format!("_{}_complete() {{", name),
        "    local cur prev key word words i".to_string(),
        "    COMPREPLY=()".to_string(),
        "    cur=\"${COMP_WORDS[COMP_CWORD]}\"".to_string(),
        "    prev=\"${COMP_WORDS[COMP_CWORD-1]}\"".to_string(),
        "    key=\"\"".to_string(),
        "    for ((i = 1; i < COMP_CWORD; i++)); do".to_string(),
        "        word=\"${COMP_WORDS[i]}\"".to_string(),
        "        case \"${word}\" in".to_string(),
    ];

    let value_flags = value_flag_names(paths);
    if !value_flags.is_empty() {
        lines.push(format!("            {})", value_flags.join("|")));
        lines.push("                ((i++))".to_string());
        lines.push("                ;;".to_string());
    }
    lines.extend([
        "            -*)".to_string(),
        "                ;;".to_string(),
        "            *)".to_string(),
        "                key=\"${key:+${key} }${word}\"".to_string(),
        "                ;;".to_string(),
        "        esac".to_string(),
        "    done".to_string(),
        String::new(),
        "    case \"${key}|${prev}\" in".to_string(),
    ]);

    for path in paths {
        let key = path.key();
        for flag in &path.flags {
            lines.push(format!("        {})", flag_patterns(&key, flag)));
            let reply = match &flag.values {
                ScriptValues::Fixed(values) => format!(
                    "            COMPREPLY=($(compgen -W {} -- \"${{cur}}\"))",
                    quote(&values.join(" "))
                ),
                ScriptValues::Dynamic => format!(
                    "            COMPREPLY=($(compgen -W \"$({})\" -- \"${{cur}}\"))",
                    dynamic
                ),
                ScriptValues::None => "            COMPREPLY=($(compgen -f -- \"${cur}\"))".to_string(),
            };
            lines.push(reply);
            lines.push("            return 0".to_string());
            lines.push("            ;;".to_string());
        }
    }
    lines.push("    esac".to_string());
    lines.push(String::new());
    lines.push("    case \"${key}\" in".to_string());

    for path in paths {
        let mut words: Vec<String> = path.words.iter().map(|w| w.word.clone()).collect();
        for flag in &path.flags {
            words.push(flag.long.clone());
            words.extend(flag.short.iter().cloned());
        }
        words.extend(path.switches.iter().map(|w| w.word.clone()));
        let mut list = quote(&words.join(" "));
        if path.dynamic_args {
            // splice the live lookup into the quoted list
            list.pop();
            list.push_str(&format!(" $({})\"", dynamic));
        }
        lines.push(format!("        {})", quote(&path.key())));
        lines.push(format!("            words={}", list));
        lines.push("            ;;".to_string());
    }
    lines.extend([
        "        *)".to_string(),
        "            words=\"\"".to_string(),
        "            ;;".to_string(),
        "    esac".to_string(),
        "    COMPREPLY=($(compgen -W \"${words}\" -- \"${cur}\"))".to_string(),
        "}".to_string(),
        String::new(),
        format!("complete -F _{}_complete {}", name, program),
    ]);
    let mut script = lines.join("\n");
    script.push('\n');
    script
}
