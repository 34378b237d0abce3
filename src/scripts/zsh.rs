//! Zsh dialect: single-quoted `name:description` specs for `_describe`.

use super::{function_name, value_flag_names, ScriptPath, ScriptValues, ScriptWord};

/// Escape for a zsh single-quoted string.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "'\\''"))
}

/// `_describe` spec: colons in the name are escaped, the first bare colon separates.
fn spec(word: &str, description: &str) -> String {
    let name = word.replace(':', "\\:");
    if description.is_empty() {
        quote(&name)
    } else {
        quote(&format!("{}:{}", name, description))
    }
}

fn word_specs(words: &[ScriptWord]) -> Vec<String> {
    words.iter().map(|w| spec(&w.word, &w.description)).collect()
}

pub(super) fn render(paths: &[ScriptPath], program: &str) -> String {
    let name = function_name(program);
    let main = format!("_{}", name);
    let dynamic = format!("_{}_dynamic", name);
    let mut lines = vec![
        format!("#compdef {}", program),
        format!("# zsh completion for {}", program),
        format!("# Load with: source <({} completion zsh)", program),
        String::new(),
        format!("{}() {{", dynamic),
        "    local line".to_string(),
        format!(
            "    for line in \"${{(@f)$({} __complete \"${{(@)words[2,CURRENT]}}\" 2>/dev/null)}}\"; do",
            program
        ),
        "        [[ -z \"${line}\" ]] && continue".to_string(),
        "        values+=(\"${${line%%$'\\t'*}//:/\\\\:}:${line#*$'\\t'}\")".to_string(),
        "    done".to_string(),
        "}".to_string(),
        String::new(),
        format!("{}() {{", main),
        "    local -a candidates values".to_string(),
        "    local key=\"\" prev=\"${words[CURRENT-1]}\" word i".to_string(),
        "    for ((i = 2; i < CURRENT; i++)); do".to_string(),
        "        word=\"${words[i]}\"".to_string(),
        "        case \"${word}\" in".to_string(),
    ];

    let value_flags = value_flag_names(paths);
    if !value_flags.is_empty() {
        lines.push(format!("            {})", value_flags.join("|")));
        lines.push("                (( i++ ))".to_string());
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
            let patterns: Vec<String> = std::iter::once(&flag.long)
                .chain(flag.short.iter())
                .map(|n| quote(&format!("{}|{}", key, n)))
                .collect();
            lines.push(format!("        {})", patterns.join("|")));
            match &flag.values {
                ScriptValues::Fixed(values) => {
                    let specs: Vec<String> = values.iter().map(|v| spec(v, "")).collect();
                    lines.push(format!("            candidates=({})", specs.join(" ")));
                    lines.push("            _describe -t values 'value' candidates".to_string());
                }
                ScriptValues::Dynamic => {
                    lines.push(format!("            {}", dynamic));
                    lines.push("            _describe -t values 'value' values".to_string());
                }
                ScriptValues::None => lines.push("            _files".to_string()),
            }
            lines.push("            return".to_string());
            lines.push("            ;;".to_string());
        }
    }
    lines.push("    esac".to_string());
    lines.push(String::new());
    lines.push("    case \"${key}\" in".to_string());

    for path in paths {
        let mut specs = word_specs(&path.words);
        for flag in &path.flags {
            specs.push(spec(&flag.long, &flag.description));
            if let Some(short) = &flag.short {
                specs.push(spec(short, &flag.description));
            }
        }
        specs.extend(word_specs(&path.switches));
        lines.push(format!("        {})", quote(&path.key())));
        lines.push(format!("            candidates=({})", specs.join(" ")));
        if path.dynamic_args {
            lines.push(format!("            {}", dynamic));
            lines.push("            candidates+=(\"${values[@]}\")".to_string());
        }
        lines.push("            ;;".to_string());
    }
    lines.extend([
        "        *)".to_string(),
        "            candidates=()".to_string(),
        "            ;;".to_string(),
        "    esac".to_string(),
        format!("    _describe -t commands '{}' candidates", program),
        "}".to_string(),
        String::new(),
        format!("if [ \"$funcstack[1]\" = \"{}\" ]; then", main),
        format!("    {} \"$@\"", main),
        "else".to_string(),
        format!("    compdef {} {}", main, program),
        "fi".to_string(),
    ]);
    let mut script = lines.join("\n");
    script.push('\n');
    script
}
