//! Fish dialect: one `complete -c` call per candidate, guarded by the typed word path.

use super::{function_name, value_flag_names, ScriptPath, ScriptValues};

/// Escape for a fish single-quoted string.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Escape for a fish double-quoted string nested in a single-quoted condition.
fn inner(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
}

pub(super) fn render(paths: &[ScriptPath], program: &str) -> String {
    let prefix = format!("__{}", function_name(program));
    let value_flags = value_flag_names(paths);
    let mut lines = vec![
        format!("# fish completion for {}", program),
        format!("# Load with: {} completion fish | source", program),
        String::new(),
        format!("function {}_path", prefix),
        "    set -l tokens (commandline -opc)".to_string(),
        "    set -e tokens[1]".to_string(),
        "    set -l path".to_string(),
        "    set -l skip 0".to_string(),
        "    for token in $tokens".to_string(),
        "        if test $skip -eq 1".to_string(),
        "            set skip 0".to_string(),
        "            continue".to_string(),
        "        end".to_string(),
        "        switch $token".to_string(),
    ];
    if !value_flags.is_empty() {
        lines.push(format!("            case {}", value_flags.join(" ")));
        lines.push("                set skip 1".to_string());
    }
    lines.extend([
        "            case '-*'".to_string(),
        "            case '*'".to_string(),
        "                set path $path $token".to_string(),
        "        end".to_string(),
        "    end".to_string(),
        "    string join ' ' -- $path".to_string(),
        "end".to_string(),
        String::new(),
        format!("function {}_at", prefix),
        format!("    set -l current ({}_path)", prefix),
        "    test \"$current\" = \"$argv[1]\"".to_string(),
        "end".to_string(),
        String::new(),
        format!("function {}_dynamic", prefix),
        "    set -l tokens (commandline -opc)".to_string(),
        "    set -e tokens[1]".to_string(),
        format!(
            "    {} __complete $tokens (commandline -ct) 2>/dev/null",
            program
        ),
        "end".to_string(),
        String::new(),
        format!("complete -c {} -f", program),
    ]);

    for path in paths {
        let condition = quote(&format!("{}_at \"{}\"", prefix, inner(&path.key())));
        for word in &path.words {
            lines.push(format!(
                "complete -c {} -n {} -a {} -d {}",
                program,
                condition,
                quote(&word.word),
                quote(&word.description)
            ));
        }
        for flag in &path.flags {
            let mut line = format!(
                "complete -c {} -n {} -l {}",
                program,
                condition,
                flag.long.trim_start_matches('-')
            );
            if let Some(short) = &flag.short {
                line.push_str(&format!(" -s {}", short.trim_start_matches('-')));
            }
            match &flag.values {
                ScriptValues::Fixed(values) => {
                    line.push_str(&format!(" -x -a {}", quote(&values.join(" "))));
                }
                ScriptValues::Dynamic => {
                    line.push_str(&format!(" -x -a {}", quote(&format!("({}_dynamic)", prefix))));
                }
                ScriptValues::None => line.push_str(" -r -F"),
            }
            line.push_str(&format!(" -d {}", quote(&flag.description)));
            lines.push(line);
        }
        for switch in path.switches.iter().filter(|s| s.word.starts_with("--")) {
            lines.push(format!(
                "complete -c {} -n {} -l {} -d {}",
                program,
                condition,
                switch.word.trim_start_matches('-'),
                quote(&switch.description)
            ));
        }
        if path.dynamic_args {
            lines.push(format!(
                "complete -c {} -n {} -a {}",
                program,
                condition,
                quote(&format!("({}_dynamic)", prefix))
            ));
        }
    }
    let mut script = lines.join("\n");
    script.push('\n');
    script
}

#[cfg(test)]
mod tests {
    use super::super::tests::sample_tree;
    use super::super::{generate, Dialect};
    use super::*;

    #[test]
    fn test_quote() {
        assert_eq!(quote("it's"), "'it\\'s'");
        assert_eq!(inner("a\"b$"), "a\\\"b\\$");
    }

    #[test]
    fn test_fish_script_shape() {
        let script = generate(Dialect::Fish, &sample_tree(), "xcsh");
        assert!(script.contains("complete -c xcsh -f"));
        assert!(script.contains(
            "complete -c xcsh -n '__xcsh_at \"\"' -a 'namespace' -d 'Manage namespaces'"
        ));
        assert!(script.contains(
            "complete -c xcsh -n '__xcsh_at \"namespace list\"' -l output-format -s o -x -a 'json table text' -d 'Output format'"
        ));
        assert!(script.contains("-l namespace -s n -x -a '(__xcsh_dynamic)'"));
        assert!(script.contains("-a 'set' -d 'It\\'s the active namespace'"));
        assert!(script.contains("            case --namespace --output-format -n -o"));
    }
}
