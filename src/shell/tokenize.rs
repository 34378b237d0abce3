//! Command-line tokenizer: whitespace separated words with quotes and backslash escapes.

use crate::error::ShellError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

struct Scan {
    words: Vec<String>,
    current: String,
    in_word: bool,
    quote: Quote,
    escaped: bool,
}

fn scan(line: &str) -> Scan {
    let mut state = Scan {
        words: Vec::new(),
        current: String::new(),
        in_word: false,
        quote: Quote::None,
        escaped: false,
    };
    for c in line.chars() {
        if state.escaped {
            state.current.push(c);
            state.escaped = false;
            continue;
        }
        match (state.quote, c) {
            (Quote::Single, '\'') => state.quote = Quote::None,
            (Quote::Single, _) => state.current.push(c),
            (Quote::Double, '"') => state.quote = Quote::None,
            (Quote::Double, '\\') => state.escaped = true,
            (Quote::Double, _) => state.current.push(c),
            (Quote::None, '\\') => {
                state.escaped = true;
                state.in_word = true;
            }
            (Quote::None, '\'') => {
                state.quote = Quote::Single;
                state.in_word = true;
            }
            (Quote::None, '"') => {
                state.quote = Quote::Double;
                state.in_word = true;
            }
            (Quote::None, c) if c.is_whitespace() => {
                if state.in_word {
                    state.words.push(std::mem::take(&mut state.current));
                    state.in_word = false;
                }
            }
            (Quote::None, c) => {
                state.current.push(c);
                state.in_word = true;
            }
        }
    }
    state
}

/// Split `line` into words. Unterminated quotes and trailing backslashes are errors.
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut state = scan(line);
    if state.quote != Quote::None {
        return Err(ShellError::InvalidArguments("unterminated quote".to_string()));
    }
    if state.escaped {
        return Err(ShellError::InvalidArguments("trailing backslash".to_string()));
    }
    if state.in_word {
        state.words.push(state.current);
    }
    Ok(state.words)
}

/// Split a partially typed line for completion: `(complete words, word under the cursor)`.
/// An open quote or trailing escape is tolerated; a trailing space yields an empty partial.
pub fn tokenize_partial(line: &str) -> (Vec<String>, String) {
    let mut state = scan(line);
    if state.in_word {
        (state.words, state.current)
    } else {
        state.current.clear();
        (state.words, state.current)
    }
}
