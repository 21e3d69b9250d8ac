//! Comment stripping for JSON-with-comments package files
//!
//! Removes `// line` and `/* block */` comments while leaving string
//! literals untouched, so the result can be handed to `serde_json`.
//! Newlines inside block comments are kept, which keeps parser error
//! positions pointing at the right line of the original file.

use thiserror::Error;

/// Comment syntax that cannot be stripped
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentError {
    #[error("unterminated block comment starting at line {line}")]
    UnterminatedBlock { line: usize },
}

/// Strip comments from JSONC text
pub fn strip_comments(input: &str) -> Result<String, CommentError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut line = 1;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    // Escaped character is copied verbatim, even a quote
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Drop everything up to, not including, the newline
                while chars.next_if(|&next| next != '\n').is_some() {}
            }
            ('/', Some('*')) => {
                let start = line;
                chars.next();
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    match inner {
                        '\n' => {
                            line += 1;
                            out.push('\n');
                        }
                        '*' if chars.next_if_eq(&'/').is_some() => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return Err(CommentError::UnterminatedBlock { line: start });
                }
                // Keep tokens on either side of the comment apart
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}
