//! Structural check for generated Python
//!
//! Not a parser. Skips comments and string literals and verifies that every
//! bracket closes in order and every string terminates.

/// Structural defect in Python source
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DelimiterError {
    /// Bracket opened and never closed
    #[error("line {line}: '{open}' is never closed")]
    Unclosed {
        /// Opening bracket
        open: char,
        /// Line it was opened on
        line: usize,
    },

    /// Closing bracket with nothing open
    #[error("line {line}: unexpected '{found}'")]
    Unexpected {
        /// Closing bracket
        found: char,
        /// Line
        line: usize,
    },

    /// Closing bracket of the wrong kind
    #[error("line {line}: '{found}' closes '{open}'")]
    Mismatched {
        /// Innermost open bracket
        open: char,
        /// Closing bracket found
        found: char,
        /// Line
        line: usize,
    },

    /// String literal runs past its line or the end of input
    #[error("line {line}: unterminated string literal")]
    UnterminatedString {
        /// Line the literal starts on
        line: usize,
    },
}

/// Check bracket and string balance
///
/// # Errors
///
/// The first [`DelimiterError`] found.
pub fn check_delimiters(source: &str) -> Result<(), DelimiterError> {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;
    let mut i = 0;

    while i < len {
        let c = chars[i];
        match c {
            '\n' => line += 1,
            '#' => {
                while i < len && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '"' | '\'' => {
                let start = line;
                let triple = i + 2 < len && chars[i + 1] == c && chars[i + 2] == c;
                i += if triple { 3 } else { 1 };
                loop {
                    let Some(&d) = chars.get(i) else {
                        return Err(DelimiterError::UnterminatedString { line: start });
                    };
                    if d == '\\' {
                        if chars.get(i + 1) == Some(&'\n') {
                            line += 1;
                        }
                        i += 2;
                        continue;
                    }
                    if d == '\n' {
                        if !triple {
                            return Err(DelimiterError::UnterminatedString { line: start });
                        }
                        line += 1;
                    } else if d == c {
                        if !triple {
                            i += 1;
                            break;
                        }
                        if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                            i += 3;
                            break;
                        }
                    }
                    i += 1;
                }
                continue;
            }
            '(' | '[' | '{' => stack.push((c, line)),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, _)) => {
                        return Err(DelimiterError::Mismatched {
                            open,
                            found: c,
                            line,
                        })
                    }
                    None => return Err(DelimiterError::Unexpected { found: c, line }),
                }
            }
            _ => {}
        }
        i += 1;
    }

    match stack.pop() {
        Some((open, line)) => Err(DelimiterError::Unclosed { open, line }),
        None => Ok(()),
    }
}
