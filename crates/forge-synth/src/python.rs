//! Python lexical helpers
//!
//! Every user-supplied value reaches the generated source through one of
//! these functions, so no input can open a construct the template does not
//! close.

use forge_plan::sanitize_identifier;
use std::fmt::Write as _;
use unicode_ident::{is_xid_continue, is_xid_start};

/// Lowercase Python keywords (sanitized identifiers are lowercase)
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
    "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// Names the templates bind or call inside `main()`
const RESERVED: &[&str] = &[
    "os",
    "db",
    "team",
    "main",
    "print",
    "member_info",
    "display_name",
    "display_role",
    "load_dotenv",
];

/// Double-quoted Python string literal
///
/// ```
/// use forge_synth::python::py_str;
///
/// assert_eq!(py_str("say \"hi\"\n"), r#""say \"hi\"\n""#);
/// ```
#[must_use]
pub fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xff {
                    let _ = write!(out, "\\x{code:02x}");
                } else {
                    let _ = write!(out, "\\u{code:04x}");
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Single-line text safe inside a triple-quoted docstring
///
/// Control characters become spaces; backslashes and quotes are escaped so
/// the value can never terminate the docstring.
#[must_use]
pub fn docstring_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

/// Single-line text for a `#` comment
#[must_use]
pub fn comment_text(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Whether `name` is a Python keyword
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Variable name for a display name
///
/// Only XID characters survive, and the first one must be XID_Start or `_`.
/// `position` is 1-based and only used when the name sanitizes to nothing.
#[must_use]
pub fn py_identifier(display_name: &str, position: usize) -> String {
    let mut ident: String = sanitize_identifier(display_name)
        .chars()
        .filter(|c| is_xid_continue(*c))
        .collect();

    if ident.trim_matches('_').is_empty() {
        return format!("member_{position}");
    }
    if ident.starts_with(|c: char| !is_xid_start(c) && c != '_') {
        ident.insert(0, '_');
    }
    if is_keyword(&ident) || RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn py_str_escapes() {
        assert_eq!(py_str("plain"), "\"plain\"");
        assert_eq!(py_str("a\\b"), r#""a\\b""#);
        assert_eq!(py_str("tab\there"), r#""tab\there""#);
        assert_eq!(py_str("\u{7}"), r#""\x07""#);
        assert_eq!(py_str("\u{85}"), r#""\x85""#);
        assert_eq!(py_str("¿Qué?"), "\"¿Qué?\"");
    }

    #[test]
    fn docstring_cannot_close() {
        let text = docstring_text("evil \"\"\" end\nimport os");
        assert!(!text.contains("\"\"\""));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn comment_is_single_line() {
        assert_eq!(comment_text(" a\nb\r\n "), "a b");
    }

    #[test]
    fn identifiers() {
        assert_eq!(py_identifier("Researcher", 1), "researcher");
        assert_eq!(py_identifier("Data Analyst", 2), "data_analyst");
        assert_eq!(py_identifier("!!!", 3), "member_3");
        assert_eq!(py_identifier("", 1), "member_1");
        assert_eq!(py_identifier("3D Modeler", 1), "_3d_modeler");
        assert_eq!(py_identifier("Class", 1), "class_");
        assert_eq!(py_identifier("Team", 1), "team_");
        assert_eq!(py_identifier("OS", 1), "os_");
        assert_eq!(py_identifier("Analista de Datos", 1), "analista_de_datos");
    }

    #[test]
    fn non_ascii_digits_dropped() {
        assert_eq!(py_identifier("x²", 1), "x");
    }

    #[test]
    fn non_xid_letters_dropped() {
        assert_eq!(py_identifier("\u{24d0} helper", 1), "_helper");
        assert_eq!(py_identifier("\u{24d0}\u{24d1}", 2), "member_2");
        assert_eq!(py_identifier("\u{24d0} \u{24d1}", 3), "member_3");
        assert_eq!(py_identifier("Creación", 1), "creación");
    }
}
