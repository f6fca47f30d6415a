//! Identifier derivation from display names
//!
//! Used for persisted file names and as the base of generated variable
//! names. Pure function of the display name.

/// Derive a filesystem-safe identifier from a display name
///
/// Lowercases, turns spaces into underscores and removes every other
/// character that is neither alphanumeric nor an underscore. Surrounding
/// whitespace is ignored.
///
/// ```
/// use forge_plan::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Demo Web Research Agent"), "demo_web_research_agent");
/// assert_eq!(sanitize_identifier("Q&A bot!"), "qa_bot");
/// ```
#[must_use]
pub fn sanitize_identifier(display_name: &str) -> String {
    display_name
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_alphanumeric() || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Title-case an identifier back into a display name
///
/// Best-effort inverse used when only the identifier survives.
#[must_use]
pub fn display_name_from_identifier(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
