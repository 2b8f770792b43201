//! Shell-safety validator.
//!
//! Character-class check only; no attempt is made to parse shell syntax.

/// Characters that change shell meaning when interpolated unquoted.
pub const DANGEROUS_METACHARACTERS: &[char] = &[
    ';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']', '<', '>', '\\', '!', '\n', '\r',
];

/// Returns true if `text` contains any shell metacharacter from
/// [`DANGEROUS_METACHARACTERS`].
pub fn contains_dangerous_metacharacters(text: &str) -> bool {
    first_dangerous_metacharacter(text).is_some()
}

/// First dangerous metacharacter in `text`, if any.
pub fn first_dangerous_metacharacter(text: &str) -> Option<char> {
    text.chars().find(|c| DANGEROUS_METACHARACTERS.contains(c))
}

/// Printable name for a flagged character (newlines are otherwise invisible in messages).
pub fn describe_metacharacter(c: char) -> String {
    match c {
        '\n' => "newline".to_string(),
        '\r' => "carriage return".to_string(),
        other => format!("'{}'", other),
    }
}
