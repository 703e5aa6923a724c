//! Client name handling.
//!
//! Client folders are named `"Surname, Firstname"`. First and last names
//! are recovered from a folder name with a best-effort heuristic that must
//! stay stable: existing folders were named under it.

/// Split a free-text name into `(first_name, last_name)`.
///
/// - `"Smith, Jane"` splits on the first `", "`: last = before, first = after.
/// - `"Jane Q Smith"` splits on whitespace: first token, last token (middle dropped).
/// - `"Madonna"` is a last name with an empty first name.
/// - `""` gives two empty strings.
pub fn split_name(name: &str) -> (String, String) {
    if let Some((last, first)) = name.split_once(", ") {
        return (first.trim().to_string(), last.trim().to_string());
    }

    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (String::new(), only.to_string()),
        [first, .., last] => (first.to_string(), last.to_string()),
    }
}

/// Canonical folder name for a client.
///
/// `"Last, First"` when both parts are present, otherwise the supplied
/// display name (trimmed).
pub fn canonical_display_name(first_name: &str, last_name: &str, display_name: &str) -> String {
    let first = first_name.trim();
    let last = last_name.trim();
    if !first.is_empty() && !last.is_empty() {
        format!("{}, {}", last, first)
    } else {
        display_name.trim().to_string()
    }
}

/// Human-facing full name (`"First Last"`), falling back to the display name.
pub fn full_name(first_name: &str, last_name: &str, display_name: &str) -> String {
    let first = first_name.trim();
    let last = last_name.trim();
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{} {}", first, last),
        _ => display_name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str) -> (String, String) {
        split_name(name)
    }

    #[test]
    fn test_comma_form() {
        assert_eq!(split("Smith, Jane"), ("Jane".to_string(), "Smith".to_string()));
    }

    #[test]
    fn test_comma_form_keeps_multi_word_surname() {
        assert_eq!(
            split("Van Der Berg, Jane"),
            ("Jane".to_string(), "Van Der Berg".to_string())
        );
    }

    #[test]
    fn test_whitespace_form() {
        assert_eq!(split("Jane Smith"), ("Jane".to_string(), "Smith".to_string()));
    }

    #[test]
    fn test_whitespace_form_drops_middle_names() {
        assert_eq!(
            split("Jane Quinn Smith"),
            ("Jane".to_string(), "Smith".to_string())
        );
    }

    #[test]
    fn test_single_token_is_last_name() {
        assert_eq!(split("Madonna"), (String::new(), "Madonna".to_string()));
    }

    #[test]
    fn test_empty() {
        assert_eq!(split(""), (String::new(), String::new()));
        assert_eq!(split("   "), (String::new(), String::new()));
    }

    #[test]
    fn test_comma_without_space_is_not_the_comma_form() {
        assert_eq!(split("Smith,Jane"), (String::new(), "Smith,Jane".to_string()));
    }

    #[test]
    fn test_canonical_display_name() {
        assert_eq!(canonical_display_name("Jane", "Doe", "ignored"), "Doe, Jane");
        assert_eq!(canonical_display_name("", "Doe", "Doe, Jane"), "Doe, Jane");
        assert_eq!(canonical_display_name("", "", " Acme Ltd "), "Acme Ltd");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Jane", "Doe", "Doe, Jane"), "Jane Doe");
        assert_eq!(full_name("", "Madonna", "Madonna"), "Madonna");
    }
}
