// Small input normalization helpers used by handlers

/// Lowercase and trim an email before lookups or inserts
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trim a free-text field, returning None when effectively empty
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" hi ")), Some("hi".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
