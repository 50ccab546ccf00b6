// src/normalize/utils.rs

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_whitespace_and_quotes() {
        assert_eq!(clean_str("  12.5 "), "12.5");
        assert_eq!(clean_str("\"2024-01-02\""), "2024-01-02");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(""), "");
    }
}
