use crate::constants::IDENTIFIER_LEN;

/// Short human-readable code printed under a card's symbol.
///
/// Keeps the last six ASCII alphanumerics of the payload, dropping every
/// other character. Shorter results are returned as-is, without padding.
pub fn derive_identifier(payload: &str) -> String {
    let alphanumerics: Vec<char> = payload.chars().filter(char::is_ascii_alphanumeric).collect();
    let start = alphanumerics.len().saturating_sub(IDENTIFIER_LEN);
    alphanumerics[start..].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_last_six() {
        assert_eq!(derive_identifier("abc-123456"), "123456");
        assert_eq!(derive_identifier("https://example.com/t/AbCdEf9"), "bCdEf9");
    }

    #[test]
    fn test_separators_are_dropped_between_runs() {
        assert_eq!(derive_identifier("https://example.com/abcXYZ12"), "cXYZ12");
        assert_eq!(derive_identifier("a/b/c/d/e/f/g"), "bcdefg");
    }

    #[test]
    fn test_short_payload_is_not_padded() {
        assert_eq!(derive_identifier("x-1"), "x1");
        assert_eq!(derive_identifier("--//--"), "");
    }

    #[test]
    fn test_non_ascii_is_ignored() {
        assert_eq!(derive_identifier("ü12ß34"), "1234");
    }
}
