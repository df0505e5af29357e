//! Subscriber token extraction and format validation.
//!
//! Newsletter platforms append a subscriber identifier to outbound links under
//! different query-parameter names. The first non-empty match in
//! [`TOKEN_PARAMS`] order wins.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Token parameter names in priority order.
pub const TOKEN_PARAMS: &[&str] = &["_bhlid", "mc_eid", "subscription_id", "subscriber_id"];

/// Exactly 40 hexadecimal digits, either case.
static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{40}$").expect("token regex is valid"));

/// Returns the first present, non-empty token parameter value.
pub fn extract_token(params: &HashMap<String, String>) -> Option<&str> {
    TOKEN_PARAMS
        .iter()
        .filter_map(|name| params.get(*name))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

/// Accepts iff `token` is exactly 40 hex characters.
pub fn is_valid_token(token: &str) -> bool {
    TOKEN_REGEX.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "1234567890abcdef1234567890abcdef12345678";

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_none_when_absent() {
        assert_eq!(extract_token(&params(&[("utm_source", "x")])), None);
    }

    #[test]
    fn test_extract_each_supported_name() {
        for name in TOKEN_PARAMS {
            assert_eq!(extract_token(&params(&[(name, "tok")])), Some("tok"));
        }
    }

    #[test]
    fn test_extract_priority_order() {
        let p = params(&[
            ("subscriber_id", "d"),
            ("subscription_id", "c"),
            ("mc_eid", "b"),
            ("_bhlid", "a"),
        ]);
        assert_eq!(extract_token(&p), Some("a"));

        let p = params(&[("subscriber_id", "d"), ("mc_eid", "b")]);
        assert_eq!(extract_token(&p), Some("b"));
    }

    #[test]
    fn test_extract_skips_empty_values() {
        let p = params(&[("_bhlid", ""), ("mc_eid", "b")]);
        assert_eq!(extract_token(&p), Some("b"));
    }

    #[test]
    fn test_valid_token_lower_and_upper() {
        assert!(is_valid_token(VALID));
        assert!(is_valid_token(&VALID.to_uppercase()));
    }

    #[test]
    fn test_invalid_token_lengths() {
        assert!(!is_valid_token(""));
        assert!(!is_valid_token(&VALID[..39]));
        assert!(!is_valid_token(&format!("{VALID}0")));
    }

    #[test]
    fn test_invalid_token_characters() {
        assert!(!is_valid_token("g234567890abcdef1234567890abcdef12345678"));
        assert!(!is_valid_token("z234567890abcdef1234567890abcdef12345678"));
        assert!(!is_valid_token("1234567890abcdef1234567890abcdef1234567 "));
        assert!(!is_valid_token("invalid-token"));
    }
}
