use lazy_static::lazy_static;
use regex::Regex;

use crate::utils::dates::parse_timestamp;

/// Local part may not start or end with a dot; domain labels start alphanumeric.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9_'%+\-](?:[A-Za-z0-9_'%+\-.]*[A-Za-z0-9_'%+\-])?@(?:[A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";

lazy_static! {
    /// Compiled regex for email validation.
    static ref EMAIL_REGEX: Regex = Regex::new(EMAIL_PATTERN).expect("Invalid regex for email");
}

/// Checks email syntax. Case is irrelevant here; callers lowercase afterwards.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && !email.contains("..")
}

/// True when `raw` is accepted by the lenient timestamp parser.
pub fn is_parseable_date(raw: &str) -> bool {
    parse_timestamp(raw).is_some()
}

/// Length of `value` in Unicode scalar values.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_email_forms() {
        assert!(is_valid_email("sandra@test.com"));
        assert!(is_valid_email("SanDra@Test.COM"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("o'neil@test.com"));
        assert!(is_valid_email("a@test.com"));
        assert!(is_valid_email("user_1@sub-domain.example.co"));
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in [
            "bad", "", "a@b", "@test.com", "a@@test.com", "a..b@test.com", "a b@test.com",
            "a.@test.com", ".a@test.com", "a@-test.com", "a@test.-com.org", "a@test..com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn date_check_delegates_to_parser() {
        assert!(is_parseable_date("2015-03-15T12:00:00Z"));
        assert!(!is_parseable_date("not-a-date"));
    }

    #[test]
    fn char_len_counts_scalars_not_bytes() {
        assert_eq!(char_len("Zoë"), 3);
        assert_eq!(char_len("Al"), 2);
    }
}
