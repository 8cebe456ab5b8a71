//! Field validation rules shared across the API surface.

use validator::ValidationError;

/// Minimum password length accepted at registration and login.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Comment length bounds.
pub const COMMENT_MIN_LEN: usize = 2;
pub const COMMENT_MAX_LEN: usize = 500;

/// Phone numbers are exactly ten digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone must be 10 digits".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("9999999999", true)]
    #[case("0123456789", true)]
    #[case("123456789", false)]
    #[case("12345678901", false)]
    #[case("12345abcde", false)]
    #[case("", false)]
    #[case("99999 9999", false)]
    fn phone_rule(#[case] phone: &str, #[case] valid: bool) {
        assert_eq!(validate_phone(phone).is_ok(), valid);
    }
}
