// Caller-side phone checks; the payment flow itself does not re-validate.

pub const MIN_PHONE_LEN: usize = 10;

pub fn is_valid_phone_number(phone: &str) -> bool {
    let trimmed = phone.trim();
    !trimmed.is_empty() && trimmed.len() >= MIN_PHONE_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_local_and_international_formats() {
        assert!(is_valid_phone_number("0712345678"));
        assert!(is_valid_phone_number("+254712345678"));
    }

    #[test]
    fn test_rejects_empty_and_short_numbers() {
        assert!(!is_valid_phone_number(""));
        assert!(!is_valid_phone_number("   "));
        assert!(!is_valid_phone_number("071234"));
    }
}
