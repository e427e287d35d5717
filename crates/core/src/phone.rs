//! Costa Rican phone number rules.

/// Country calling code prepended to local numbers for WhatsApp.
pub const COUNTRY_CODE: &str = "506";

/// Length of a local Costa Rican number.
const LOCAL_LENGTH: usize = 8;

/// Whether `phone` is a valid local Costa Rican number.
///
/// Spaces and dashes are ignored. The remainder must be exactly eight digits
/// starting with 2 (landline) or 6, 7, 8 (mobile).
pub fn is_valid_costa_rica_phone(phone: &str) -> bool {
    let cleaned: String = phone.chars().filter(|c| *c != ' ' && *c != '-').collect();
    cleaned.len() == LOCAL_LENGTH
        && cleaned.chars().all(|c| c.is_ascii_digit())
        && matches!(cleaned.as_bytes()[0], b'2' | b'6' | b'7' | b'8')
}

/// Normalize a stored phone number into the international form WhatsApp expects.
///
/// Keeps only digits; an eight-digit local number is prefixed with
/// [`COUNTRY_CODE`].
pub fn normalize_for_whatsapp(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == LOCAL_LENGTH && !digits.starts_with(COUNTRY_CODE) {
        format!("{COUNTRY_CODE}{digits}")
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_numbers() {
        assert!(is_valid_costa_rica_phone("8888-1234"));
        assert!(is_valid_costa_rica_phone("2222 3333"));
        assert!(is_valid_costa_rica_phone("61234567"));
    }

    #[test]
    fn invalid_numbers() {
        assert!(!is_valid_costa_rica_phone(""));
        assert!(!is_valid_costa_rica_phone("5123-4567"), "must start with 2, 6, 7 or 8");
        assert!(!is_valid_costa_rica_phone("8888-123"), "too short");
        assert!(!is_valid_costa_rica_phone("(506) 8888-1234"));
        assert!(!is_valid_costa_rica_phone("8888-12a4"));
    }

    #[test]
    fn local_number_gets_country_code() {
        assert_eq!(normalize_for_whatsapp("8888-1234"), "50688881234");
        assert_eq!(normalize_for_whatsapp("(8888) 12 34"), "50688881234");
    }

    #[test]
    fn international_number_is_only_cleaned() {
        assert_eq!(normalize_for_whatsapp("+506 8888 1234"), "50688881234");
        assert_eq!(normalize_for_whatsapp("+1 (415) 555-0100"), "14155550100");
    }
}
