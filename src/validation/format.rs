use crate::models::{FieldType, RecognitionResult};
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_ID_DIGITS: usize = 5;
pub const MAX_ID_DIGITS: usize = 8;
/// Fewer scanned digits than this means the barcode read failed.
pub const MIN_BARCODE_DIGITS: usize = 5;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref FULL_NAME: Regex = Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z]+$").unwrap();
    static ref CLASS_OF: Regex = Regex::new(r"(?i)class\s+of\s+([0-9]{4})").unwrap();
    static ref FOUR_DIGITS: Regex = Regex::new(r"\b([0-9]{4})\b").unwrap();
}

/// Normalizes raw OCR text and decides whether it is usable.
pub struct FormatValidator;

impl FormatValidator {
    /// Normalize `raw` for `field`, substituting the default when it fails validation.
    pub fn validate(field: FieldType, raw: &str) -> RecognitionResult {
        let normalized = match field {
            FieldType::Photo => None,
            FieldType::Name => Self::normalize_name(raw),
            FieldType::Id => Self::normalize_id(raw),
            FieldType::Year => Self::normalize_year(raw),
            FieldType::Barcode => Self::normalize_barcode(raw),
        };
        match normalized {
            Some(text) => RecognitionResult::accepted(text),
            None => RecognitionResult::defaulted(field),
        }
    }

    /// Collapse whitespace and title-case each word; requires "First Last".
    pub fn normalize_name(raw: &str) -> Option<String> {
        let collapsed = WHITESPACE.replace_all(raw.trim(), " ");
        let titled = collapsed
            .split(' ')
            .map(title_case)
            .collect::<Vec<_>>()
            .join(" ");
        FULL_NAME.is_match(&titled).then_some(titled)
    }

    pub fn normalize_id(raw: &str) -> Option<String> {
        let digits = digits_only(raw);
        (MIN_ID_DIGITS..=MAX_ID_DIGITS)
            .contains(&digits.len())
            .then_some(digits)
    }

    /// "Class of YYYY", or any standalone four-digit run wrapped the same way.
    pub fn normalize_year(raw: &str) -> Option<String> {
        CLASS_OF
            .captures(raw)
            .or_else(|| FOUR_DIGITS.captures(raw))
            .map(|caps| format!("Class of {}", &caps[1]))
    }

    pub fn normalize_barcode(raw: &str) -> Option<String> {
        let digits = digits_only(raw);
        (digits.len() >= MIN_BARCODE_DIGITS).then_some(digits)
    }
}

fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, DEFAULT_CARD_ID, DEFAULT_NAME, DEFAULT_YEAR};

    #[test]
    fn test_name_normalization() {
        assert_eq!(FormatValidator::normalize_name("  jOHN   smith \n"), Some("John Smith".to_string()));
        assert_eq!(FormatValidator::normalize_name("ALEX\tMORGAN"), Some("Alex Morgan".to_string()));
    }

    #[test]
    fn test_name_rejections() {
        assert_eq!(FormatValidator::normalize_name("Madonna"), None);
        assert_eq!(FormatValidator::normalize_name("Mary Ann Jones"), None);
        assert_eq!(FormatValidator::normalize_name("O'brien Smith"), None);
        assert_eq!(FormatValidator::normalize_name(""), None);

        let result = FormatValidator::validate(FieldType::Name, "x");
        assert_eq!(result.text, DEFAULT_NAME);
        assert_eq!(result.confidence, Confidence::Low);
    }

    #[test]
    fn test_id_length_boundaries() {
        assert_eq!(FormatValidator::normalize_id("1234"), None);
        assert_eq!(FormatValidator::normalize_id("12345"), Some("12345".to_string()));
        assert_eq!(FormatValidator::normalize_id("12345678"), Some("12345678".to_string()));
        assert_eq!(FormatValidator::normalize_id("123456789"), None);

        let rejected = FormatValidator::validate(FieldType::Id, "1234");
        assert_eq!(rejected.text, DEFAULT_CARD_ID);
        assert!(rejected.is_defaulted());
    }

    #[test]
    fn test_id_strips_noise() {
        assert_eq!(FormatValidator::normalize_id("ID: 40 21-77\n"), Some("402177".to_string()));
    }

    #[test]
    fn test_year_extraction() {
        let year = FormatValidator::validate(FieldType::Year, "CLASS OF 2025");
        assert_eq!(year.text, "Class of 2025");
        assert_eq!(year.confidence, Confidence::High);

        assert_eq!(FormatValidator::validate(FieldType::Year, "2025 graduating").text, "Class of 2025");
        assert_eq!(FormatValidator::validate(FieldType::Year, "class  of\n2027").text, "Class of 2027");

        let missing = FormatValidator::validate(FieldType::Year, "no year here");
        assert_eq!(missing.text, DEFAULT_YEAR);
        assert_eq!(missing.confidence, Confidence::Low);
    }

    #[test]
    fn test_year_prefers_class_of() {
        assert_eq!(
            FormatValidator::normalize_year("1999 Class of 2026"),
            Some("Class of 2026".to_string())
        );
        assert_eq!(FormatValidator::normalize_year("20251"), None);
    }

    #[test]
    fn test_year_rejects_non_ascii_digits() {
        let year = FormatValidator::validate(FieldType::Year, "Class of \u{662}\u{660}\u{662}\u{665}");
        assert_eq!(year.text, DEFAULT_YEAR);
        assert_eq!(year.confidence, Confidence::Low);
        assert_eq!(FormatValidator::normalize_year("\u{662}\u{660}\u{662}\u{665}"), None);
    }

    #[test]
    fn test_barcode_digits() {
        assert_eq!(FormatValidator::normalize_barcode("12 34 5"), Some("12345".to_string()));
        assert_eq!(FormatValidator::normalize_barcode("1234"), None);
    }
}
