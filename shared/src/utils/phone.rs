//! Phone number utilities
//!
//! Directory entries key on a canonical digit string: every submitted
//! number is stripped down to its digits before storage or comparison, so
//! "+7 999 123-45-67" and "79991234567" refer to the same entry.

use once_cell::sync::Lazy;
use regex::Regex;

// Canonical phone number: digits only, plausible length
static CANONICAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{7,15}$").unwrap()
});

/// Reduce a phone number to its canonical digit string
pub fn canonicalize_phone_number(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check if a phone number canonicalizes to a plausible directory key
pub fn is_valid_phone_number(phone: &str) -> bool {
    let canonical = canonicalize_phone_number(phone);
    CANONICAL_PHONE_REGEX.is_match(&canonical)
}

/// Mask a phone number for logs (e.g., 799****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let canonical = canonicalize_phone_number(phone);
    if canonical.len() >= 7 {
        format!(
            "{}****{}",
            &canonical[0..3],
            &canonical[canonical.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}
