//! One-time-code generation.

use rand::rngs::OsRng;
use rand::Rng;

/// Length of a generated one-time code in digits
pub const OTP_LENGTH: usize = 6;

/// Generates fixed-length numeric one-time codes from the OS CSPRNG
///
/// Codes are drawn uniformly from `100000..=999999`, so they never carry a
/// leading zero and always print as exactly [`OTP_LENGTH`] digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtpGenerator;

impl OtpGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh code
    pub fn generate(&self) -> String {
        let mut rng = OsRng;
        let code: u32 = rng.gen_range(100_000..1_000_000);
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        let generator = OtpGenerator::new();
        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.len(), OTP_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_generated_codes_vary() {
        let generator = OtpGenerator::new();
        let first = generator.generate();
        // Six more draws all colliding with the first would be a broken RNG.
        let all_same = (0..6).all(|_| generator.generate() == first);
        assert!(!all_same);
    }
}
