//! Value objects representing immutable domain concepts.

pub mod issued_otp;
pub mod session;

// Re-export commonly used types
pub use issued_otp::{DeliveryStatus, IssuedOtp};
pub use session::Session;
