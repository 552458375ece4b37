//! Domain-specific error types for authentication and ledger operations
//!
//! Each variant carries a human-readable message because the corrective
//! action differs per failure: a user holding an expired code should
//! re-request, one on the wrong device should return to the original
//! device, and one who mistyped should simply try again.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("A code has already been issued to this device and is still valid")]
    AlreadyIssued,

    #[error("An active code is bound to a different device")]
    DeviceConflict,

    #[error("No code has been requested for this account")]
    NoOtpRequested,

    #[error("The code was issued to a different device; log in from the original device")]
    DeviceMismatch,

    #[error("The code has expired; request a new one")]
    OtpExpired,

    #[error("Incorrect one-time code")]
    BadOtp,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid administrator credentials")]
    InvalidAdminCredentials,
}

/// Ledger-related errors
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Phone record not found")]
    RecordNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error("Seed danger flag does not match the seed rating")]
    InconsistentSeed,

    #[error("Concurrent update conflict on the phone record")]
    StoreConflict,
}
