//! Business services containing domain logic and use cases.

pub mod audit;
pub mod auth;
pub mod ledger;

// Re-export commonly used types
pub use audit::AuditService;
pub use auth::{
    AuthService, AuthServiceConfig, CutoffPolicy, NotifierService, OtpGenerator, OTP_LENGTH,
};
pub use ledger::{LedgerConfig, LedgerService};
