//! Result of a one-time-code issuance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of the out-of-band delivery attempt for an issued code
///
/// Delivery is advisory: by the time it is attempted the code is already
/// persisted and valid, so a failure here never rolls back issuance and is
/// never surfaced as an authentication error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "detail")]
pub enum DeliveryStatus {
    /// The notifier accepted the message
    Delivered { message_id: String },
    /// The account has no delivery address on file
    Skipped,
    /// The notifier reported a failure
    Failed { reason: String },
}

impl DeliveryStatus {
    /// Whether the announcement reached the notifier
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered { .. })
    }

    /// Whether the caller should warn the user that no message went out
    pub fn is_advisory(&self) -> bool {
        !self.is_delivered()
    }
}

/// Outcome of a successful code issuance
///
/// The code itself is deliberately absent: it travels only out of band.
/// The device identifier is returned so a first-time client can persist
/// the binding it was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedOtp {
    /// Device identifier the code is bound to
    pub device_id: String,

    /// Instant the code expires (the next daily cutoff)
    pub expires_at: DateTime<Utc>,

    /// Outcome of the delivery attempt
    pub delivery: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_predicates() {
        let delivered = DeliveryStatus::Delivered {
            message_id: "42".to_string(),
        };
        assert!(delivered.is_delivered());
        assert!(!delivered.is_advisory());

        assert!(DeliveryStatus::Skipped.is_advisory());
        let failed = DeliveryStatus::Failed {
            reason: "timeout".to_string(),
        };
        assert!(failed.is_advisory());
        assert!(!failed.is_delivered());
    }

    #[test]
    fn test_issued_otp_carries_no_code() {
        let issued = IssuedOtp {
            device_id: "device-a".to_string(),
            expires_at: Utc::now(),
            delivery: DeliveryStatus::Skipped,
        };
        let json = serde_json::to_string(&issued).unwrap();
        assert!(json.contains("device-a"));
        assert!(!json.contains("code"));
    }
}
