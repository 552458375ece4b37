//! Device identifier helpers for one-time-code binding.
//!
//! Identifiers are opaque to the server: any non-empty string without
//! whitespace is accepted as presented. Clients that present nothing are
//! minted a fresh identifier and must persist it, since the code they
//! requested is only usable from that identity.

use uuid::Uuid;

/// Checks whether a presented device identifier is usable as a binding
pub fn is_well_formed_device_id(device_id: &str) -> bool {
    !device_id.is_empty() && !device_id.chars().any(char::is_whitespace)
}

/// Mints a fresh device identifier
pub fn mint_device_id() -> String {
    Uuid::new_v4().to_string()
}

/// Resolves the identifier a new code will be bound to
///
/// Reuses the presented identifier when it is well formed, otherwise mints
/// a fresh one.
pub fn resolve_device_id(presented: Option<&str>) -> String {
    match presented {
        Some(id) if is_well_formed_device_id(id) => id.to_string(),
        _ => mint_device_id(),
    }
}
