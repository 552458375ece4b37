//! Main authentication service implementation

use chrono::{Duration, Utc};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;

use crate::domain::entities::user::{User, UserOtp, UserRole};
use crate::domain::value_objects::{DeliveryStatus, IssuedOtp, Session};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;

use super::config::AuthServiceConfig;
use super::cutoff::CutoffPolicy;
use super::device::resolve_device_id;
use super::notifier::NotifierService;
use super::otp::OtpGenerator;

/// Authentication service for code issuance and login
///
/// Holds no global state: the account store and the notifier are explicit
/// handles, and every session it produces lives entirely with the caller.
pub struct AuthService<U: UserRepository, N: NotifierService + ?Sized> {
    /// User account store
    user_repository: Arc<U>,
    /// Out-of-band delivery channel for issued codes
    notifier: Arc<N>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Expiry policy for issued codes
    cutoff: CutoffPolicy,
    /// Code generator
    otp_generator: OtpGenerator,
}

impl<U: UserRepository, N: NotifierService + ?Sized> AuthService<U, N> {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Account store implementation
    /// * `notifier` - Out-of-band delivery implementation
    /// * `config` - Service configuration
    pub fn new(user_repository: Arc<U>, notifier: Arc<N>, config: AuthServiceConfig) -> Self {
        let cutoff = CutoffPolicy::new(config.cutoff_hour, config.utc_offset_hours);
        Self {
            user_repository,
            notifier,
            config,
            cutoff,
            otp_generator: OtpGenerator::new(),
        }
    }

    /// The cutoff policy this service issues codes under
    pub fn cutoff_policy(&self) -> CutoffPolicy {
        self.cutoff
    }

    /// Request a one-time code for a user account
    ///
    /// This method:
    /// 1. Loads the account; unknown names and admin accounts fail alike
    /// 2. Rejects the request if an unexpired code is already out
    /// 3. Resolves the device identifier the new code will be bound to
    /// 4. Generates a code expiring at the next daily cutoff and persists
    ///    it with a conditional write
    /// 5. Attempts out-of-band delivery, reported as advisory status
    ///
    /// # Arguments
    ///
    /// * `username` - Login name of the requesting account
    /// * `device_id` - Identifier presented by the client, if it has one
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - Binding, expiry and delivery outcome; the code
    ///   itself travels only out of band
    /// * `Err(DomainError)` - Issuance was refused or storage failed
    pub async fn request_otp(
        &self,
        username: &str,
        device_id: Option<&str>,
    ) -> DomainResult<IssuedOtp> {
        let mut attempts = 0;
        loop {
            // Step 1: Load the account
            let user = self.load_otp_account(username).await?;

            // Step 2: An unexpired code blocks reissue; which error the
            // caller gets depends on whether it holds the bound device
            let now = Utc::now();
            if let Some(otp) = user.otp.as_ref().filter(|otp| !otp.is_expired(now)) {
                return Err(match device_id {
                    Some(presented) if otp.is_bound_to(presented) => {
                        AuthError::AlreadyIssued.into()
                    }
                    _ => AuthError::DeviceConflict.into(),
                });
            }

            // Step 3: Resolve the binding for the new code
            let bound_device = resolve_device_id(device_id);

            // Step 4: Generate and persist, keyed on the state read above
            // so concurrent requests for the same account serialize
            let otp = UserOtp {
                code: self.otp_generator.generate(),
                expires_at: self.cutoff.next_cutoff(now),
                requested_at: now,
                device_id: bound_device,
            };
            let expected = user.otp.as_ref().map(|o| o.requested_at);
            let committed = self
                .user_repository
                .update_otp(user.id, Some(&otp), expected)
                .await?;

            if committed {
                tracing::info!(
                    username = username,
                    device_id = %otp.device_id,
                    expires_at = %otp.expires_at,
                    event = "otp_issued",
                    "Issued one-time code"
                );

                // Step 5: Delivery is advisory; issuance already committed
                let delivery = self.deliver_code(&user, &otp).await;

                return Ok(IssuedOtp {
                    device_id: otp.device_id,
                    expires_at: otp.expires_at,
                    delivery,
                });
            }

            attempts += 1;
            if attempts > self.config.max_issue_retries {
                return Err(DomainError::Internal {
                    message: format!(
                        "Could not issue a code for {} after {} attempts",
                        username, attempts
                    ),
                });
            }
            tracing::debug!(
                username = username,
                attempt = attempts,
                event = "otp_issue_conflict",
                "Lost an issuance race; re-reading the account"
            );
        }
    }

    /// Log in and obtain a client-held session
    ///
    /// Admin accounts authenticate with their static password; the session
    /// horizon is `admin_session_days` and the device identifier is
    /// ignored. User accounts authenticate with the one-time code issued
    /// to them, presented from the bound device; the session expires
    /// exactly when the code does.
    ///
    /// The code is not consumed by a successful login: until its cutoff it
    /// remains valid for repeat logins from the bound device.
    ///
    /// # Arguments
    ///
    /// * `username` - Login name
    /// * `password` - Static password (admins) or current code (users)
    /// * `device_id` - Identifier presented by the client, if any
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        device_id: Option<&str>,
    ) -> DomainResult<Session> {
        let user = self
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match user.role {
            UserRole::Admin => self.login_admin(&user, password),
            UserRole::User => self.login_user(&user, password, device_id),
        }
    }

    /// Discard a client-held session
    ///
    /// Sessions are never persisted server-side, so logout is purely the
    /// act of dropping the value. The code the session came from is
    /// untouched and stays usable until its cutoff.
    pub fn logout(&self, session: Session) {
        tracing::debug!(
            username = %session.username,
            event = "logout",
            "Session discarded"
        );
        drop(session);
    }

    /// Load an account eligible for code issuance
    ///
    /// Admin accounts never use one-time codes; they are reported exactly
    /// like unknown names so the request does not reveal which names
    /// exist.
    async fn load_otp_account(&self, username: &str) -> DomainResult<User> {
        match self.user_repository.find_by_username(username).await? {
            Some(user) if user.is_user() => Ok(user),
            _ => {
                tracing::warn!(
                    username = username,
                    event = "otp_request_rejected",
                    "Code requested for an unknown or non-user account"
                );
                Err(AuthError::UserNotFound.into())
            }
        }
    }

    /// Validate an admin login against the stored static password
    fn login_admin(&self, user: &User, password: &str) -> DomainResult<Session> {
        let stored = match user.static_password.as_deref() {
            Some(stored) => stored,
            None => {
                tracing::warn!(
                    username = %user.username,
                    event = "admin_login_rejected",
                    "Admin account has no password on file"
                );
                return Err(AuthError::InvalidAdminCredentials.into());
            }
        };

        if !secrets_match(stored, password) {
            tracing::warn!(
                username = %user.username,
                event = "admin_login_rejected",
                "Admin password mismatch"
            );
            return Err(AuthError::InvalidAdminCredentials.into());
        }

        let expires_at = Utc::now() + Duration::days(self.config.admin_session_days);
        tracing::info!(
            username = %user.username,
            event = "admin_login",
            "Administrator logged in"
        );
        Ok(Session::new(
            user.id,
            user.username.clone(),
            UserRole::Admin,
            expires_at,
        ))
    }

    /// Validate a user login against the issued code
    ///
    /// Checks run in a fixed order so each failure names its actual cause:
    /// no code requested, wrong device, expired code, wrong code.
    fn login_user(&self, user: &User, code: &str, device_id: Option<&str>) -> DomainResult<Session> {
        let otp = match user.otp.as_ref() {
            Some(otp) => otp,
            None => return Err(AuthError::NoOtpRequested.into()),
        };

        let device_ok = device_id.map(|d| otp.is_bound_to(d)).unwrap_or(false);
        if !device_ok {
            tracing::warn!(
                username = %user.username,
                event = "login_rejected",
                reason = "device_mismatch",
                "Login from a device the code is not bound to"
            );
            return Err(AuthError::DeviceMismatch.into());
        }

        if otp.is_expired(Utc::now()) {
            return Err(AuthError::OtpExpired.into());
        }

        if !secrets_match(&otp.code, code) {
            tracing::warn!(
                username = %user.username,
                event = "login_rejected",
                reason = "bad_code",
                "Login with an incorrect code"
            );
            return Err(AuthError::BadOtp.into());
        }

        tracing::info!(
            username = %user.username,
            event = "user_login",
            "User logged in"
        );
        Ok(Session::new(
            user.id,
            user.username.clone(),
            UserRole::User,
            otp.expires_at,
        ))
    }

    /// Attempt out-of-band delivery of a freshly issued code
    ///
    /// Never fails the issuance: the outcome is reported as a
    /// [`DeliveryStatus`] for the caller to surface.
    async fn deliver_code(&self, user: &User, otp: &UserOtp) -> DeliveryStatus {
        let address = match user.notify_address.as_deref() {
            Some(address) => address,
            None => {
                tracing::debug!(
                    username = %user.username,
                    event = "otp_delivery_skipped",
                    "No delivery address on file"
                );
                return DeliveryStatus::Skipped;
            }
        };

        let text = format!(
            "Your TrustDial code is {}. It works until {} and only from the device that requested it.",
            otp.code,
            otp.expires_at.format("%Y-%m-%d %H:%M UTC"),
        );

        match self.notifier.send_message(address, &text).await {
            Ok(message_id) => {
                tracing::info!(
                    username = %user.username,
                    channel = self.notifier.channel_name(),
                    message_id = %message_id,
                    event = "otp_delivered",
                    "Delivered one-time code"
                );
                DeliveryStatus::Delivered { message_id }
            }
            Err(reason) => {
                tracing::warn!(
                    username = %user.username,
                    channel = self.notifier.channel_name(),
                    reason = %reason,
                    event = "otp_delivery_failed",
                    "Code delivery failed; issuance stands"
                );
                DeliveryStatus::Failed { reason }
            }
        }
    }
}

/// Constant-time equality for codes and passwords
///
/// The explicit length guard keeps the comparison itself length-equal, so
/// timing reveals nothing about where two equal-length secrets differ.
fn secrets_match(stored: &str, presented: &str) -> bool {
    if stored.len() != presented.len() {
        return false;
    }
    constant_time_eq(stored.as_bytes(), presented.as_bytes())
}
