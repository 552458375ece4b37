//! Scenario tests for the authentication service

use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::user::{User, UserOtp, UserRole};
use crate::domain::value_objects::DeliveryStatus;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{MockUserRepository, UserRepository};
use crate::services::auth::{AuthService, AuthServiceConfig};

use super::mocks::MockNotifier;

fn service(
    repo: &Arc<MockUserRepository>,
    notifier: &Arc<MockNotifier>,
) -> AuthService<MockUserRepository, MockNotifier> {
    AuthService::new(
        Arc::clone(repo),
        Arc::clone(notifier),
        AuthServiceConfig::default(),
    )
}

fn active_otp(device_id: &str) -> UserOtp {
    UserOtp {
        code: "246802".to_string(),
        expires_at: Utc::now() + Duration::hours(6),
        requested_at: Utc::now() - Duration::minutes(1),
        device_id: device_id.to_string(),
    }
}

fn expired_otp(device_id: &str) -> UserOtp {
    UserOtp {
        code: "246802".to_string(),
        expires_at: Utc::now() - Duration::hours(1),
        requested_at: Utc::now() - Duration::hours(20),
        device_id: device_id.to_string(),
    }
}

#[tokio::test]
async fn test_request_for_unknown_user_fails() {
    let repo = Arc::new(MockUserRepository::new());
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let result = auth.request_otp("ghost", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_request_for_admin_is_indistinguishable_from_unknown() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("root", UserRole::Admin).with_static_password("s3cret"))
        .await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let result = auth.request_otp("root", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_request_mints_device_and_skips_delivery() {
    let repo = Arc::new(MockUserRepository::new());
    let user = User::new("alice", UserRole::User);
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let issued = auth.request_otp("alice", None).await.unwrap();

    // No address on file: issuance stands, nothing was sent.
    assert_eq!(issued.delivery, DeliveryStatus::Skipped);
    assert_eq!(notifier.sent_count(), 0);
    assert!(Uuid::parse_str(&issued.device_id).is_ok());
    assert!(issued.expires_at > Utc::now());

    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    let otp = stored.otp.unwrap();
    assert_eq!(otp.device_id, issued.device_id);
    assert_eq!(otp.expires_at, issued.expires_at);
}

#[tokio::test]
async fn test_request_reuses_presented_device() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("alice", UserRole::User)).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let issued = auth.request_otp("alice", Some("pixel-7-a1b2")).await.unwrap();
    assert_eq!(issued.device_id, "pixel-7-a1b2");
}

#[tokio::test]
async fn test_request_delivers_code_out_of_band() {
    let repo = Arc::new(MockUserRepository::new());
    let user = User::new("alice", UserRole::User).with_notify_address("8814420");
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let issued = auth.request_otp("alice", None).await.unwrap();

    assert!(matches!(issued.delivery, DeliveryStatus::Delivered { .. }));
    let (address, text) = notifier.last_message().unwrap();
    assert_eq!(address, "8814420");

    // The message carries the stored code; the issuance result does not.
    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(text.contains(&stored.otp.unwrap().code));
}

#[tokio::test]
async fn test_request_delivery_failure_is_advisory() {
    let repo = Arc::new(MockUserRepository::new());
    let user = User::new("alice", UserRole::User).with_notify_address("8814420");
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::failing("provider unreachable"));
    let auth = service(&repo, &notifier);

    let issued = auth.request_otp("alice", None).await.unwrap();

    assert_eq!(
        issued.delivery,
        DeliveryStatus::Failed {
            reason: "provider unreachable".to_string()
        }
    );

    // Issuance committed before delivery was attempted.
    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert!(stored.otp.is_some());
}

#[tokio::test]
async fn test_second_request_from_bound_device_already_issued() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("alice", UserRole::User)).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let issued = auth.request_otp("alice", Some("pixel-7-a1b2")).await.unwrap();
    assert_eq!(issued.device_id, "pixel-7-a1b2");

    let result = auth.request_otp("alice", Some("pixel-7-a1b2")).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::AlreadyIssued)
    ));
}

#[tokio::test]
async fn test_second_request_from_other_device_conflicts() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("alice", UserRole::User)).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    auth.request_otp("alice", Some("pixel-7-a1b2")).await.unwrap();

    let other_device = auth.request_otp("alice", Some("iphone-15-c3d4")).await;
    assert!(matches!(
        other_device.unwrap_err(),
        DomainError::Auth(AuthError::DeviceConflict)
    ));

    // Presenting no identifier at all is also a conflict while a binding
    // is active.
    let no_device = auth.request_otp("alice", None).await;
    assert!(matches!(
        no_device.unwrap_err(),
        DomainError::Auth(AuthError::DeviceConflict)
    ));
}

#[tokio::test]
async fn test_expired_code_frees_the_binding() {
    let repo = Arc::new(MockUserRepository::new());
    let mut user = User::new("alice", UserRole::User);
    user.set_otp(expired_otp("pixel-7-a1b2"));
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    // A different device can claim the account once the old code is dead.
    let issued = auth.request_otp("alice", Some("iphone-15-c3d4")).await.unwrap();
    assert_eq!(issued.device_id, "iphone-15-c3d4");

    let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.otp.unwrap().device_id, "iphone-15-c3d4");
}

#[tokio::test]
async fn test_admin_login_grants_long_session() {
    let repo = Arc::new(MockUserRepository::new());
    let admin = User::new("root", UserRole::Admin).with_static_password("s3cret");
    repo.insert(admin.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    // The presented device identifier is irrelevant for admins.
    let session = auth.login("root", "s3cret", Some("anything")).await.unwrap();

    assert_eq!(session.user_id, admin.id);
    assert!(session.is_admin());
    assert!(session.is_active());
    assert!(session.remaining() > Duration::days(364));
}

#[tokio::test]
async fn test_admin_login_rejects_bad_password() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("root", UserRole::Admin).with_static_password("s3cret"))
        .await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let result = auth.login("root", "wrong", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidAdminCredentials)
    ));
}

#[tokio::test]
async fn test_admin_login_rejects_account_without_password() {
    let repo = Arc::new(MockUserRepository::new());
    repo.insert(User::new("root", UserRole::Admin)).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let result = auth.login("root", "anything", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::InvalidAdminCredentials)
    ));
}

#[tokio::test]
async fn test_user_login_session_dies_with_the_code() {
    let repo = Arc::new(MockUserRepository::new());
    let mut user = User::new("alice", UserRole::User);
    let otp = active_otp("pixel-7-a1b2");
    user.set_otp(otp.clone());
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let session = auth
        .login("alice", "246802", Some("pixel-7-a1b2"))
        .await
        .unwrap();

    assert_eq!(session.user_id, user.id);
    assert!(!session.is_admin());
    assert_eq!(session.expires_at, otp.expires_at);
}

#[tokio::test]
async fn test_user_login_failure_order() {
    let repo = Arc::new(MockUserRepository::new());
    let mut user = User::new("alice", UserRole::User);
    repo.insert(user.clone()).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    // No code requested yet.
    let result = auth.login("alice", "246802", Some("pixel-7-a1b2")).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::NoOtpRequested)
    ));

    // An expired code on another device still reports the device first.
    user.set_otp(expired_otp("pixel-7-a1b2"));
    repo.update_otp(
        user.id,
        user.otp.as_ref(),
        None,
    )
    .await
    .unwrap();

    let wrong_device = auth.login("alice", "246802", Some("iphone-15-c3d4")).await;
    assert!(matches!(
        wrong_device.unwrap_err(),
        DomainError::Auth(AuthError::DeviceMismatch)
    ));

    let absent_device = auth.login("alice", "246802", None).await;
    assert!(matches!(
        absent_device.unwrap_err(),
        DomainError::Auth(AuthError::DeviceMismatch)
    ));

    // Right device, dead code.
    let expired = auth.login("alice", "246802", Some("pixel-7-a1b2")).await;
    assert!(matches!(
        expired.unwrap_err(),
        DomainError::Auth(AuthError::OtpExpired)
    ));

    // Fresh code, wrong digits.
    let previous = user.otp.as_ref().map(|o| o.requested_at);
    repo.update_otp(user.id, Some(&active_otp("pixel-7-a1b2")), previous)
        .await
        .unwrap();

    let bad_code = auth.login("alice", "000000", Some("pixel-7-a1b2")).await;
    assert!(matches!(
        bad_code.unwrap_err(),
        DomainError::Auth(AuthError::BadOtp)
    ));
}

#[tokio::test]
async fn test_login_unknown_user() {
    let repo = Arc::new(MockUserRepository::new());
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let result = auth.login("ghost", "246802", None).await;
    assert!(matches!(
        result.unwrap_err(),
        DomainError::Auth(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_code_survives_logout() {
    let repo = Arc::new(MockUserRepository::new());
    let mut user = User::new("alice", UserRole::User);
    user.set_otp(active_otp("pixel-7-a1b2"));
    repo.insert(user).await;
    let notifier = Arc::new(MockNotifier::new());
    let auth = service(&repo, &notifier);

    let first = auth
        .login("alice", "246802", Some("pixel-7-a1b2"))
        .await
        .unwrap();
    let expires_at = first.expires_at;
    auth.logout(first);

    // Same code, same device, fresh session with the same horizon.
    let second = auth
        .login("alice", "246802", Some("pixel-7-a1b2"))
        .await
        .unwrap();
    assert_eq!(second.expires_at, expires_at);
}
