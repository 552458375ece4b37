//! End-to-end walkthrough of the TrustDial core over the in-memory stores
//!
//! This demo shows how the pieces wire together:
//! - Provisioning an administrator and a regular user
//! - Requesting a one-time code and logging in from the bound device
//! - Reporting a number, reviewing it, and watching the danger flag move
//! - Reading the audit trail the mutations left behind
//!
//! Run with `cargo run --bin trustdial_demo`. Everything happens
//! in-process; set `NOTIFIER_PROVIDER=telegram`, `TELEGRAM_BOT_TOKEN` and
//! `DEMO_CHAT_ID` to have the code delivered to a real chat instead of the
//! console.

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tracing_subscriber::EnvFilter;

use td_core::domain::entities::{NewPhoneRecord, Polarity, User, UserRole};
use td_core::domain::value_objects::DeliveryStatus;
use td_core::repositories::{
    MockAuditLogRepository, MockDirectoryRepository, MockUserRepository, UserRepository,
};
use td_core::services::auth::{AuthService, AuthServiceConfig, NotifierService};
use td_core::services::ledger::{LedgerConfig, LedgerService};
use td_infra::{create_notifier, load_environment};
use td_shared::config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    load_environment();
    let config = AppConfig::from_env();

    println!("TrustDial Walkthrough");
    println!("=====================\n");

    // 1. Wire the stores and services together
    let users = Arc::new(MockUserRepository::new());
    let directory = Arc::new(MockDirectoryRepository::new());
    let audit_log = Arc::new(MockAuditLogRepository::new());
    let notifier: Arc<dyn NotifierService> = Arc::from(create_notifier(&config.notifier));

    let auth = AuthService::new(
        Arc::clone(&users),
        notifier,
        AuthServiceConfig::from(&config.auth),
    );
    let ledger = LedgerService::new(
        Arc::clone(&directory),
        Arc::clone(&audit_log),
        LedgerConfig::default(),
    );

    println!(
        "Codes expire daily at {:02}:00 (UTC{:+})\n",
        config.auth.cutoff_hour, config.auth.utc_offset_hours
    );

    // 2. Provision accounts
    let admin_password =
        std::env::var("DEMO_ADMIN_PASSWORD").unwrap_or_else(|_| "demo-admin-password".to_string());
    let warden = users
        .create(User::new("warden", UserRole::Admin).with_static_password(admin_password.clone()))
        .await?;

    let mut nadia = User::new("nadia", UserRole::User);
    if let Ok(chat_id) = std::env::var("DEMO_CHAT_ID") {
        nadia = nadia.with_notify_address(chat_id);
    }
    let nadia = users.create(nadia).await?;
    println!("Provisioned accounts: warden (admin), nadia (user)\n");

    // 3. Request a one-time code for nadia
    let issued = auth.request_otp("nadia", None).await?;
    println!("Issued a code bound to device {}", issued.device_id);
    println!("The code works until {}", issued.expires_at);
    match &issued.delivery {
        DeliveryStatus::Delivered { message_id } => {
            println!("Delivered out of band (message id {})\n", message_id)
        }
        DeliveryStatus::Skipped => println!("No delivery address on file; nothing sent\n"),
        DeliveryStatus::Failed { reason } => {
            println!("Delivery failed ({}); the code is still valid\n", reason)
        }
    }

    // The client reads the code out of band; the demo peeks at the store
    let code = users
        .find_by_username("nadia")
        .await?
        .and_then(|u| u.otp)
        .map(|otp| otp.code)
        .context("no code on file for nadia")?;

    // 4. Log in from the bound device
    let session = auth.login("nadia", &code, Some(&issued.device_id)).await?;
    ensure!(
        session.expires_at == issued.expires_at,
        "session must die exactly when the code does"
    );
    println!("nadia logged in; session expires {}", session.expires_at);

    auth.logout(session);
    println!("nadia logged out; the code stays valid until the cutoff\n");

    // 5. Report a number with a seed rating and first comment
    let submission = NewPhoneRecord::new("+7 915 000-11-22", -1, true)
        .with_initial_comment("Robocall offering free legal help");
    let record = ledger.add_phone_record(submission, nadia.id).await?;
    ensure!(record.is_dangerous, "a negative rating must flag the number");
    println!(
        "Reported {} with rating {} (dangerous: {})",
        record.phone_number, record.rating, record.is_dangerous
    );

    // 6. The administrator reviews the report
    let admin_session = auth.login("warden", &admin_password, None).await?;
    ensure!(admin_session.is_admin(), "warden must hold an admin session");

    for _ in 0..2 {
        ledger
            .adjust_rating(record.id, Polarity::Positive, warden.id)
            .await?;
    }
    let reviewed = ledger.get_record(record.id).await?;
    println!(
        "After two positive adjustments: rating {} (dangerous: {})",
        reviewed.rating, reviewed.is_dangerous
    );

    // 7. A later negative comment moves the rating back down
    ledger
        .add_comment(record.id, "Still calling after the report", false, nadia.id)
        .await?;
    let current = ledger.get_record(record.id).await?;
    ensure!(
        current.rating == 0 && !current.is_dangerous,
        "zero rating must read as safe"
    );
    println!(
        "After a negative comment: rating {} (dangerous: {})\n",
        current.rating, current.is_dangerous
    );

    println!("Comments on {}:", current.phone_number);
    for comment in ledger.list_comments(record.id).await? {
        let sign = if comment.is_positive { "+" } else { "-" };
        println!("  [{}] {}", sign, comment.text);
    }

    println!("\nAudit trail (newest first):");
    for entry in ledger.audit().recent_entries(10).await? {
        println!("  {:<16} {}", entry.action.as_str(), entry.details);
    }

    Ok(())
}
