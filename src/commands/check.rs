//! Check command handler
//!
//! Proves the configuration against the live endpoints without touching any
//! bookings: verifies the Telegram token and opens a throwaway session on
//! the booking site.

use crate::bbdc::BbdcClient;
use crate::config::Config;
use crate::error::Result;
use crate::notify::TelegramNotifier;
use tracing::info;

/// Verify the configured endpoints and print a short report
///
/// # Errors
///
/// Returns an error if the Telegram token is rejected or the booking site
/// does not hand out a session cookie
pub async fn run_check(config: &Config) -> Result<()> {
    let telegram = TelegramNotifier::new(&config.telegram)?;
    let bot = telegram.verify().await?;
    info!(bot = %bot, "Telegram token verified");

    let client = BbdcClient::new(&config.booking)?;
    let credential = client.open_session().await?;
    info!(cookie = credential.name(), "Booking site reachable");

    println!("Configuration OK");
    println!("  Telegram bot: @{} ({} recipients)", bot, config.telegram.chat_ids.len());
    println!(
        "  Booking site: {} (session cookie {})",
        config.booking.base_url,
        credential.name()
    );
    println!(
        "  Watching: months={:?} sessions={:?} days={:?}",
        config.booking.wanted_months, config.booking.wanted_sessions, config.booking.wanted_days
    );

    Ok(())
}
