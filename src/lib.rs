//! Slotwatch - Unattended booking slot watcher library
//!
//! This library provides the core functionality for the slotwatch booking
//! bot, including the booking site client, listing parsing and filtering,
//! the watch loop, and Telegram notification delivery.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `bbdc`: Booking site access (session cookie, login, listing, booking)
//! - `slots`: Listing parser and slot eligibility filter
//! - `watch`: Poll loop, pacing policy, and cycle metrics
//! - `notify`: Notification channel trait and Telegram implementation
//! - `health`: Liveness listener for hosting platforms
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use slotwatch::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     // Runner wiring would go here
//!     Ok(())
//! }
//! ```

pub mod bbdc;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod health;
pub mod notify;
pub mod slots;
pub mod watch;

// Re-export commonly used types
pub use bbdc::BbdcClient;
pub use config::Config;
pub use error::{Result, SlotwatchError};
pub use notify::{Notifier, TelegramNotifier};
pub use slots::{ListingParser, SlotFilter, SlotRecord};
pub use watch::WatchRunner;

#[cfg(test)]
pub mod test_utils;
