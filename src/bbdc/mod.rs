//! Booking site access layer
//!
//! This module speaks the legacy ASP frontend of the driving school's
//! booking system: session cookie acquisition, form login, slot listing
//! retrieval, and booking submission.

pub mod client;
pub mod forms;
pub mod session;

pub use client::BbdcClient;
pub use session::SessionCredential;
