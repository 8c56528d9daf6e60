//! Watch loop for polling the booking site
//!
//! This module ties the booking client, listing parser, slot filter, and
//! notification channel into the long-running poll/book/report cycle.

pub mod delay;
pub mod metrics;
pub mod runner;

pub use delay::{FixedDelay, RetryDelay, UniformDelay};
pub use runner::{CycleReport, WatchRunner};
