//! Slot listing extraction and eligibility filtering
//!
//! This module turns the booking site's tooltip-riddled listing markup into
//! typed slot records and decides which of those records are worth booking.

pub mod filter;
pub mod parser;

pub use filter::SlotFilter;
pub use parser::{ListingParser, ParseError, SlotRecord};
