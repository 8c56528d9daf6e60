//! Eligibility filtering for parsed slots
//!
//! This module decides which parsed slots are close enough to be
//! interesting but far enough away to be bookable, based on the configured
//! lookahead window and minimum lead time.

use crate::config::WatchConfig;
use crate::slots::SlotRecord;
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Slot filter applying the lookahead window and lead-time floor.
///
/// All arithmetic runs on naive local time against the slot's midnight,
/// matching how the booking site publishes dates without timezones.
#[derive(Debug, Clone)]
pub struct SlotFilter {
    lookahead_days: i64,
    min_lead: Duration,
}

impl SlotFilter {
    /// Create a new slot filter from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Watch configuration carrying the window bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use slotwatch::config::WatchConfig;
    /// use slotwatch::slots::SlotFilter;
    ///
    /// let filter = SlotFilter::new(&WatchConfig::default());
    /// assert!(filter.summary().contains("lookahead=10d"));
    /// ```
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            lookahead_days: config.lookahead_days,
            min_lead: Duration::hours(config.min_lead_hours),
        }
    }

    /// Check whether a slot is worth booking at the given moment.
    ///
    /// The day distance counts a slot later today as one day out, tomorrow
    /// as one day out until its midnight is a full day away, and so on.
    /// A slot qualifies when that distance is strictly inside the lookahead
    /// window and its midnight is strictly more than the minimum lead time
    /// away.
    ///
    /// # Arguments
    ///
    /// * `slot` - Parsed slot record
    /// * `now` - Current naive local time
    pub fn is_eligible(&self, slot: &SlotRecord, now: NaiveDateTime) -> bool {
        let lead = slot.date.and_time(NaiveTime::MIN).signed_duration_since(now);
        let days_from_now = lead.num_hours() / 24 + 1;
        days_from_now < self.lookahead_days && lead > self.min_lead
    }

    /// Keep only the eligible slots, preserving input order.
    pub fn eligible(&self, slots: &[SlotRecord], now: NaiveDateTime) -> Vec<SlotRecord> {
        slots
            .iter()
            .filter(|slot| self.is_eligible(slot, now))
            .cloned()
            .collect()
    }

    /// Get filter summary for logging.
    pub fn summary(&self) -> String {
        format!(
            "lookahead={}d, min_lead={}h",
            self.lookahead_days,
            self.min_lead.num_hours()
        )
    }
}
