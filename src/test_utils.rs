//! Test utilities for Slotwatch
//!
//! This module provides common test helpers for fabricating listing-page
//! markup and slot records without going through a live booking site.

use crate::error::{Result, SlotwatchError};
use crate::notify::Notifier;
use crate::slots::SlotRecord;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Mutex;

/// Build one slot tooltip fragment the way the booking site renders it
///
/// # Arguments
///
/// * `date_display` - Date argument as shown on the page, e.g. `05/06/2025 (Thu)`
/// * `session` - Session number argument, e.g. `3`
/// * `slot_id` - Checkbox value carrying the bookable slot id
/// * `cell` - Table cell id used by the page's mouseover handlers
///
/// # Returns
///
/// Returns the `doTooltipV(...)` call plus the checkbox markup that follows it
pub fn slot_fragment(date_display: &str, session: &str, slot_id: &str, cell: &str) -> String {
    format!(
        "doTooltipV(event,0, \"{date_display}\",\"{session}\",\"11:30\",\"13:10\",\"BBDC\"); \
         SetMouseOverToggleColor(\"{cell}\") ' onmouseout='hideTip(); \
         SetMouseOverToggleColor(\"{cell}\")'><input type=\"checkbox\" id=\"{cell}\" \
         name=\"slot\" value=\"{slot_id}\" onclick=\"SetCountAndToggleColor('{cell}');\">"
    )
}

/// Wrap slot fragments in the listing page's surrounding boilerplate
pub fn listing_page(fragments: &[String]) -> String {
    let mut page = String::from(
        "<html><body><form name=\"myform\"><table class=\"booking\"><tr><td onmouseover='",
    );
    page.push_str(&fragments.join("</td><td onmouseover='"));
    page.push_str("</td></tr></table></form></body></html>");
    page
}

/// Build a slot record directly, bypassing the parser
pub fn slot(slot_id: &str, year: i32, month: u32, day: u32, session: &str) -> SlotRecord {
    SlotRecord {
        slot_id: slot_id.to_string(),
        date: NaiveDate::from_ymd_opt(year, month, day).expect("valid test date"),
        session_number: session.to_string(),
    }
}

/// Notifier double that captures delivered messages in memory
///
/// Set `fail` to make every delivery return an error while still recording
/// the attempted message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Messages delivered so far, in order
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) -> Result<()> {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(text.to_string());
        if self.fail {
            return Err(SlotwatchError::Notify("recording notifier set to fail".to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_fragment_has_marker_and_value() {
        let fragment = slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2");
        assert!(fragment.starts_with("doTooltipV("));
        assert!(fragment.contains("value=\"1893904\""));
    }

    #[test]
    fn test_listing_page_wraps_all_fragments() {
        let page = listing_page(&[
            slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
            slot_fragment("07/06/2025 (Sat)", "1", "1893905", "cell146_0"),
        ]);
        assert_eq!(page.matches("doTooltipV(").count(), 2);
        assert!(page.starts_with("<html>"));
    }

    #[tokio::test]
    async fn test_recording_notifier_captures_messages() {
        let notifier = RecordingNotifier::new();

        notifier.notify("first").await.unwrap();
        notifier.notify("second").await.unwrap();

        assert_eq!(notifier.messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_failing_notifier_records_then_errors() {
        let notifier = RecordingNotifier::failing();

        let result = notifier.notify("doomed").await;

        assert!(result.is_err());
        assert_eq!(notifier.messages(), vec!["doomed"]);
    }
}
