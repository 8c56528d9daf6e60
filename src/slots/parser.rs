//! Listing page parser for bookable slot markup
//!
//! The booking site renders available slots as HTML checkboxes wrapped in
//! `doTooltipV(...)` mouseover calls. There is no structured API; the slot
//! metadata is recovered from the positional arguments of those calls and
//! from the checkbox `value` attribute that follows them.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Marker that opens every slot tooltip call in the listing page
const FRAGMENT_MARKER: &str = "doTooltipV(";

/// Date layout used inside tooltip arguments, e.g. `05/06/2025`
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Pattern extracting the checkbox value that carries the slot id
const SLOT_ID_PATTERN: &str = r#"value="([^"]+)""#;

/// Minimum number of comma-delimited fields a tooltip fragment must carry
const MIN_FIELDS: usize = 7;

/// One bookable slot recovered from the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    /// Opaque identifier the booking form expects in its `slot` field
    pub slot_id: String,
    /// Calendar day of the lesson
    pub date: NaiveDate,
    /// Session number within the day, kept as the site's own string token
    pub session_number: String,
}

/// Errors raised while extracting slots from a listing page
///
/// Any structural violation poisons the whole batch: a page that parses
/// partially is treated as unparseable so that a reshaped site cannot be
/// half-read into bogus bookings.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The slot id extraction pattern failed to compile
    #[error("invalid slot id pattern: {0}")]
    Pattern(String),

    /// A tooltip fragment carried fewer positional fields than expected
    #[error("fragment {index}: expected at least {MIN_FIELDS} comma-delimited fields, found {found}")]
    TooFewFields { index: usize, found: usize },

    /// A required field was absent or not in the expected shape
    #[error("fragment {index}: missing {what}")]
    MissingField { index: usize, what: &'static str },

    /// The date token did not parse as a day/month/year calendar date
    #[error("fragment {index}: invalid slot date {raw:?}: {reason}")]
    InvalidDate {
        index: usize,
        raw: String,
        reason: String,
    },

    /// Two fragments resolved to the same slot id
    #[error("fragment {index}: duplicate slot id {slot_id:?}")]
    DuplicateSlotId { index: usize, slot_id: String },
}

/// Parser for the booking site's slot listing markup.
///
/// Splits the page on the tooltip marker and reads each fragment
/// positionally. Parsing is pure: the same page always yields the same
/// records, in page order.
pub struct ListingParser {
    slot_id_regex: Regex,
}

impl ListingParser {
    /// Create a new listing parser.
    ///
    /// # Returns
    ///
    /// Returns the parser or an error if the slot id pattern fails to compile
    pub fn new() -> Result<Self, ParseError> {
        let slot_id_regex =
            Regex::new(SLOT_ID_PATTERN).map_err(|e| ParseError::Pattern(e.to_string()))?;
        Ok(Self { slot_id_regex })
    }

    /// Extract every bookable slot from a listing page.
    ///
    /// The text before the first marker is page boilerplate and is ignored.
    /// A page without any marker yields an empty list, not an error.
    ///
    /// # Arguments
    ///
    /// * `page` - Raw HTML body of the listing response
    ///
    /// # Returns
    ///
    /// Returns the slots in page order, or the first structural violation
    ///
    /// # Examples
    ///
    /// ```
    /// use slotwatch::slots::ListingParser;
    ///
    /// let parser = ListingParser::new().unwrap();
    /// let slots = parser.parse("<html><body>no sessions released</body></html>").unwrap();
    /// assert!(slots.is_empty());
    /// ```
    pub fn parse(&self, page: &str) -> Result<Vec<SlotRecord>, ParseError> {
        let mut slots = Vec::new();
        let mut seen_ids = HashSet::new();

        for (index, fragment) in page.split(FRAGMENT_MARKER).skip(1).enumerate() {
            let fields: Vec<&str> = fragment.split(',').collect();
            if fields.len() < MIN_FIELDS {
                return Err(ParseError::TooFewFields {
                    index,
                    found: fields.len(),
                });
            }

            let session_number = quoted(fields[3]).ok_or(ParseError::MissingField {
                index,
                what: "quoted session number (field 3)",
            })?;

            let raw_date = quoted(fields[2]).ok_or(ParseError::MissingField {
                index,
                what: "quoted slot date (field 2)",
            })?;
            // The date field reads like `05/06/2025 (Thu)`; only the part
            // before the first space is the calendar date.
            let date_token = match raw_date.find(' ') {
                Some(space) => &raw_date[..space],
                None => raw_date,
            };
            let date = NaiveDate::parse_from_str(date_token, DATE_FORMAT).map_err(|e| {
                ParseError::InvalidDate {
                    index,
                    raw: date_token.to_string(),
                    reason: e.to_string(),
                }
            })?;

            let slot_id = self
                .slot_id_regex
                .captures(fields[6])
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str().to_string())
                .ok_or(ParseError::MissingField {
                    index,
                    what: "slot id value attribute (field 6)",
                })?;

            if !seen_ids.insert(slot_id.clone()) {
                return Err(ParseError::DuplicateSlotId { index, slot_id });
            }

            slots.push(SlotRecord {
                slot_id,
                date,
                session_number: session_number.to_string(),
            });
        }

        Ok(slots)
    }
}

/// Content between the first pair of double quotes in a field, if any
fn quoted(field: &str) -> Option<&str> {
    let start = field.find('"')? + 1;
    let end = field[start..].find('"')? + start;
    Some(&field[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{listing_page, slot_fragment};

    fn parser() -> ListingParser {
        ListingParser::new().unwrap()
    }

    #[test]
    fn test_page_without_markers_yields_no_slots() {
        let slots = parser()
            .parse("<html><body><p>No practical sessions released.</p></body></html>")
            .unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_empty_page_yields_no_slots() {
        let slots = parser().parse("").unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_single_fragment_extraction() {
        let page = listing_page(&[slot_fragment(
            "05/06/2025 (Thu)",
            "3",
            "1893904",
            "cell145_2",
        )]);
        let slots = parser().parse(&page).unwrap();

        assert_eq!(
            slots,
            vec![SlotRecord {
                slot_id: "1893904".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
                session_number: "3".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_fragments_keep_page_order() {
        let page = listing_page(&[
            slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
            slot_fragment("07/06/2025 (Sat)", "1", "1893905", "cell146_0"),
            slot_fragment("09/06/2025 (Mon)", "5", "1893906", "cell147_4"),
        ]);
        let slots = parser().parse(&page).unwrap();

        let ids: Vec<&str> = slots.iter().map(|s| s.slot_id.as_str()).collect();
        assert_eq!(ids, vec!["1893904", "1893905", "1893906"]);
        assert_eq!(slots[1].date, NaiveDate::from_ymd_opt(2025, 6, 7).unwrap());
        assert_eq!(slots[2].session_number, "5");
    }

    #[test]
    fn test_boilerplate_before_first_marker_is_dropped() {
        let fragment = slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2");
        let page = format!(
            "<script>var a = \"commas, quotes, and noise\";</script>{fragment}"
        );
        let slots = parser().parse(&page).unwrap();
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_date_without_weekday_suffix_parses() {
        let page = listing_page(&[slot_fragment("05/06/2025", "3", "1893904", "cell145_2")]);
        let slots = parser().parse(&page).unwrap();
        assert_eq!(slots[0].date, NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
    }

    #[test]
    fn test_malformed_date_poisons_whole_batch() {
        let page = listing_page(&[
            slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
            slot_fragment("garbage (Thu)", "3", "1893905", "cell145_3"),
        ]);
        let err = parser().parse(&page).unwrap_err();
        match err {
            ParseError::InvalidDate { index, raw, .. } => {
                assert_eq!(index, 1);
                assert_eq!(raw, "garbage");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn test_fragment_with_too_few_fields_fails() {
        let page = "prefix doTooltipV(event,0, \"05/06/2025\")".to_string();
        let err = parser().parse(&page).unwrap_err();
        assert!(matches!(err, ParseError::TooFewFields { index: 0, .. }));
    }

    #[test]
    fn test_unquoted_session_field_fails() {
        let fragment = slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2");
        let page = fragment.replacen("\"3\"", "3", 1);
        let err = parser().parse(&page).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                index: 0,
                what: "quoted session number (field 3)",
            }
        ));
    }

    #[test]
    fn test_fragment_without_value_attribute_fails() {
        let fragment = slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2");
        let page = fragment.replace("value=\"1893904\"", "");
        let err = parser().parse(&page).unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingField {
                index: 0,
                what: "slot id value attribute (field 6)",
            }
        ));
    }

    #[test]
    fn test_duplicate_slot_ids_fail() {
        let page = listing_page(&[
            slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
            slot_fragment("07/06/2025 (Sat)", "1", "1893904", "cell146_0"),
        ]);
        let err = parser().parse(&page).unwrap_err();
        match err {
            ParseError::DuplicateSlotId { index, slot_id } => {
                assert_eq!(index, 1);
                assert_eq!(slot_id, "1893904");
            }
            other => panic!("expected DuplicateSlotId, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_is_repeatable() {
        let page = listing_page(&[
            slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
            slot_fragment("07/06/2025 (Sat)", "1", "1893905", "cell146_0"),
        ]);
        let p = parser();
        assert_eq!(p.parse(&page).unwrap(), p.parse(&page).unwrap());
    }

    #[test]
    fn test_slot_record_serializes_date_as_iso() {
        let record = SlotRecord {
            slot_id: "1893904".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 5).unwrap(),
            session_number: "3".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"2025-06-05\""));
        assert!(json.contains("\"1893904\""));
    }
}
