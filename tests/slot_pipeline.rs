//! Listing-to-decision pipeline tests
//!
//! Feeds realistic listing markup through the parser and filter with a
//! pinned clock, checking which slots come out bookable.

use chrono::NaiveDate;
use slotwatch::config::WatchConfig;
use slotwatch::{ListingParser, SlotFilter};

mod common;

fn pinned_now(hour: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

#[test]
fn test_eligible_slots_from_realistic_page() {
    let page = common::listing_page(&[
        // Four days out: bookable
        common::slot_fragment("05/06/2025 (Thu)", "3", "1893904", "cell145_2"),
        // Later today: too close
        common::slot_fragment("01/06/2025 (Sun)", "1", "1893801", "cell140_0"),
        // Tomorrow, fourteen hours of lead: bookable
        common::slot_fragment("02/06/2025 (Mon)", "5", "1893850", "cell141_4"),
        // Ten days out: beyond the booking window
        common::slot_fragment("11/06/2025 (Wed)", "2", "1893999", "cell150_1"),
    ]);

    let slots = ListingParser::new().unwrap().parse(&page).unwrap();
    assert_eq!(slots.len(), 4);

    let filter = SlotFilter::new(&WatchConfig::default());
    let eligible = filter.eligible(&slots, pinned_now(10));

    let ids: Vec<&str> = eligible.iter().map(|s| s.slot_id.as_str()).collect();
    assert_eq!(ids, vec!["1893904", "1893850"]);
}

#[test]
fn test_exact_minimum_lead_is_not_enough() {
    let page = common::listing_page(&[common::slot_fragment(
        "02/06/2025 (Mon)",
        "5",
        "1893850",
        "cell141_4",
    )]);

    let slots = ListingParser::new().unwrap().parse(&page).unwrap();
    let filter = SlotFilter::new(&WatchConfig::default());

    // At noon the slot is exactly twelve hours away, which the default
    // minimum lead excludes.
    assert!(filter.eligible(&slots, pinned_now(12)).is_empty());
    assert_eq!(filter.eligible(&slots, pinned_now(11)).len(), 1);
}

#[test]
fn test_pages_without_slots_produce_empty_listing() {
    let page = common::listing_page(&[]);

    let slots = ListingParser::new().unwrap().parse(&page).unwrap();

    assert!(slots.is_empty());
}
