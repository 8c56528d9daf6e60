//! Form payload builders for the booking site
//!
//! The ASP frontend is driven entirely by `application/x-www-form-urlencoded`
//! POSTs whose field names and ordering come straight from its HTML forms.
//! Repeated `Month`/`Session`/`Day` fields express multi-select choices, so
//! payloads are built as ordered pairs rather than maps.

use crate::config::BookingConfig;

/// Literal submit-button value the login form sends
///
/// The plus signs are part of the value itself and travel percent-encoded
/// on the wire.
const LOGIN_BUTTON: &str = "ACCESS+TO+BOOKING+SYSTEM";

/// Fixed venue selectors the listing form always posts
const DEFAULT_VENUE: &str = "1";

/// Login form fields
pub fn login_form(nric: &str, password: &str) -> Vec<(&'static str, String)> {
    vec![
        ("txtNRIC", nric.to_string()),
        ("txtpassword", password.to_string()),
        ("btnLogin", LOGIN_BUTTON.to_string()),
    ]
}

/// Slot listing query fields, with one entry per wanted month, session,
/// and day
pub fn listing_form(config: &BookingConfig) -> Vec<(&'static str, String)> {
    let mut form = vec![("accId", config.account_id.clone())];
    for month in &config.wanted_months {
        form.push(("Month", month.clone()));
    }
    for session in &config.wanted_sessions {
        form.push(("Session", session.clone()));
    }
    for day in &config.wanted_days {
        form.push(("Day", day.clone()));
    }
    form.push(("defPLVenue", DEFAULT_VENUE.to_string()));
    form.push(("optVenue", DEFAULT_VENUE.to_string()));
    form
}

/// Booking submission fields for a single slot
pub fn booking_form(account_id: &str, slot_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("accId", account_id.to_string()),
        ("slot", slot_id.to_string()),
    ]
}
