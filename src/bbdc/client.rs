//! HTTP client for the booking site
//!
//! This module implements the four-step conversation the legacy frontend
//! expects: acquire a session cookie, log in, pull the slot listing, and
//! submit bookings. Every call attaches the session cookie by hand and
//! treats the site's status codes as the only reliable signal, because the
//! response bodies are decorative ASP-era HTML.

use crate::bbdc::forms;
use crate::bbdc::SessionCredential;
use crate::config::BookingConfig;
use crate::error::{Result, SlotwatchError};
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

/// First-contact page whose response sets the session cookie
const SESSION_PATH: &str = "/bbdc/bbdc_web/newheader.asp";

/// Login form handler
const LOGIN_PATH: &str = "/bbdc/bbdc_web/header2.asp";

/// Slot listing query handler
const LISTING_PATH: &str = "/bbdc/b-2-pLessonBooking1.asp";

/// Booking submission handler
const BOOKING_PATH: &str = "/bbdc/b-2-pLessonBookingDetails.asp";

/// Client for the driving school's booking frontend
pub struct BbdcClient {
    client: Client,
    config: BookingConfig,
}

impl BbdcClient {
    /// Create a new booking client
    ///
    /// # Arguments
    ///
    /// * `config` - Booking site configuration with credentials and wanted slots
    ///
    /// # Returns
    ///
    /// Returns a new client instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &BookingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("slotwatch/0.2.0")
            .build()
            .map_err(|e| {
                SlotwatchError::Transport(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized booking client: base_url={}, timeout={}s",
            config.base_url,
            config.request_timeout_secs
        );

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Acquire a fresh session cookie from the site's first-contact page
    ///
    /// The first cookie of the response is the session credential; any
    /// further cookies are tracking noise and ignored.
    pub async fn open_session(&self) -> Result<SessionCredential> {
        let url = self.endpoint(SESSION_PATH);
        tracing::debug!(url = %url, "Requesting session cookie");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        check_status("session request", response.status())?;

        let cookie = response.cookies().next().ok_or_else(|| {
            SlotwatchError::Transport("session endpoint issued no cookies".to_string())
        })?;
        let credential = SessionCredential::new(cookie.name(), cookie.value());
        tracing::debug!(cookie = credential.name(), "Acquired session cookie");

        Ok(credential)
    }

    /// Bind the session to the configured account by submitting the login form
    ///
    /// The site never confirms a login in a machine-readable way; a
    /// successful status is all there is to check. A wrong password shows
    /// up later as an empty or rejected listing.
    pub async fn login(&self, credential: &SessionCredential) -> Result<()> {
        let url = self.endpoint(LOGIN_PATH);
        tracing::debug!(url = %url, "Submitting login form");

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, credential.cookie_header())
            .form(&forms::login_form(&self.config.nric, &self.config.password))
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        check_status("login", response.status())?;
        tracing::debug!("Login form accepted");

        Ok(())
    }

    /// Fetch the slot listing page for the configured months, sessions,
    /// and days
    ///
    /// # Returns
    ///
    /// Returns the raw HTML body for the parser to pick apart
    pub async fn fetch_listing(&self, credential: &SessionCredential) -> Result<String> {
        let url = self.endpoint(LISTING_PATH);
        tracing::info!(
            months = ?self.config.wanted_months,
            sessions = ?self.config.wanted_sessions,
            days = ?self.config.wanted_days,
            "Requesting slot listing"
        );

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, credential.cookie_header())
            .form(&forms::listing_form(&self.config))
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        check_status("listing request", response.status())?;

        let body = response.text().await.map_err(SlotwatchError::Http)?;
        tracing::debug!(bytes = body.len(), "Received listing page");

        Ok(body)
    }

    /// Submit a booking for a single slot id
    pub async fn submit_booking(
        &self,
        credential: &SessionCredential,
        slot_id: &str,
    ) -> Result<()> {
        let url = self.endpoint(BOOKING_PATH);
        tracing::info!(slot_id = slot_id, "Submitting booking");

        let response = self
            .client
            .post(&url)
            .header(header::COOKIE, credential.cookie_header())
            .form(&forms::booking_form(&self.config.account_id, slot_id))
            .send()
            .await
            .map_err(SlotwatchError::Http)?;

        check_status("booking", response.status())?;

        Ok(())
    }
}

/// Map a response status to the error taxonomy
///
/// An explicit 401/403 is the site refusing the request outright, which is
/// worth distinguishing from the everyday flakiness of the legacy stack.
fn check_status(operation: &str, status: StatusCode) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(
            SlotwatchError::RemoteRejection(format!("{} rejected with {}", operation, status))
                .into(),
        );
    }
    if !status.is_success() {
        return Err(SlotwatchError::Transport(format!("{} returned {}", operation, status)).into());
    }
    Ok(())
}
