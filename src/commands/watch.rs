//! Watch command handler
//!
//! Wires the booking client, notifier, pacing policy, and liveness listener
//! together and hands them to the watch runner. Ctrl-C cancels the loop and
//! brings the listener down with it.

use crate::bbdc::BbdcClient;
use crate::config::Config;
use crate::error::Result;
use crate::health;
use crate::notify::{Notifier, TelegramNotifier};
use crate::watch::metrics::init_metrics_exporter;
use crate::watch::{UniformDelay, WatchRunner};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the watch loop until interrupted
///
/// # Arguments
///
/// * `config` - Validated global configuration
/// * `dry_run` - List eligible slots without booking or notifying
/// * `once` - Run a single poll cycle and exit
///
/// # Errors
///
/// Returns an error if a component cannot be built, the Telegram token
/// fails verification, or the loop hits an unrecoverable error
pub async fn run_watch(config: Config, dry_run: bool, once: bool) -> Result<()> {
    init_metrics_exporter();

    let client = BbdcClient::new(&config.booking)?;
    let telegram = TelegramNotifier::new(&config.telegram)?;

    if dry_run {
        info!("Dry run, skipping Telegram verification");
    } else {
        let bot = telegram.verify().await?;
        info!(bot = %bot, "Telegram bot verified");
    }

    let notifier: Arc<dyn Notifier> = Arc::new(telegram);
    let delay = Arc::new(UniformDelay::new(
        config.watch.min_delay_secs,
        config.watch.max_delay_secs,
    ));
    let port = config.server.port;
    let runner = WatchRunner::new(&config, client, notifier, delay, dry_run)?;

    if once {
        let report = runner.run_cycle().await?;
        info!(
            listed = report.listed,
            eligible = report.eligible,
            booked = report.booked,
            failed = report.failed,
            "Single cycle finished"
        );
        return Ok(());
    }

    let cancel = CancellationToken::new();

    let health_task = tokio::spawn(health::serve(port, cancel.clone()));

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
        signal_cancel.cancel();
    });

    let result = runner.run(cancel.clone()).await;

    // The loop may have exited on its own; pull the listener down too.
    cancel.cancel();
    match health_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Liveness listener failed"),
        Err(e) => warn!(error = %e, "Liveness listener task failed"),
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{listing_page, slot_fragment};
    use chrono::Local;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn site_config(site: &MockServer) -> Config {
        let mut config = Config::default();
        config.booking.base_url = site.uri();
        config.booking.account_id = "1234567".to_string();
        config.booking.nric = "S1234567A".to_string();
        config.booking.password = "hunter2".to_string();
        config.booking.wanted_months = vec!["202506".to_string()];
        config.booking.wanted_sessions = vec!["3".to_string()];
        config.booking.wanted_days = vec!["2".to_string()];
        config.telegram.token = "123:abc".to_string();
        config.telegram.chat_ids = vec![7];
        config
    }

    #[tokio::test]
    async fn test_run_watch_once_dry_run_books_nothing() {
        let site = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bbdc/bbdc_web/newheader.asp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header("set-cookie", "ASPSESSIONID=test1; path=/"),
            )
            .mount(&site)
            .await;
        Mock::given(method("POST"))
            .and(path("/bbdc/bbdc_web/header2.asp"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&site)
            .await;
        let date = (Local::now() + chrono::Duration::days(3))
            .format("%d/%m/%Y (%a)")
            .to_string();
        Mock::given(method("POST"))
            .and(path("/bbdc/b-2-pLessonBooking1.asp"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[
                slot_fragment(&date, "3", "111", "cell1_0"),
            ])))
            .mount(&site)
            .await;
        Mock::given(method("POST"))
            .and(path("/bbdc/b-2-pLessonBookingDetails.asp"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&site)
            .await;

        run_watch(site_config(&site), true, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_watch_fails_fast_on_rejected_token() {
        let telegram = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bot123:abc/getMe"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "ok": false,
                "description": "Unauthorized"
            })))
            .expect(1)
            .mount(&telegram)
            .await;

        let site = MockServer::start().await;
        let mut config = site_config(&site);
        config.telegram.api_base = Some(telegram.uri());

        let err = run_watch(config, false, true).await.unwrap_err();

        assert!(err.to_string().contains("Unauthorized"));
        assert!(site.received_requests().await.unwrap().is_empty());
    }
}
