//! Watch loop runner
//!
//! This module drives the poll cycle:
//! 1. Opens a fresh site session and logs in
//! 2. Fetches and parses the slot listing
//! 3. Filters the slots against the booking window
//! 4. Books every eligible slot and reports each attempt
//! 5. Sleeps a randomized pause and goes again
//!
//! A cycle failure is logged and retried on the next pass unless the error
//! is a configuration problem, which stops the loop.

use crate::bbdc::BbdcClient;
use crate::config::{Config, WatchConfig};
use crate::error::{Result, SlotwatchError};
use crate::notify::Notifier;
use crate::slots::{ListingParser, SlotFilter, SlotRecord};
use crate::watch::delay::RetryDelay;
use crate::watch::metrics::CycleMetrics;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// Outcome of a single poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Slots present in the fetched listing
    pub listed: usize,
    /// Slots that passed the eligibility filter
    pub eligible: usize,
    /// Booking submissions the site accepted
    pub booked: usize,
    /// Booking submissions the site rejected
    pub failed: usize,
}

/// Long-running service that polls the booking site and books eligible slots
///
/// # Example
///
/// ```rust,no_run
/// use slotwatch::bbdc::BbdcClient;
/// use slotwatch::config::Config;
/// use slotwatch::notify::TelegramNotifier;
/// use slotwatch::watch::{UniformDelay, WatchRunner};
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let client = BbdcClient::new(&config.booking)?;
/// let notifier = Arc::new(TelegramNotifier::new(&config.telegram)?);
/// let delay = Arc::new(UniformDelay::new(
///     config.watch.min_delay_secs,
///     config.watch.max_delay_secs,
/// ));
///
/// let runner = WatchRunner::new(&config, client, notifier, delay, false)?;
/// runner.run(CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub struct WatchRunner {
    client: BbdcClient,
    notifier: Arc<dyn Notifier>,
    delay: Arc<dyn RetryDelay>,
    parser: ListingParser,
    filter: SlotFilter,
    watch: WatchConfig,
    dry_run: bool,
}

impl WatchRunner {
    /// Create a new runner from global configuration and wired dependencies
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration with booking and watch settings
    /// * `client` - Booking site client
    /// * `notifier` - Notification channel for booking outcomes
    /// * `delay` - Spacing policy between cycles
    /// * `dry_run` - If true, list eligible slots but never book or notify
    ///
    /// # Errors
    ///
    /// Returns an error if the listing parser cannot be built
    pub fn new(
        config: &Config,
        client: BbdcClient,
        notifier: Arc<dyn Notifier>,
        delay: Arc<dyn RetryDelay>,
        dry_run: bool,
    ) -> Result<Self> {
        let parser = ListingParser::new().map_err(SlotwatchError::Parse)?;
        let filter = SlotFilter::new(&config.watch);

        info!(
            filter = %filter.summary(),
            dry_run = dry_run,
            "Watch runner ready"
        );

        Ok(Self {
            client,
            notifier,
            delay,
            parser,
            filter,
            watch: config.watch.clone(),
            dry_run,
        })
    }

    /// Run poll cycles until cancelled or a fatal error occurs
    ///
    /// Transient failures (network, parsing, site hiccups) are logged and
    /// the loop carries on after the usual pause. Configuration errors stop
    /// the loop and are returned to the caller.
    pub async fn run(&self, cancel: CancellationToken) -> Result<()> {
        let mut cycle_number: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                info!("Watch loop stopped");
                return Ok(());
            }

            cycle_number += 1;
            let metrics = CycleMetrics::new(cycle_number);
            info!(cycle = cycle_number, "Starting poll cycle");

            let cycle = self
                .run_cycle()
                .instrument(tracing::info_span!("poll_cycle", cycle = cycle_number));
            let report = match cycle.await {
                Ok(report) => {
                    metrics.record_completion(
                        report.listed,
                        report.eligible,
                        report.booked,
                        report.failed,
                    );
                    info!(
                        cycle = cycle_number,
                        listed = report.listed,
                        eligible = report.eligible,
                        booked = report.booked,
                        failed = report.failed,
                        "Poll cycle finished"
                    );
                    Some(report)
                }
                Err(e) => {
                    if is_fatal(&e) {
                        error!(error = %e, "Unrecoverable error, stopping watch loop");
                        return Err(e);
                    }
                    metrics.record_error(error_kind(&e));
                    error!(
                        cycle = cycle_number,
                        error = %e,
                        "Poll cycle failed, retrying after the usual pause"
                    );
                    None
                }
            };

            let pause = self.delay.next_delay();
            self.send_countdown(report.as_ref(), pause).await;
            debug!(seconds = pause.as_secs(), "Sleeping until next cycle");

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Watch loop stopped");
                    return Ok(());
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }
    }

    /// Execute one poll cycle: session, login, listing, filter, book
    ///
    /// # Returns
    ///
    /// Returns counts of listed, eligible, booked, and failed slots
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let credential = self.client.open_session().await?;
        self.client.login(&credential).await?;

        let page = self.client.fetch_listing(&credential).await?;
        let slots = self.parser.parse(&page).map_err(SlotwatchError::Parse)?;
        let now = Local::now().naive_local();
        let eligible = self.filter.eligible(&slots, now);

        info!(
            listed = slots.len(),
            eligible = eligible.len(),
            "Listing processed"
        );

        let mut report = CycleReport {
            listed: slots.len(),
            eligible: eligible.len(),
            ..Default::default()
        };

        if self.dry_run {
            if !eligible.is_empty() {
                let rendered = serde_json::to_string_pretty(&eligible)
                    .map_err(SlotwatchError::Serialization)?;
                println!("{}", rendered);
            }
            info!("Dry run, skipping booking and notification");
            return Ok(report);
        }

        for slot in &eligible {
            let outcome = self.client.submit_booking(&credential, &slot.slot_id).await;
            let text = self.booking_message(slot, &outcome);

            match &outcome {
                Ok(()) => {
                    report.booked += 1;
                    info!(slot_id = %slot.slot_id, date = %slot.date, "Booked slot");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(slot_id = %slot.slot_id, error = %e, "Booking attempt failed");
                }
            }

            if let Err(e) = self.notifier.notify(&text).await {
                warn!(slot_id = %slot.slot_id, error = %e, "Failed to deliver booking notification");
            }
        }

        Ok(report)
    }

    /// Compose the per-slot message reflecting what actually happened
    fn booking_message(&self, slot: &SlotRecord, outcome: &Result<()>) -> String {
        let date = slot.date.format("%-d %b %Y (%a)");
        let label = self.watch.session_label(&slot.session_number);

        match outcome {
            Ok(()) => format!("Slot available (and booked) on {} {}", date, label),
            Err(e) => format!(
                "Slot available on {} {}, but the booking attempt failed: {}",
                date, label, e
            ),
        }
    }

    /// Tell the recipients when the next cycle fires
    ///
    /// Failure detail stays in the logs; after a failed cycle the message
    /// carries the countdown alone.
    async fn send_countdown(&self, report: Option<&CycleReport>, pause: Duration) {
        if self.dry_run {
            return;
        }

        let text = match report {
            Some(report) => format!(
                "Checked {} slots, {} eligible. Retrigger in: {}",
                report.listed,
                report.eligible,
                format_countdown(pause)
            ),
            None => format!("Retrigger in: {}", format_countdown(pause)),
        };

        if let Err(e) = self.notifier.notify(&text).await {
            warn!(error = %e, "Failed to deliver countdown message");
        }
    }
}

/// Whether the error should stop the watch loop
fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SlotwatchError>()
        .map_or(false, SlotwatchError::is_fatal)
}

/// Metrics label for a failed cycle
fn error_kind(err: &anyhow::Error) -> &'static str {
    err.downcast_ref::<SlotwatchError>()
        .map_or("other", SlotwatchError::kind)
}

/// Render a pause the way countdown messages show it, e.g. `4m37s`
fn format_countdown(pause: Duration) -> String {
    let secs = pause.as_secs();
    if secs >= 3600 {
        format!("{}h{}m{}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m{}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}
