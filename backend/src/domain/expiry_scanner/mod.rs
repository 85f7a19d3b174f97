//! Background scanner that warns owners about medicines nearing expiry.
//!
//! One pass enumerates every stored medicine, alerts the owner of each record
//! expiring inside the configured window, then the loop sleeps for a fixed
//! interval. Failures are isolated to the record they concern and collected
//! in a [`ScanReport`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use crate::domain::ports::{MedicineRecordError, MedicineRepositoryError, UserRepositoryError};
use crate::domain::{DispatchReport, ExpiryWindow, Medicine, NotificationDispatcher};

mod runtime;

pub use runtime::{ExpiryScannerPorts, TokioSleeper};

/// Default pause between two scans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Scanner timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryScannerConfig {
    /// Sleep after each pass, regardless of how long the pass took.
    pub interval: Duration,
    /// How far ahead a medicine counts as expiring soon.
    pub window: ExpiryWindow,
}

impl Default for ExpiryScannerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SCAN_INTERVAL,
            window: ExpiryWindow::default(),
        }
    }
}

/// Suspends the scan loop between passes.
#[async_trait]
pub trait ScanSleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Why a record produced no alert in a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanSkipReason {
    UndecodableRecord(MedicineRecordError),
    OwnerMissing,
    OwnerWithoutPhone,
    OwnerLookupFailed(UserRepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSkip {
    pub record_id: String,
    pub reason: ScanSkipReason,
}

/// Summary of one scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Records enumerated, decodable or not.
    pub examined: usize,
    /// Records inside the expiry window.
    pub due: usize,
    pub dispatch: DispatchReport,
    pub skipped: Vec<ScanSkip>,
    /// Set when the medicines could not be enumerated at all.
    pub aborted: Option<MedicineRepositoryError>,
}

/// Format the periodic expiry alert.
pub fn scan_alert_message(medicine: &Medicine, days_remaining: i64) -> String {
    format!(
        "⚠️ Your medicine '{}' is expiring in {} days (on {}).",
        medicine.name(),
        days_remaining,
        medicine.expires_at().format("%Y-%m-%d"),
    )
}

/// Domain-owned expiry scanner.
pub struct ExpiryScanner {
    ports: ExpiryScannerPorts,
    dispatcher: Arc<NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    config: ExpiryScannerConfig,
}

impl ExpiryScanner {
    pub fn new(
        ports: ExpiryScannerPorts,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        config: ExpiryScannerConfig,
    ) -> Self {
        Self {
            ports,
            dispatcher,
            clock,
            config,
        }
    }

    pub fn config(&self) -> ExpiryScannerConfig {
        self.config
    }

    /// Run a single pass over every stored medicine.
    pub async fn scan_once(&self) -> ScanReport {
        let mut report = ScanReport::default();
        let now = self.clock.utc();

        let records = match self.ports.medicines.scan_all().await {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "expiry scan could not enumerate medicines");
                report.aborted = Some(err);
                return report;
            }
        };
        report.examined = records.len();

        for record in records {
            match record {
                Ok(medicine) => self.check_medicine(&medicine, now, &mut report).await,
                Err(err) => {
                    warn!(record_id = %err.record_id, reason = %err.reason, "skipping undecodable medicine record");
                    report.skipped.push(ScanSkip {
                        record_id: err.record_id.clone(),
                        reason: ScanSkipReason::UndecodableRecord(err),
                    });
                }
            }
        }

        info!(
            examined = report.examined,
            due = report.due,
            delivered = report.dispatch.delivered(),
            failed = report.dispatch.failures().len(),
            skipped = report.skipped.len(),
            "expiry scan finished"
        );
        report
    }

    async fn check_medicine(&self, medicine: &Medicine, now: DateTime<Utc>, report: &mut ScanReport) {
        let Some(days) = self.config.window.days_remaining(medicine.expires_at(), now) else {
            return;
        };
        report.due += 1;

        let skip = |reason| ScanSkip {
            record_id: medicine.id().to_string(),
            reason,
        };
        let owner = match self.ports.users.find_by_email(medicine.owner()).await {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                warn!(medicine_id = %medicine.id(), owner = %medicine.owner(), "medicine owner not found");
                report.skipped.push(skip(ScanSkipReason::OwnerMissing));
                return;
            }
            Err(err) => {
                warn!(medicine_id = %medicine.id(), error = %err, "medicine owner lookup failed");
                report.skipped.push(skip(ScanSkipReason::OwnerLookupFailed(err)));
                return;
            }
        };
        let Some(phone) = owner.phone() else {
            report.skipped.push(skip(ScanSkipReason::OwnerWithoutPhone));
            return;
        };

        let outcome = self
            .dispatcher
            .dispatch(phone, &scan_alert_message(medicine, days))
            .await;
        report.dispatch.record(phone, outcome);
    }

    /// Alternate between scanning and sleeping until `stop` turns true or its
    /// sender is dropped. Returns the number of completed passes.
    pub async fn run(&self, sleeper: &dyn ScanSleeper, mut stop: watch::Receiver<bool>) -> u64 {
        let mut cycles = 0_u64;
        loop {
            if *stop.borrow() {
                break;
            }
            self.scan_once().await;
            cycles += 1;

            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                () = sleeper.sleep(self.config.interval) => {}
            }
        }
        info!(cycles, "expiry scanner stopped");
        cycles
    }

    /// Start the loop on the tokio runtime.
    pub fn spawn(self: Arc<Self>, sleeper: Arc<dyn ScanSleeper>) -> ExpiryScannerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let join = tokio::spawn(async move { self.run(sleeper.as_ref(), stop_rx).await });
        ExpiryScannerHandle { stop_tx, join }
    }
}

/// Handle to a spawned scanner loop.
pub struct ExpiryScannerHandle {
    stop_tx: watch::Sender<bool>,
    join: JoinHandle<u64>,
}

impl ExpiryScannerHandle {
    /// Signal the loop to stop and wait for it to exit.
    pub async fn stop(self) -> Result<u64, JoinError> {
        // A closed channel means the loop already exited.
        let _ = self.stop_tx.send(true);
        self.join.await
    }
}
