//! SOS broadcasts to nearby users.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{SosCommand, UserRepository};
use crate::domain::repository_error_mapping::map_user_error;
use crate::domain::{DispatchFailure, DispatchReport, Error, NotificationDispatcher, parse_lat_lon};

/// Users within this many kilometres of the requester are alerted.
pub const SOS_RADIUS_KM: f64 = 5.0;

/// An urgent request for a medicine near `location` (`"<lat>,<lon>"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosRequest {
    pub medicine_name: String,
    pub location: Option<String>,
}

/// Result of one broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SosOutcome {
    /// Recipients whose alert was delivered.
    pub notified: usize,
    /// Users within the radius that have a phone.
    pub in_range: usize,
    /// Recipients skipped because messaging is not configured.
    pub skipped: usize,
    pub failures: Vec<DispatchFailure>,
}

impl SosOutcome {
    fn from_report(in_range: usize, report: DispatchReport) -> Self {
        Self {
            notified: report.delivered(),
            in_range,
            skipped: report.skipped(),
            failures: report.failures().to_vec(),
        }
    }

    /// Human-readable summary for the requester.
    pub fn summary(&self) -> String {
        format!("SOS request sent to {} nearby users.", self.notified)
    }
}

pub fn sos_message(medicine_name: &str) -> String {
    format!("🚨 SOS: Someone nearby needs '{medicine_name}'. If you can help, please respond!")
}

/// Broadcasts SOS requests to users near the requester.
#[derive(Clone)]
pub struct SosService {
    users: Arc<dyn UserRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl SosService {
    pub fn new(users: Arc<dyn UserRepository>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { users, dispatcher }
    }
}

#[async_trait]
impl SosCommand for SosService {
    async fn broadcast(&self, request: SosRequest) -> Result<SosOutcome, Error> {
        let Some(raw) = request.location.as_deref() else {
            info!("SOS request without location; nobody notified");
            return Ok(SosOutcome::default());
        };
        let origin = match parse_lat_lon(raw) {
            Ok(point) => point,
            Err(err) => {
                info!(location = raw, error = %err, "SOS request with malformed location; nobody notified");
                return Ok(SosOutcome::default());
            }
        };

        let candidates = self.users.list_with_location().await.map_err(map_user_error)?;
        let body = sos_message(&request.medicine_name);
        let mut report = DispatchReport::default();
        let mut in_range = 0;
        for user in &candidates {
            let Some(point) = user.location() else {
                continue;
            };
            let Some(phone) = user.phone() else {
                continue;
            };
            if origin.distance_km(&point) > SOS_RADIUS_KM {
                continue;
            }
            in_range += 1;
            let outcome = self.dispatcher.dispatch(phone, &body).await;
            report.record(phone, outcome);
        }

        let outcome = SosOutcome::from_report(in_range, report);
        info!(
            medicine = %request.medicine_name,
            in_range = outcome.in_range,
            notified = outcome.notified,
            failed = outcome.failures.len(),
            "SOS broadcast finished"
        );
        Ok(outcome)
    }
}
