//! Best-effort alert delivery.
//!
//! The dispatcher never propagates provider failures: callers get a
//! [`DispatchOutcome`] per recipient and carry on with the next one.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::PhoneNumber;
use crate::domain::ports::{NotificationSendError, NotificationSender, OutboundMessage};

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    /// No provider is configured.
    Skipped,
    Failed(NotificationSendError),
}

/// Sends alerts through the configured [`NotificationSender`], if any.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: Option<Arc<dyn NotificationSender>>,
}

impl NotificationDispatcher {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// A dispatcher that skips every message.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Send `body` to `recipient`, logging instead of failing.
    pub async fn dispatch(&self, recipient: &PhoneNumber, body: &str) -> DispatchOutcome {
        let Some(sender) = &self.sender else {
            warn!(%recipient, "messaging provider not configured; alert skipped");
            return DispatchOutcome::Skipped;
        };
        let message = OutboundMessage {
            recipient: recipient.clone(),
            body: body.to_owned(),
        };
        match sender.send(&message).await {
            Ok(()) => {
                debug!(%recipient, "alert delivered");
                DispatchOutcome::Delivered
            }
            Err(error) => {
                warn!(%recipient, %error, "alert delivery failed");
                DispatchOutcome::Failed(error)
            }
        }
    }
}

/// A recipient whose alert could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub recipient: PhoneNumber,
    pub error: NotificationSendError,
}

/// Tally of outcomes across a batch of dispatches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    delivered: usize,
    skipped: usize,
    failures: Vec<DispatchFailure>,
}

impl DispatchReport {
    pub fn record(&mut self, recipient: &PhoneNumber, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Delivered => self.delivered += 1,
            DispatchOutcome::Skipped => self.skipped += 1,
            DispatchOutcome::Failed(error) => self.failures.push(DispatchFailure {
                recipient: recipient.clone(),
                error,
            }),
        }
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failures(&self) -> &[DispatchFailure] {
        &self.failures
    }

    /// Number of recipients a dispatch was attempted for.
    pub fn attempted(&self) -> usize {
        self.delivered + self.skipped + self.failures.len()
    }
}
