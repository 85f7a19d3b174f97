//! Messaging and credential doubles.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::PasswordHash;
use crate::domain::ports::{
    CredentialHashError, CredentialHasher, NotificationSendError, NotificationSender,
    OutboundMessage,
};

use super::lock;

/// Records every attempted message; configured recipients are rejected.
#[derive(Default)]
pub struct RecordingSender {
    attempts: Mutex<Vec<OutboundMessage>>,
    failing: HashSet<String>,
}

impl RecordingSender {
    pub fn failing_for<'a>(recipients: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            attempts: Mutex::default(),
            failing: recipients.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Every message handed to the sender, delivered or not.
    pub fn attempts(&self) -> Vec<OutboundMessage> {
        lock(&self.attempts, "attempts").clone()
    }

    /// Messages that were accepted.
    pub fn delivered(&self) -> Vec<OutboundMessage> {
        self.attempts()
            .into_iter()
            .filter(|message| !self.failing.contains(message.recipient.as_ref()))
            .collect()
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationSendError> {
        lock(&self.attempts, "attempts").push(message.clone());
        if self.failing.contains(message.recipient.as_ref()) {
            return Err(NotificationSendError::rejected(format!(
                "recipient {} rejected",
                message.recipient
            )));
        }
        Ok(())
    }
}

/// Cheap reversible "hash" for tests that do not exercise Argon2.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        PasswordHash::new(format!("$plain${password}"))
            .map_err(|err| CredentialHashError::hashing(err.to_string()))
    }
}
