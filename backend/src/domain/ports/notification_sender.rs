//! Driven port for the text-messaging provider.

use async_trait::async_trait;

use crate::domain::PhoneNumber;

use super::define_port_error;

define_port_error! {
    /// Errors raised by messaging provider adapters.
    pub enum NotificationSendError {
        /// The provider could not be reached or the call timed out.
        Transport { message: String } => "messaging transport failed: {message}",
        /// The provider refused the message.
        Rejected { message: String } => "messaging provider rejected the message: {message}",
        /// The provider is throttling requests.
        RateLimited { message: String } => "messaging provider rate limited: {message}",
    }
}

/// A text message addressed to one phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: PhoneNumber,
    pub body: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver `message`; no retries are attempted.
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationSendError>;
}
