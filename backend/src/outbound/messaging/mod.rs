//! Messaging provider adapters.
//!
//! Provides a thin HTTP implementation of the `NotificationSender` port for
//! Twilio-compatible WhatsApp delivery.

mod twilio_http_sender;

pub use twilio_http_sender::{TwilioCredentials, TwilioHttpSender, TwilioSenderBuildError};
