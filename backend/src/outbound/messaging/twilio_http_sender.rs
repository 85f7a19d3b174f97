//! Reqwest-backed WhatsApp sender for Twilio-compatible messaging APIs.
//!
//! This adapter owns transport details only: form encoding, basic auth,
//! timeout and HTTP status mapping. It never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use zeroize::Zeroizing;

use crate::domain::ports::{NotificationSendError, NotificationSender, OutboundMessage};

const WHATSAPP_PREFIX: &str = "whatsapp:";

/// Account credentials for the messaging provider.
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: Zeroizing<String>,
    /// Sender number, with or without the `whatsapp:` prefix.
    pub from_number: String,
}

/// Messaging adapter that posts one form request per message.
pub struct TwilioHttpSender {
    client: Client,
    messages_url: Url,
    account_sid: String,
    auth_token: Zeroizing<String>,
    from: String,
}

impl TwilioHttpSender {
    /// Build a sender against `api_base` with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed or the
    /// account id does not form a valid URL path.
    pub fn new(
        api_base: &Url,
        credentials: TwilioCredentials,
        timeout: Duration,
    ) -> Result<Self, TwilioSenderBuildError> {
        let client = Client::builder().timeout(timeout).build()?;
        let messages_url = messages_url(api_base, &credentials.account_sid)?;
        Ok(Self {
            client,
            messages_url,
            account_sid: credentials.account_sid,
            auth_token: credentials.auth_token,
            from: whatsapp_address(&credentials.from_number),
        })
    }
}

/// Errors raised while building the sender.
#[derive(Debug, thiserror::Error)]
pub enum TwilioSenderBuildError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid messaging endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[async_trait]
impl NotificationSender for TwilioHttpSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), NotificationSendError> {
        let to = whatsapp_address(message.recipient.as_ref());
        let response = self
            .client
            .post(self.messages_url.clone())
            .basic_auth(&self.account_sid, Some(self.auth_token.as_str()))
            .form(&[
                ("From", self.from.as_str()),
                ("To", to.as_str()),
                ("Body", message.body.as_str()),
            ])
            .send()
            .await
            .map_err(|err| NotificationSendError::transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|err| NotificationSendError::transport(err.to_string()))?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn messages_url(api_base: &Url, account_sid: &str) -> Result<Url, url::ParseError> {
    let base = api_base.as_str().trim_end_matches('/');
    Url::parse(&format!(
        "{base}/2010-04-01/Accounts/{account_sid}/Messages.json"
    ))
}

fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_owned()
    } else {
        format!("{WHATSAPP_PREFIX}{number}")
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> NotificationSendError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => NotificationSendError::rate_limited(message),
        _ if status.is_client_error() => NotificationSendError::rejected(message),
        _ => NotificationSendError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
