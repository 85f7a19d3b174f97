//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `MEDCYCLE_*` environment variables, an optional config
//! file and CLI flags. Unset optional keys fall back to the defaults below.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 86_400;
const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";
const DEFAULT_TWILIO_TIMEOUT_SECS: u64 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{key} must be set")]
    Missing { key: &'static str },
    #[error("{key} is invalid: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Top-level service settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MEDCYCLE")]
#[serde(default)]
pub struct Settings {
    /// PostgreSQL connection URL.
    #[serde(deserialize_with = "optional_text")]
    pub database_url: Option<String>,
    /// HTTP bind address.
    #[serde(deserialize_with = "optional_text")]
    pub bind_addr: Option<String>,
    /// Connection pool size.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Seconds the expiry scanner sleeps between passes.
    #[ortho_config(default = 86_400)]
    pub scan_interval_secs: u64,
    #[serde(deserialize_with = "optional_text")]
    pub twilio_account_sid: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub twilio_auth_token: Option<String>,
    /// Sender number, with or without the `whatsapp:` prefix.
    #[serde(deserialize_with = "optional_text")]
    pub twilio_from_number: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub twilio_api_base: Option<String>,
    pub twilio_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_from_number: None,
            twilio_api_base: None,
            twilio_timeout_secs: None,
        }
    }
}

/// Text value that environment parsing may have turned into a scalar.
#[derive(Deserialize)]
#[serde(untagged)]
enum Text {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

/// Accept numbers and booleans where text is expected, so values such as
/// `+14155238886` or an all-digit token still load.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::String(value) => value,
        Text::Unsigned(value) => value.to_string(),
        Text::Signed(value) => value.to_string(),
        Text::Float(value) => value.to_string(),
        Text::Bool(value) => value.to_string(),
    }))
}

/// Restore the `+` of an E.164 sender that was read back as a number.
fn sender_address(raw: &str) -> String {
    if !raw.is_empty() && raw.chars().all(|ch| ch.is_ascii_digit()) {
        format!("+{raw}")
    } else {
        raw.to_owned()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("bind_addr", &self.bind_addr)
            .field("db_max_connections", &self.db_max_connections)
            .field("scan_interval_secs", &self.scan_interval_secs)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field(
                "twilio_auth_token",
                &self.twilio_auth_token.as_ref().map(|_| "<redacted>"),
            )
            .field("twilio_from_number", &self.twilio_from_number)
            .field("twilio_api_base", &self.twilio_api_base)
            .field("twilio_timeout_secs", &self.twilio_timeout_secs)
            .finish()
    }
}

/// Resolved messaging provider settings.
pub struct MessagingSettings {
    pub account_sid: String,
    pub auth_token: Zeroizing<String>,
    pub from_number: String,
    pub api_base: Url,
    pub timeout: Duration,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl Settings {
    /// # Errors
    ///
    /// Returns [`SettingsError::Missing`] when the URL is unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        non_blank(self.database_url.as_ref()).ok_or(SettingsError::Missing {
            key: "MEDCYCLE_DATABASE_URL",
        })
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = non_blank(self.bind_addr.as_ref()).unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::Invalid {
            key: "MEDCYCLE_BIND_ADDR",
            message: err.to_string(),
        })
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Scanner sleep interval, at least one second.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }

    /// Messaging settings when account id, token and sender are all set.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] when the API base is not a URL.
    pub fn messaging(&self) -> Result<Option<MessagingSettings>, SettingsError> {
        let (Some(account_sid), Some(auth_token), Some(from_number)) = (
            non_blank(self.twilio_account_sid.as_ref()),
            non_blank(self.twilio_auth_token.as_ref()),
            non_blank(self.twilio_from_number.as_ref()),
        ) else {
            return Ok(None);
        };
        let raw_base = non_blank(self.twilio_api_base.as_ref()).unwrap_or(DEFAULT_TWILIO_API_BASE);
        let api_base = Url::parse(raw_base).map_err(|err| SettingsError::Invalid {
            key: "MEDCYCLE_TWILIO_API_BASE",
            message: err.to_string(),
        })?;

        Ok(Some(MessagingSettings {
            account_sid: account_sid.to_owned(),
            auth_token: Zeroizing::new(auth_token.to_owned()),
            from_number: sender_address(from_number),
            api_base,
            timeout: Duration::from_secs(
                self.twilio_timeout_secs
                    .unwrap_or(DEFAULT_TWILIO_TIMEOUT_SECS)
                    .max(1),
            ),
        }))
    }
}
