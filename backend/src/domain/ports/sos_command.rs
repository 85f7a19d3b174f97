//! Driving port for SOS broadcasts.

use async_trait::async_trait;

use crate::domain::{Error, SosOutcome, SosRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SosCommand: Send + Sync {
    /// Alert nearby users; a missing or malformed location notifies nobody.
    async fn broadcast(&self, request: SosRequest) -> Result<SosOutcome, Error>;
}
