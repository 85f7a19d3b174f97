//! Driving port for browsing the community pool.

use async_trait::async_trait;

use crate::domain::{CommunityEntry, CommunityFilter, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityQuery: Send + Sync {
    async fn browse(&self, filter: &CommunityFilter) -> Result<Vec<CommunityEntry>, Error>;
}
