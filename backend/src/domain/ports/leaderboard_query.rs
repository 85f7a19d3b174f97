//! Driving port for the contributor leaderboard.

use async_trait::async_trait;

use crate::domain::{Error, LeaderboardEntry};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeaderboardQuery: Send + Sync {
    /// Top contributors by number of shared medicines.
    async fn top_contributors(&self) -> Result<Vec<LeaderboardEntry>, Error>;
}
