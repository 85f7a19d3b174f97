//! Contributor leaderboard built from the community pool.
//!
//! Entries are grouped by contributor email in store order, joined with the
//! contributor profile, sorted by share count (ties keep first appearance)
//! and truncated to [`LEADERBOARD_SIZE`] rows.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::ports::{CommunityRepository, LeaderboardQuery, UserRepository};
use crate::domain::repository_error_mapping::{map_community_error, map_user_error};
use crate::domain::{CommunityEntry, Email, Error, User};

/// Number of rows the leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

/// One medicine a contributor shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedItem {
    pub name: String,
    pub category: String,
    pub shared_at: DateTime<Utc>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// Display name, or the email when the profile has none.
    pub name: String,
    pub total_shared: usize,
    pub items: Vec<SharedItem>,
}

struct Contribution {
    contributor: Email,
    items: Vec<SharedItem>,
}

/// Rank contributors in `entries`, resolving names from `users`.
///
/// # Examples
/// ```
/// use medcycle::domain::rank_contributors;
///
/// assert!(rank_contributors(&[], &[]).is_empty());
/// ```
pub fn rank_contributors(entries: &[CommunityEntry], users: &[User]) -> Vec<LeaderboardEntry> {
    let mut groups: Vec<Contribution> = Vec::new();
    let mut index: HashMap<&Email, usize> = HashMap::new();
    for entry in entries {
        let item = SharedItem {
            name: entry.name().to_string(),
            category: entry.category().to_string(),
            shared_at: entry.shared_at(),
        };
        if let Some(&position) = index.get(entry.contributor()) {
            if let Some(group) = groups.get_mut(position) {
                group.items.push(item);
            }
        } else {
            index.insert(entry.contributor(), groups.len());
            groups.push(Contribution {
                contributor: entry.contributor().clone(),
                items: vec![item],
            });
        }
    }

    // `sort_by` is stable, so equal counts keep first-appearance order.
    groups.sort_by(|a, b| b.items.len().cmp(&a.items.len()));
    groups.truncate(LEADERBOARD_SIZE);

    let profiles: HashMap<&Email, &User> = users.iter().map(|user| (user.email(), user)).collect();
    groups
        .into_iter()
        .enumerate()
        .map(|(position, group)| {
            let name = profiles
                .get(&group.contributor)
                .map_or_else(|| group.contributor.to_string(), |user| user.public_name().to_owned());
            LeaderboardEntry {
                rank: position + 1,
                name,
                total_shared: group.items.len(),
                items: group.items,
            }
        })
        .collect()
}

/// Serves the leaderboard from the community and user stores.
#[derive(Clone)]
pub struct LeaderboardService {
    community: Arc<dyn CommunityRepository>,
    users: Arc<dyn UserRepository>,
}

impl LeaderboardService {
    pub fn new(community: Arc<dyn CommunityRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { community, users }
    }
}

#[async_trait]
impl LeaderboardQuery for LeaderboardService {
    async fn top_contributors(&self) -> Result<Vec<LeaderboardEntry>, Error> {
        let entries = self.community.list_all().await.map_err(map_community_error)?;
        let mut contributors: Vec<Email> = entries.iter().map(|e| e.contributor().clone()).collect();
        contributors.sort();
        contributors.dedup();
        let users = self
            .users
            .find_many_by_email(&contributors)
            .await
            .map_err(map_user_error)?;

        let board = rank_contributors(&entries, &users);
        debug!(entries = entries.len(), rows = board.len(), "leaderboard computed");
        Ok(board)
    }
}
