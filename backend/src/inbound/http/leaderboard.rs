//! Contributor leaderboard handler.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LeaderboardEntry, SharedItem};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// One shared item under a contributor.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SharedItemBody {
    pub name: String,
    pub category: String,
    pub shared_at: String,
}

/// One leaderboard row.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryBody {
    pub rank: usize,
    pub name: String,
    pub total_shared: usize,
    pub items: Vec<SharedItemBody>,
}

impl From<SharedItem> for SharedItemBody {
    fn from(value: SharedItem) -> Self {
        Self {
            name: value.name,
            category: value.category,
            shared_at: value.shared_at.to_rfc3339(),
        }
    }
}

impl From<LeaderboardEntry> for LeaderboardEntryBody {
    fn from(value: LeaderboardEntry) -> Self {
        Self {
            rank: value.rank,
            name: value.name,
            total_shared: value.total_shared,
            items: value.items.into_iter().map(SharedItemBody::from).collect(),
        }
    }
}

/// Top ten contributors by number of shared medicines.
#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    responses(
        (status = 200, description = "Leaderboard", body = [LeaderboardEntryBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "getLeaderboard"
)]
#[get("/leaderboard")]
pub async fn get_leaderboard(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<LeaderboardEntryBody>>> {
    let entries = state.leaderboard.top_contributors().await?;
    Ok(web::Json(
        entries.into_iter().map(LeaderboardEntryBody::from).collect(),
    ))
}
