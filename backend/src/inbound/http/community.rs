//! Community sharing and browsing handlers.
//!
//! ```text
//! POST /api/v1/users/{email}/shares {"medicineId":"..."}
//! GET  /api/v1/community/medicines?category=tablet&search=para&sortBy=name
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ShareMedicineRequest;
use crate::domain::{CommunityEntry, CommunityFilter, CommunitySort};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_email, parse_medicine_id, require};

const CONTRIBUTOR: FieldName = FieldName::new("email");
const MEDICINE_ID: FieldName = FieldName::new("medicineId");

/// Share payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareMedicineBody {
    pub medicine_id: Option<String>,
}

/// Browse filters; blank values are ignored and unknown sort keys mean `expiry`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BrowseCommunityQuery {
    /// Exact category match.
    pub category: Option<String>,
    /// Case-insensitive substring of the medicine name.
    pub search: Option<String>,
    /// `expiry` (default), `name` or `date`.
    pub sort_by: Option<String>,
}

impl From<BrowseCommunityQuery> for CommunityFilter {
    fn from(value: BrowseCommunityQuery) -> Self {
        let sort = CommunitySort::from_key(value.sort_by.as_deref());
        CommunityFilter::new(value.category, value.search, sort)
    }
}

/// A community pool entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEntryBody {
    pub id: String,
    pub medicine_id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub location: String,
    pub expiry_date: String,
    pub image: Option<String>,
    pub shared_by: String,
    pub contact_info: String,
    pub shared_at: String,
}

impl From<&CommunityEntry> for CommunityEntryBody {
    fn from(value: &CommunityEntry) -> Self {
        Self {
            id: value.id().to_string(),
            medicine_id: value.medicine_id().to_string(),
            name: value.name().to_string(),
            category: value.category().to_string(),
            quantity: value.quantity().get(),
            location: value.location().to_string(),
            expiry_date: value.expires_at().format("%Y-%m-%d").to_string(),
            image: value.image_ref().map(str::to_owned),
            shared_by: value.shared_by().to_owned(),
            contact_info: value.contact_info().to_owned(),
            shared_at: value.shared_at().to_rfc3339(),
        }
    }
}

/// Share one of the caller's medicines with the community.
#[utoipa::path(
    post,
    path = "/api/v1/users/{email}/shares",
    request_body = ShareMedicineBody,
    params(("email" = String, Path, description = "Contributor email")),
    responses(
        (status = 201, description = "Medicine shared", body = CommunityEntryBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Medicine or user not found", body = ErrorSchema),
        (status = 409, description = "Already shared", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "shareMedicine"
)]
#[post("/users/{email}/shares")]
pub async fn share_medicine(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ShareMedicineBody>,
) -> ApiResult<HttpResponse> {
    let contributor = parse_email(&path.into_inner(), CONTRIBUTOR)?;
    let raw_id = require(payload.into_inner().medicine_id, MEDICINE_ID)?;
    let medicine_id = parse_medicine_id(&raw_id, MEDICINE_ID)?;
    let entry = state
        .community
        .share(ShareMedicineRequest {
            contributor,
            medicine_id,
        })
        .await?;
    Ok(HttpResponse::Created().json(CommunityEntryBody::from(&entry)))
}

/// Browse the community pool.
#[utoipa::path(
    get,
    path = "/api/v1/community/medicines",
    params(BrowseCommunityQuery),
    responses(
        (status = 200, description = "Community entries", body = [CommunityEntryBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["community"],
    operation_id = "browseCommunity"
)]
#[get("/community/medicines")]
pub async fn browse_community(
    state: web::Data<HttpState>,
    query: web::Query<BrowseCommunityQuery>,
) -> ApiResult<web::Json<Vec<CommunityEntryBody>>> {
    let filter = CommunityFilter::from(query.into_inner());
    let entries = state.community_query.browse(&filter).await?;
    Ok(web::Json(entries.iter().map(CommunityEntryBody::from).collect()))
}
