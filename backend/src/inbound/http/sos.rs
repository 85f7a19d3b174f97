//! SOS broadcast handler.
//!
//! ```text
//! POST /api/v1/sos {"medicineName":"Insulin","location":"12.9716,77.5946"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{SosOutcome, SosRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const MEDICINE_NAME: FieldName = FieldName::new("medicineName");

/// SOS payload. `location` is `"<lat>,<lon>"`; without it nobody is alerted.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SosBody {
    #[schema(example = "Insulin")]
    pub medicine_name: Option<String>,
    #[schema(example = "12.9716,77.5946")]
    pub location: Option<String>,
}

/// Broadcast result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SosResponseBody {
    #[schema(example = "SOS request sent to 3 nearby users.")]
    pub message: String,
    pub notified: usize,
    pub in_range: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl From<SosOutcome> for SosResponseBody {
    fn from(value: SosOutcome) -> Self {
        Self {
            message: value.summary(),
            notified: value.notified,
            in_range: value.in_range,
            skipped: value.skipped,
            failed: value.failures.len(),
        }
    }
}

/// Alert users within 5 km of the caller.
#[utoipa::path(
    post,
    path = "/api/v1/sos",
    request_body = SosBody,
    responses(
        (status = 200, description = "Broadcast finished", body = SosResponseBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["sos"],
    operation_id = "sendSos"
)]
#[post("/sos")]
pub async fn send_sos(
    state: web::Data<HttpState>,
    payload: web::Json<SosBody>,
) -> ApiResult<web::Json<SosResponseBody>> {
    let body = payload.into_inner();
    let request = SosRequest {
        medicine_name: require(body.medicine_name, MEDICINE_NAME)?,
        location: body.location,
    };
    let outcome = state.sos.broadcast(request).await?;
    Ok(web::Json(SosResponseBody::from(outcome)))
}
