//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the health probes, plus
//! the error schema wrappers that keep domain types free of utoipa. Swagger UI
//! serves it in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::community::{CommunityEntryBody, ShareMedicineBody};
use crate::inbound::http::leaderboard::{LeaderboardEntryBody, SharedItemBody};
use crate::inbound::http::medicines::{
    DisposalGuideBody, MedicineBody, UploadMedicineBody, UploadedMedicineBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::sos::{SosBody, SosResponseBody};
use crate::inbound::http::users::{RegisterUserBody, RegisteredUserBody};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MedCycle backend API",
        description = "Medicine sharing, expiry alerts, SOS broadcasts and the contributor leaderboard."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register_user,
        crate::inbound::http::medicines::upload_medicine,
        crate::inbound::http::medicines::list_medicines,
        crate::inbound::http::medicines::disposal_guide,
        crate::inbound::http::community::share_medicine,
        crate::inbound::http::community::browse_community,
        crate::inbound::http::sos::send_sos,
        crate::inbound::http::leaderboard::get_leaderboard,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RegisterUserBody,
        RegisteredUserBody,
        UploadMedicineBody,
        UploadedMedicineBody,
        MedicineBody,
        DisposalGuideBody,
        ShareMedicineBody,
        CommunityEntryBody,
        SosBody,
        SosResponseBody,
        LeaderboardEntryBody,
        SharedItemBody,
    )),
    tags(
        (name = "users", description = "Registration"),
        (name = "medicines", description = "Uploads, listings and disposal guidance"),
        (name = "community", description = "Community pool and leaderboard"),
        (name = "sos", description = "Urgent requests to nearby users"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
