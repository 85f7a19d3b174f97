//! HTTP inbound adapter exposing REST endpoints.
//!
//! ```text
//! POST /api/v1/users
//! POST /api/v1/users/{email}/medicines
//! GET  /api/v1/users/{email}/medicines
//! POST /api/v1/users/{email}/shares
//! GET  /api/v1/medicines/{id}/disposal
//! GET  /api/v1/community/medicines
//! POST /api/v1/sos
//! GET  /api/v1/leaderboard
//! ```

use actix_web::web;

pub mod community;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod medicines;
pub mod schemas;
pub mod sos;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register_user)
        .service(medicines::upload_medicine)
        .service(medicines::list_medicines)
        .service(medicines::disposal_guide)
        .service(community::share_medicine)
        .service(community::browse_community)
        .service(sos::send_sos)
        .service(leaderboard::get_leaderboard);
}
