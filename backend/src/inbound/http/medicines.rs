//! Medicine upload, listing and disposal handlers.
//!
//! ```text
//! POST /api/v1/users/{email}/medicines
//! GET  /api/v1/users/{email}/medicines
//! GET  /api/v1/medicines/{id}/disposal
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{UploadAlert, UploadMedicineRequest, UploadedMedicine};
use crate::domain::{
    Category, DisposalGuide, DisposalKind, Error, Medicine, MedicineName, PickupLocation, Quantity,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, parse_calendar_date, parse_email, parse_medicine_id, require,
};

const OWNER: FieldName = FieldName::new("email");
const NAME: FieldName = FieldName::new("name");
const CATEGORY: FieldName = FieldName::new("category");
const QUANTITY: FieldName = FieldName::new("quantity");
const LOCATION: FieldName = FieldName::new("location");
const EXPIRY_DATE: FieldName = FieldName::new("expiryDate");
const MEDICINE_ID: FieldName = FieldName::new("id");

/// Upload payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadMedicineBody {
    #[schema(example = "Paracetamol")]
    pub name: Option<String>,
    #[schema(example = "tablet")]
    pub category: Option<String>,
    #[schema(example = 10)]
    pub quantity: Option<i64>,
    pub location: Option<String>,
    #[schema(example = "2026-05-17")]
    pub expiry_date: Option<String>,
    /// Optional image reference.
    pub image: Option<String>,
}

/// A medicine as returned to its owner.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicineBody {
    pub id: String,
    pub owner_email: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub location: String,
    pub expiry_date: String,
    pub image: Option<String>,
    pub created_at: String,
}

impl From<&Medicine> for MedicineBody {
    fn from(value: &Medicine) -> Self {
        Self {
            id: value.id().to_string(),
            owner_email: value.owner().to_string(),
            name: value.name().to_string(),
            category: value.category().to_string(),
            quantity: value.quantity().get(),
            location: value.location().to_string(),
            expiry_date: value.expires_at().format("%Y-%m-%d").to_string(),
            image: value.image_ref().map(str::to_owned),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Upload response with the immediate alert outcome.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedMedicineBody {
    pub medicine: MedicineBody,
    /// One of `not_needed`, `delivered`, `skipped` or `failed`.
    #[schema(example = "not_needed")]
    pub expiry_alert: String,
}

fn alert_label(alert: UploadAlert) -> &'static str {
    match alert {
        UploadAlert::NotNeeded => "not_needed",
        UploadAlert::Delivered => "delivered",
        UploadAlert::Skipped => "skipped",
        UploadAlert::Failed => "failed",
    }
}

impl From<UploadedMedicine> for UploadedMedicineBody {
    fn from(value: UploadedMedicine) -> Self {
        Self {
            medicine: MedicineBody::from(&value.medicine),
            expiry_alert: alert_label(value.alert).to_owned(),
        }
    }
}

/// Disposal instructions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisposalGuideBody {
    pub medicine_id: String,
    pub medicine_name: String,
    pub category: String,
    #[schema(example = "solid_dose")]
    pub kind: String,
    pub steps: Vec<String>,
}

impl From<DisposalGuide> for DisposalGuideBody {
    fn from(value: DisposalGuide) -> Self {
        let kind = match value.kind {
            DisposalKind::SolidDose => "solid_dose",
            DisposalKind::Liquid => "liquid",
            DisposalKind::Injection => "injection",
            DisposalKind::General => "general",
        };
        Self {
            medicine_id: value.medicine_id.to_string(),
            medicine_name: value.medicine_name,
            category: value.category,
            kind: kind.to_owned(),
            steps: value.steps.iter().map(|step| (*step).to_owned()).collect(),
        }
    }
}

fn parse_upload(owner: &str, body: UploadMedicineBody) -> Result<UploadMedicineRequest, Error> {
    let owner = parse_email(owner, OWNER)?;
    let name = MedicineName::new(require(body.name, NAME)?)
        .map_err(|err| invalid_field_error(NAME, err))?;
    let category = Category::new(require(body.category, CATEGORY)?)
        .map_err(|err| invalid_field_error(CATEGORY, err))?;
    let quantity = Quantity::new(require(body.quantity, QUANTITY)?)
        .map_err(|err| invalid_field_error(QUANTITY, err))?;
    let location = PickupLocation::new(require(body.location, LOCATION)?)
        .map_err(|err| invalid_field_error(LOCATION, err))?;
    let expires_at = parse_calendar_date(&require(body.expiry_date, EXPIRY_DATE)?, EXPIRY_DATE)?;

    Ok(UploadMedicineRequest {
        owner,
        name,
        category,
        quantity,
        location,
        expires_at,
        image_ref: body.image,
    })
}

/// Upload a medicine for `email`.
#[utoipa::path(
    post,
    path = "/api/v1/users/{email}/medicines",
    request_body = UploadMedicineBody,
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 201, description = "Medicine stored", body = UploadedMedicineBody),
        (status = 400, description = "Invalid request or owner has no phone", body = ErrorSchema),
        (status = 404, description = "Owner not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "uploadMedicine"
)]
#[post("/users/{email}/medicines")]
pub async fn upload_medicine(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UploadMedicineBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_upload(&path.into_inner(), payload.into_inner())?;
    let uploaded = state.medicines.upload(request).await?;
    Ok(HttpResponse::Created().json(UploadedMedicineBody::from(uploaded)))
}

/// List the medicines owned by `email`, soonest expiry first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{email}/medicines",
    params(("email" = String, Path, description = "Owner email")),
    responses(
        (status = 200, description = "Owned medicines", body = [MedicineBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "listMedicines"
)]
#[get("/users/{email}/medicines")]
pub async fn list_medicines(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MedicineBody>>> {
    let owner = parse_email(&path.into_inner(), OWNER)?;
    let medicines = state.medicines_query.list_for_owner(&owner).await?;
    Ok(web::Json(medicines.iter().map(MedicineBody::from).collect()))
}

/// Disposal guidance for one medicine.
#[utoipa::path(
    get,
    path = "/api/v1/medicines/{id}/disposal",
    params(("id" = String, Path, description = "Medicine identifier")),
    responses(
        (status = 200, description = "Disposal steps", body = DisposalGuideBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Medicine not found", body = ErrorSchema)
    ),
    tags = ["medicines"],
    operation_id = "getDisposalGuide"
)]
#[get("/medicines/{id}/disposal")]
pub async fn disposal_guide(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DisposalGuideBody>> {
    let id = parse_medicine_id(&path.into_inner(), MEDICINE_ID)?;
    let guide = state.medicines_query.disposal_guide(&id).await?;
    Ok(web::Json(DisposalGuideBody::from(guide)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{MockPorts, detail, test_app};
    use crate::test_support::fixtures;

    fn upload_body(overrides: Value) -> Value {
        let mut base = json!({
            "name": "Paracetamol",
            "category": "tablet",
            "quantity": 10,
            "location": "Indiranagar pharmacy",
            "expiryDate": "2026-05-17",
        });
        if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        base
    }

    fn may_17() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 17, 0, 0, 0)
            .single()
            .expect("timestamp")
    }

    #[actix_web::test]
    async fn upload_parses_the_expiry_as_midnight_utc() {
        let mut ports = MockPorts::default();
        ports
            .medicines
            .expect_upload()
            .withf(|req| {
                req.owner.to_string() == "asha@example.com"
                    && req.expires_at == may_17()
                    && req.quantity.get() == 10
            })
            .times(1)
            .returning(|req| {
                Ok(UploadedMedicine {
                    medicine: fixtures::medicine(
                        "asha@example.com",
                        req.name.as_ref(),
                        "tablet",
                        req.expires_at,
                    ),
                    alert: UploadAlert::Delivered,
                })
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/asha@example.com/medicines")
                .set_json(upload_body(json!({})))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["expiryAlert"], "delivered");
        assert_eq!(value["medicine"]["expiryDate"], "2026-05-17");
        assert_eq!(value["medicine"]["ownerEmail"], "asha@example.com");
    }

    #[rstest]
    #[case::zero_quantity(json!({ "quantity": 0 }), "quantity", "invalid_field")]
    #[case::missing_quantity(json!({ "quantity": null }), "quantity", "missing_field")]
    #[case::oversized_quantity(json!({ "quantity": 3_000_000_000_i64 }), "quantity", "invalid_field")]
    #[case::blank_name(json!({ "name": "  " }), "name", "invalid_field")]
    #[case::bad_date(json!({ "expiryDate": "17-05-2026" }), "expiryDate", "invalid_date")]
    #[case::missing_location(json!({ "location": null }), "location", "missing_field")]
    #[actix_web::test]
    async fn upload_rejects_invalid_payloads(
        #[case] overrides: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/asha@example.com/medicines")
                .set_json(upload_body(overrides))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(detail(&value, "field"), Some(field));
        assert_eq!(detail(&value, "code"), Some(code));
    }

    #[actix_web::test]
    async fn unknown_owner_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .medicines
            .expect_upload()
            .returning(|_| Err(Error::not_found("user not found")));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/ghost@example.com/medicines")
                .set_json(upload_body(json!({})))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn lists_owned_medicines_in_port_order() {
        let mut ports = MockPorts::default();
        ports
            .medicines_query
            .expect_list_for_owner()
            .withf(|owner| owner.to_string() == "asha@example.com")
            .returning(|_| {
                Ok(vec![
                    fixtures::medicine("asha@example.com", "Cough syrup", "syrup", may_17()),
                    fixtures::medicine("asha@example.com", "Paracetamol", "tablet", may_17()),
                ])
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/users/Asha@example.com/medicines")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(res).await;
        let names: Vec<&str> = value
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|item| item["name"].as_str())
            .collect();
        assert_eq!(names, vec!["Cough syrup", "Paracetamol"]);
    }

    #[actix_web::test]
    async fn disposal_guide_lists_steps() {
        let medicine = fixtures::medicine("asha@example.com", "Cough syrup", "Syrup", may_17());
        let guide = DisposalGuide::for_medicine(&medicine);
        let id = medicine.id().to_string();
        let mut ports = MockPorts::default();
        ports
            .medicines_query
            .expect_disposal_guide()
            .times(1)
            .returning(move |_| Ok(guide.clone()));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/medicines/{id}/disposal"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["kind"], "liquid");
        assert_eq!(value["medicineId"], id.as_str());
        assert!(!value["steps"].as_array().expect("steps").is_empty());
    }

    #[actix_web::test]
    async fn disposal_guide_rejects_malformed_ids() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/medicines/not-a-uuid/disposal")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(detail(&value, "code"), Some("invalid_uuid"));
    }
}
