//! Registration handler.
//!
//! ```text
//! POST /api/v1/users {"email":"asha@example.com","password":"...","phone":"+91..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{RegisterUserRequest, RegisteredUser};
use crate::domain::{DisplayName, Error, GeoPoint, PhoneNumber};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_field_error, missing_field_error, parse_email, require,
};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const PHONE: FieldName = FieldName::new("phone");
const NAME: FieldName = FieldName::new("name");
const LOCATION: FieldName = FieldName::new("location");

/// Registration payload.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    #[schema(example = "asha@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "+919800000001")]
    pub phone: Option<String>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl std::fmt::Debug for RegisterUserBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserBody")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

/// Registration response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUserBody {
    pub email: String,
}

impl From<RegisteredUser> for RegisteredUserBody {
    fn from(value: RegisteredUser) -> Self {
        Self {
            email: value.email.to_string(),
        }
    }
}

fn parse_register_body(body: RegisterUserBody) -> Result<RegisterUserRequest, Error> {
    let email = parse_email(&require(body.email, EMAIL)?, EMAIL)?;
    let password = require(body.password, PASSWORD)?;
    if password.is_empty() {
        return Err(missing_field_error(PASSWORD));
    }
    let phone = PhoneNumber::new(require(body.phone, PHONE)?)
        .map_err(|err| invalid_field_error(PHONE, err))?;
    let display_name = body
        .name
        .filter(|name| !name.trim().is_empty())
        .map(DisplayName::new)
        .transpose()
        .map_err(|err| invalid_field_error(NAME, err))?;
    // Coordinates are kept only as a pair.
    let location = match (body.latitude, body.longitude) {
        (Some(latitude), Some(longitude)) => Some(
            GeoPoint::new(longitude, latitude).map_err(|err| invalid_field_error(LOCATION, err))?,
        ),
        _ => None,
    };

    Ok(RegisterUserRequest {
        email,
        password,
        phone,
        display_name,
        location,
    })
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User registered", body = RegisteredUserBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_register_body(payload.into_inner())?;
    let registered = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(RegisteredUserBody::from(registered)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::Email;
    use crate::inbound::http::test_utils::{MockPorts, detail, test_app};

    fn body(overrides: Value) -> Value {
        let mut base = json!({
            "email": "Asha@Example.com",
            "password": "secret",
            "phone": "+919800000001",
            "name": "Asha",
            "latitude": 12.9716,
            "longitude": 77.5946,
        });
        if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        base
    }

    #[actix_web::test]
    async fn registers_with_normalised_email_and_location() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|req| {
                req.email.to_string() == "asha@example.com"
                    && req.password == "secret"
                    && req.location.is_some_and(|p| p.latitude() == 12.9716)
            })
            .times(1)
            .returning(|req| Ok(RegisteredUser { email: req.email }));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(body(json!({})))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["email"], "asha@example.com");
    }

    #[actix_web::test]
    async fn a_single_coordinate_is_ignored() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .withf(|req| req.location.is_none())
            .times(1)
            .returning(|req| Ok(RegisteredUser { email: req.email }));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(body(json!({ "longitude": null })))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[case::missing_email(json!({ "email": null }), "email", "missing_field")]
    #[case::bad_email(json!({ "email": "not-an-email" }), "email", "invalid_field")]
    #[case::empty_password(json!({ "password": "" }), "password", "missing_field")]
    #[case::missing_phone(json!({ "phone": null }), "phone", "missing_field")]
    #[case::bad_phone(json!({ "phone": "call me" }), "phone", "invalid_field")]
    #[case::bad_latitude(json!({ "latitude": 123.0 }), "location", "invalid_field")]
    #[actix_web::test]
    async fn rejects_invalid_payloads(
        #[case] overrides: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(body(overrides))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(res).await;
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(detail(&value, "field"), Some(field));
        assert_eq!(detail(&value, "code"), Some(code));
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let mut ports = MockPorts::default();
        ports
            .accounts
            .expect_register()
            .returning(|_| Err(Error::conflict("email already registered")));
        let app = actix_test::init_service(test_app(ports)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(body(json!({})))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert!(res.headers().contains_key(crate::domain::TRACE_ID_HEADER));
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let body = RegisterUserBody {
            email: Some(Email::new("a@b.c").expect("email").to_string()),
            password: Some("hunter2".into()),
            phone: None,
            name: None,
            latitude: None,
            longitude: None,
        };
        assert!(!format!("{body:?}").contains("hunter2"));
    }
}
