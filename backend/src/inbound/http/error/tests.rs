//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case::missing(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case::conflict(Error::conflict("again"), StatusCode::CONFLICT)]
#[case::unavailable(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::internal(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_json(error: &Error) -> (StatusCode, Option<String>, Value) {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body()).await.expect("body bytes");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, header, value)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let (status, header, body) = response_json(&error).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["traceId"], TRACE_ID);
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::conflict("medicine already shared to the community")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "medicineId"}));

    let (status, header, body) = response_json(&error).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(header.as_deref(), Some(TRACE_ID));
    assert_eq!(body["message"], "medicine already shared to the community");
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["field"], "medicineId");
}

#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let (_, header, body) = response_json(&Error::not_found("medicine not found")).await;
    assert!(header.is_none());
    assert!(body.get("traceId").is_none());
}
