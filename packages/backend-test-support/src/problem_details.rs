//! Problem Details assertion helpers.
//!
//! Gate and infrastructure failures use the `application/problem+json`
//! contract; these helpers validate it without depending on backend types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Local ProblemDetails struct matching the backend's error contract.
#[derive(Debug, Deserialize, Serialize)]
struct ProblemDetailsLike {
    #[serde(rename = "type")]
    type_: String,
    title: String,
    status: u16,
    detail: String,
    code: String,
    trace_id: String,
}

/// Assert that a ServiceResponse conforms to the stable error contract:
/// - HTTP status matches expected
/// - content type is application/problem+json
/// - x-trace-id header exists and matches the body trace_id
/// - code and status fields match expected values
pub async fn assert_problem_details<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_code: &str,
) where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_eq!(status, expected_status);

    let content_type = headers
        .get("content-type")
        .expect("content-type header should be present")
        .to_str()
        .expect("content-type header should be valid UTF-8");
    assert_eq!(content_type, "application/problem+json");

    let problem: ProblemDetailsLike =
        serde_json::from_slice(&body).expect("body should be valid ProblemDetails JSON");

    assert_eq!(problem.code, expected_code);
    assert_eq!(problem.status, expected_status.as_u16());

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .expect("x-trace-id header should be valid UTF-8");
    assert_eq!(
        problem.trace_id, trace_id_header,
        "trace_id in body should match x-trace-id header"
    );
}
