//! Assertion helpers for the `{status, message}` response envelope.
//!
//! Handler-level outcomes ride on a transport-200 response with the outcome
//! status inside the body; these helpers keep that contract checked in one
//! place.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatusMessageLike {
    pub status: u16,
    pub message: String,
}

/// Read and parse the envelope, asserting the transport-200 carrier.
pub async fn read_status_message<B>(resp: ServiceResponse<B>) -> StatusMessageLike
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    assert_eq!(
        resp.status().as_u16(),
        200,
        "envelope rides on transport 200"
    );

    let body = actix_web::test::read_body(resp).await;
    serde_json::from_slice(&body).expect("body should be a status/message envelope")
}

/// Assert a response carrying the expected envelope status and message.
pub async fn assert_status_message<B>(resp: ServiceResponse<B>, expected_status: u16, expected_message: &str)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    let envelope = read_status_message(resp).await;
    assert_eq!(envelope.status, expected_status);
    assert_eq!(envelope.message, expected_message);
}

/// Assert the success envelope `{200, "success"}`.
pub async fn assert_success<B>(resp: ServiceResponse<B>)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    assert_status_message(resp, 200, "success").await;
}

/// Assert the collapsed unauthorized envelope `{401, "unauthorized"}`.
pub async fn assert_unauthorized<B>(resp: ServiceResponse<B>)
where
    B: MessageBody,
    B::Error: std::fmt::Debug,
{
    assert_status_message(resp, 401, "unauthorized").await;
}
