//! The stable error contract: gate failures are application/problem+json
//! with matching x-trace-id header and body trace_id.

mod common;

use std::sync::Arc;

use actix_web::{test, web, App};
use backend::middleware::jwt_gate::JwtGate;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::scope_gate::ScopeGate;
use backend::routes;
use common::{state_with, FakeIdentity, InMemoryTodoStore};
use serde_json::Value;

#[actix_web::test]
async fn gate_failure_has_problem_details_shape() {
    let store = Arc::new(InMemoryTodoStore::new());
    let identity = Arc::new(FakeIdentity::new());

    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state_with(store, identity)))
            .service(
                web::scope("")
                    .wrap(ScopeGate)
                    .wrap(JwtGate)
                    .configure(routes::todos::configure_routes),
            ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .set_json(serde_json::json!({ "id": "1", "title": "x", "createdAt": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 401);

    let headers = resp.headers().clone();
    let content_type = headers.get("content-type").unwrap().to_str().unwrap();
    assert_eq!(content_type, "application/problem+json");

    let trace_id_header = headers
        .get("x-trace-id")
        .expect("x-trace-id header should be present")
        .to_str()
        .unwrap()
        .to_string();
    assert!(!trace_id_header.is_empty());

    let body = test::read_body(resp).await;
    let problem: Value = serde_json::from_slice(&body).unwrap();

    // All required keys are present
    assert!(problem.get("type").is_some());
    assert!(problem.get("title").is_some());
    assert!(problem.get("status").is_some());
    assert!(problem.get("detail").is_some());
    assert!(problem.get("code").is_some());
    assert!(problem.get("trace_id").is_some());

    assert_eq!(problem["code"], "UNAUTHORIZED_MISSING_BEARER");
    assert_eq!(problem["status"], 401);
    assert!(problem["type"]
        .as_str()
        .unwrap()
        .ends_with("/errors/UNAUTHORIZED_MISSING_BEARER"));

    // trace_id in body equals the header value
    assert_eq!(problem["trace_id"].as_str().unwrap(), trace_id_header);
}
