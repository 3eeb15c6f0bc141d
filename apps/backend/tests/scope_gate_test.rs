//! Scope-gate behavior: a valid token without the write scope stops the
//! request before identity resolution, with a 403 distinct from the token
//! gate's 401s.

mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend::config::auth::AuthConfig;
use backend::middleware::jwt_gate::JwtGate;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::scope_gate::ScopeGate;
use backend::routes;
use backend_test_support::keys::{bearer, mint_token, test_claims};
use backend_test_support::problem_details::assert_problem_details;
use backend_test_support::status_message::assert_success;
use common::{state_with, valid_token, FakeIdentity, InMemoryTodoStore};

macro_rules! gated_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestTrace)
                .app_data(web::Data::new($state))
                .service(
                    web::scope("")
                        .wrap(ScopeGate)
                        .wrap(JwtGate)
                        .configure(routes::todos::configure_routes),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_write_scope_is_forbidden_before_identity_resolution() {
    let store = Arc::new(InMemoryTodoStore::new());
    let identity = Arc::new(FakeIdentity::new());
    let app = gated_app!(state_with(store.clone(), identity.clone()));

    let token = valid_token("auth0|alice", "read:todos");

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("Authorization", bearer(&token)))
        .set_json(serde_json::json!({ "id": "1", "title": "Buy milk", "createdAt": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details(resp, StatusCode::FORBIDDEN, "FORBIDDEN_MISSING_SCOPE").await;
    assert_eq!(identity.calls(), 0);
    assert!(store.ops().is_empty());
}

#[actix_web::test]
async fn empty_scope_is_forbidden() {
    let store = Arc::new(InMemoryTodoStore::new());
    let identity = Arc::new(FakeIdentity::new());
    let app = gated_app!(state_with(store.clone(), identity.clone()));

    let token = valid_token("auth0|alice", "");

    let req = test::TestRequest::delete()
        .uri("/")
        .insert_header(("Authorization", bearer(&token)))
        .set_json(serde_json::json!({ "id": "1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(store.ops().is_empty());
}

#[actix_web::test]
async fn write_scope_among_others_passes_the_gate() {
    let store = Arc::new(InMemoryTodoStore::new());
    let token = valid_token("auth0|alice", "openid profile read:todos write:todos");
    let identity = Arc::new(FakeIdentity::new().with_user(&token, "a@x.com", "alice"));
    let app = gated_app!(state_with(store.clone(), identity.clone()));

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("Authorization", bearer(&token)))
        .set_json(serde_json::json!({ "id": "1", "title": "Buy milk", "createdAt": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_success(resp).await;
    assert_eq!(identity.calls(), 1);
}

#[actix_web::test]
async fn array_form_scope_claim_is_accepted() {
    let store = Arc::new(InMemoryTodoStore::new());

    let auth = AuthConfig::for_tests();
    let mut claims = test_claims(&auth.issuer, &auth.audience, "auth0|alice", "");
    claims["scope"] = serde_json::json!(["write:todos"]);
    let token = mint_token(&claims);

    let identity = Arc::new(FakeIdentity::new().with_user(&token, "a@x.com", "alice"));
    let app = gated_app!(state_with(store.clone(), identity.clone()));

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("Authorization", bearer(&token)))
        .set_json(serde_json::json!({ "id": "1", "title": "Buy milk", "createdAt": 1000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_success(resp).await;
}
