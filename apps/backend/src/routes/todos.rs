//! Todo mutation handlers.
//!
//! Every handler-level outcome travels in the `{status, message}` envelope
//! on a transport-200 response; only the gates in front of these routes use
//! transport status codes. Existing clients read the outcome from the body,
//! so the envelope is a compatibility contract.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extractors::AuthToken;
use crate::services::todos::{
    create_todo, delete_todo, update_todo, MutationError, NewTodo, TodoChanges,
};
use crate::state::app_state::AppState;

/// Response envelope with the outcome status carried in the body.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: u16,
    pub message: String,
}

impl StatusMessage {
    pub fn success() -> Self {
        Self {
            status: 200,
            message: "success".to_string(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: 401,
            message: "unauthorized".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub id: String,
    pub title: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub id: String,
    pub completed: Option<bool>,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTodoRequest {
    pub id: String,
}

/// Map a mutation outcome onto the envelope. Identity and ownership-chain
/// failures collapse into the same unauthorized body; store failures are
/// forwarded with the store's reported status and message.
fn respond(outcome: Result<(), MutationError>) -> HttpResponse {
    let envelope = match outcome {
        Ok(()) => StatusMessage::success(),
        Err(MutationError::Identity(_)) | Err(MutationError::Ownership(_)) => {
            StatusMessage::unauthorized()
        }
        Err(MutationError::Store(e)) => {
            warn!(error = %e, "store operation failed");
            StatusMessage {
                status: e.forwarded_status(),
                message: e.to_string(),
            }
        }
    };

    HttpResponse::Ok().json(envelope)
}

async fn create(
    auth: AuthToken,
    body: web::Json<CreateTodoRequest>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let body = body.into_inner();

    let outcome = create_todo(
        app_state.identity.as_ref(),
        app_state.store.as_ref(),
        &auth.token,
        NewTodo {
            id: body.id,
            title: body.title,
            created_at: body.created_at,
        },
    )
    .await;

    respond(outcome)
}

async fn update(
    auth: AuthToken,
    body: web::Json<UpdateTodoRequest>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let body = body.into_inner();

    let outcome = update_todo(
        app_state.identity.as_ref(),
        app_state.store.as_ref(),
        &auth.token,
        TodoChanges {
            id: body.id,
            completed: body.completed,
            title: body.title,
        },
    )
    .await;

    respond(outcome)
}

async fn delete(
    auth: AuthToken,
    body: web::Json<DeleteTodoRequest>,
    app_state: web::Data<AppState>,
) -> HttpResponse {
    let body = body.into_inner();

    let outcome = delete_todo(
        app_state.identity.as_ref(),
        app_state.store.as_ref(),
        &auth.token,
        &body.id,
    )
    .await;

    respond(outcome)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/")
            .route(web::post().to(create))
            .route(web::put().to(update))
            .route(web::delete().to(delete)),
    );
}
