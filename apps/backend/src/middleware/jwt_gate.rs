//! Bearer-token gate.
//!
//! Runs before any mutation handler: extracts the Authorization bearer
//! credential, verifies it against the provider's key set, and stores the
//! decoded claims in request extensions for the scope gate. Any failure
//! short-circuits with an authentication-failure response; no handler logic
//! runs.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::verify_bearer_token;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct JwtGate;

impl<S, B> Transform<S, ServiceRequest> for JwtGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct JwtGateMiddleware<S> {
    service: Rc<S>,
}

/// Convert a gate failure into its Problem Details response without calling
/// the downstream service.
fn deny<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    use actix_web::ResponseError;
    req.into_response(err.error_response()).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for JwtGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token =
                match extract_bearer_from_header(req.headers().get(header::AUTHORIZATION)) {
                    Ok(token) => token,
                    Err(e) => return Ok(deny(req, e)),
                };

            let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => state,
                None => {
                    return Ok(deny(
                        req,
                        AppError::internal("AppState not available".to_string()),
                    ))
                }
            };

            // Key resolution may hit the network, hence the async gate.
            match verify_bearer_token(&token, &app_state.keys, &app_state.auth).await {
                Ok(claims) => {
                    // Store claims in request extensions BEFORE calling the service
                    req.extensions_mut().insert(claims);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => Ok(deny(req, e)),
            }
        })
    }
}

fn extract_bearer_from_header(
    header_value: Option<&actix_web::http::header::HeaderValue>,
) -> Result<String, AppError> {
    let auth_value = header_value.ok_or_else(AppError::unauthorized_missing_bearer)?;

    let auth_str = auth_value
        .to_str()
        .map_err(|_| AppError::unauthorized_missing_bearer())?;

    let parts: Vec<&str> = auth_str.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(AppError::unauthorized_missing_bearer());
    }

    let token = parts[1];
    if token.is_empty() {
        return Err(AppError::unauthorized_missing_bearer());
    }

    Ok(token.to_string())
}
