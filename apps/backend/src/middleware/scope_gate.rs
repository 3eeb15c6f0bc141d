//! Write-scope gate.
//!
//! Runs after `JwtGate`: reads the decoded claims from request extensions
//! and requires the configured write scope. Denial is an authorization
//! failure (403), distinct from the authentication failures the token gate
//! produces, and stops the request before identity resolution.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::claims::AccessClaims;
use crate::auth::scope::has_scope;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub struct ScopeGate;

impl<S, B> Transform<S, ServiceRequest> for ScopeGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ScopeGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ScopeGateMiddleware { service }))
    }
}

pub struct ScopeGateMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ScopeGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let deny = |req: ServiceRequest, err: AppError| {
            let res = req.into_response(err.error_response()).map_into_right_body();
            Box::pin(async move { Ok(res) }) as Self::Future
        };

        let app_state = match req.app_data::<web::Data<AppState>>().cloned() {
            Some(state) => state,
            None => {
                return deny(req, AppError::internal("AppState not available".to_string()));
            }
        };

        // JwtGate stores claims before this gate runs; their absence means
        // the route was wired without the token gate.
        let claims = req.extensions().get::<AccessClaims>().cloned();
        let claims = match claims {
            Some(claims) => claims,
            None => return deny(req, AppError::unauthorized()),
        };

        if !has_scope(&claims, &app_state.auth.write_scope) {
            return deny(
                req,
                AppError::forbidden_missing_scope(app_state.auth.write_scope.clone()),
            );
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
