use super::HttpState;
use crate::domain::error::{AppError, Result};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Username taken from a valid `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.0
    }
}

pub(crate) fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser> {
    let data = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| AppError::Internal("HTTP state is not registered".to_string()))?;
    let token =
        bearer_token(req).ok_or_else(|| AppError::Unauthorized(NOT_AUTHENTICATED.to_string()))?;
    let username = data.state.auth_use_case.authenticate(token)?;
    Ok(AuthenticatedUser(username))
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
