use super::service::token::Identity;
use crate::{types::Context, utils::response};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::Response,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::sync::Arc;

/// Authenticated caller. Extracting it rejects the request with a 401 envelope
/// unless it carries a valid bearer token.
#[derive(Debug, Clone)]
pub struct Auth {
    pub identity: Identity,
}

fn unauthorized(message: &'static str) -> Response {
    response::err(StatusCode::UNAUTHORIZED, message)
}

#[async_trait]
impl FromRequestParts<Arc<Context>> for Auth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<Context>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| match rejection.is_missing() {
                true => unauthorized("authorization header required"),
                false => unauthorized("invalid authorization header format"),
            })?;

        ctx.tokens
            .verify(bearer.token())
            .map(|identity| Self { identity })
            .map_err(|_| unauthorized("invalid or expired token"))
    }
}
