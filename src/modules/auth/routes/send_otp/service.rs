use super::types::{request, response};
use crate::types::Context;
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    ctx.auth
        .request_code(&payload.phone)
        .await
        .map(|_| response::Success::CodeSent)
        .map_err(|err| {
            tracing::error!("Failed to issue verification code: {}", err);
            response::Error::FailedToSendOtp
        })
}
