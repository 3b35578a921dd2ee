use super::types::{request, response};
use crate::{modules::auth::service::auth, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let verification = ctx
        .auth
        .verify_code(&payload.phone, &payload.code)
        .await
        .map_err(|err| match err {
            auth::Error::InvalidCode => response::Error::InvalidCode,
            err => {
                tracing::error!("Failed to verify code: {}", err);
                response::Error::UnexpectedError
            }
        })?;

    Ok(response::Success::Verified(response::Verified {
        is_new_user: verification.is_new_user,
        token: verification.token,
        account_id: verification.account_id,
    }))
}
