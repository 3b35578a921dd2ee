use super::types::{request, response};
use crate::{modules::user::repository::AccountType, types::Context};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let account_type = payload
        .account_type
        .parse::<AccountType>()
        .map_err(|_| response::Error::InvalidAccountType)?;

    ctx.auth
        .register(&payload.phone, account_type)
        .await
        .map(|registration| {
            response::Success::Registered(response::Registered {
                token: registration.token,
                user: registration.user,
            })
        })
        .map_err(|err| {
            tracing::error!("Failed to register {}: {}", payload.phone, err);
            response::Error::RegistrationFailed
        })
}
