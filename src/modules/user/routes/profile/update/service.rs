use super::super::types::Profile;
use super::types::{request, response};
use crate::{
    modules::user::repository::{self, UpdateProfilePayload},
    types::Context,
};
use std::sync::Arc;
use validator::Validate;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    payload.body.validate().map_err(|errors| {
        tracing::warn!("Failed to validate payload: {errors}");
        response::Error::FailedToValidate(errors)
    })?;

    let account_id = payload.auth.identity.account_id;
    let body = payload.body;

    let user = ctx
        .users
        .update_profile(
            &account_id,
            UpdateProfilePayload {
                username: body.username,
                full_name: body.full_name,
                bio: body.bio,
                business_phone: body.business_phone,
                address: body.address,
            },
        )
        .await
        .map_err(|err| match err {
            repository::Error::UsernameConflict => response::Error::UsernameTaken,
            repository::Error::NotFound => response::Error::UserNotFound,
            _ => response::Error::FailedToUpdateUser,
        })?;

    Ok(response::Success::Profile(Profile::new(
        user,
        ctx.storage.as_ref(),
    )))
}
