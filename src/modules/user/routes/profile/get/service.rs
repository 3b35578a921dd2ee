use super::super::types::Profile;
use super::types::{request, response};
use crate::{modules::user::repository, types::Context};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let user = ctx
        .users
        .get_by_id(&payload.auth.identity.account_id)
        .await
        .map_err(|err| match err {
            repository::Error::NotFound => response::Error::UserNotFound,
            _ => response::Error::FailedToFetchUser,
        })?;

    Ok(response::Success::Profile(Profile::new(
        user,
        ctx.storage.as_ref(),
    )))
}
