use super::types::{request, response};
use crate::{types::Context, utils::validation::validate_username};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, query: request::Query) -> response::Response {
    let username = query
        .username
        .filter(|username| !username.is_empty())
        .ok_or(response::Error::MissingUsername)?;

    validate_username(&username).map_err(response::Error::InvalidUsername)?;

    ctx.users
        .username_exists(&username)
        .await
        .map(|exists| response::Success::Availability(!exists))
        .map_err(|err| {
            tracing::error!("Failed to check username availability: {}", err);
            response::Error::FailedToCheckUsername
        })
}
