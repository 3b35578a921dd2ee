use super::types::{request, response};
use crate::{
    modules::user::repository,
    types::Context,
    utils::{image::ImageKind, storage},
};
use std::sync::Arc;

pub async fn service(ctx: Arc<Context>, payload: request::Payload) -> response::Response {
    let account_id = payload.auth.identity.account_id;

    let contents = tokio::fs::read(payload.body.avatar.contents.path())
        .await
        .map_err(|err| {
            tracing::error!("Failed to read the uploaded file {:?}", err);
            response::Error::FailedToUploadAvatar
        })?;

    let kind = ImageKind::sniff(&contents).ok_or(response::Error::UnsupportedImageType)?;

    let previous_key = ctx
        .users
        .get_by_id(&account_id)
        .await
        .map_err(|err| match err {
            repository::Error::NotFound => response::Error::UserNotFound,
            _ => response::Error::FailedToUploadAvatar,
        })?
        .avatar_key;

    let key = storage::avatar_key(&account_id, kind.extension());

    ctx.storage
        .upload(&key, contents, kind.content_type())
        .await
        .map_err(|err| {
            tracing::error!("Failed to upload avatar for {}: {}", account_id, err);
            response::Error::FailedToUploadAvatar
        })?;

    if let Err(err) = ctx.users.update_avatar_reference(&account_id, &key).await {
        tracing::error!("Failed to store avatar key for {}: {}", account_id, err);
        if let Err(err) = ctx.storage.delete(&key).await {
            tracing::warn!("Failed to clean up orphaned avatar {}: {}", key, err);
        }
        return Err(match err {
            repository::Error::NotFound => response::Error::UserNotFound,
            _ => response::Error::FailedToUploadAvatar,
        });
    }

    if let Some(previous_key) = previous_key.filter(|previous| !previous.is_empty()) {
        if let Err(err) = ctx.storage.delete(&previous_key).await {
            tracing::warn!("Failed to delete previous avatar {}: {}", previous_key, err);
        }
    }

    Ok(response::Success::AvatarUpdated(ctx.storage.public_url(&key)))
}
