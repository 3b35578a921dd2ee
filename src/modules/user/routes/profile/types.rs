use crate::{modules::user::repository::User, utils::storage::ObjectStorage};
use serde::Serialize;

/// Account as shown to its owner, with the stored avatar key resolved to a
/// public URL.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn new(user: User, storage: &dyn ObjectStorage) -> Self {
        let avatar_url = user
            .avatar_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| storage.public_url(key));

        Self { user, avatar_url }
    }
}
