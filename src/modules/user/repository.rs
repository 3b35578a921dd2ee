#[cfg(test)]
pub mod memory;

use crate::utils::database::is_unique_violation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;
use ulid::Ulid;

const PHONE_CONSTRAINT: &str = "users_phone_key";
const USERNAME_CONSTRAINT: &str = "users_username_key";

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("user not found")]
    NotFound,
    #[error("phone number already registered")]
    AlreadyExists,
    #[error("username already taken")]
    UsernameConflict,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Personal,
    Children,
    Business,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown account type: {0}")]
pub struct UnknownAccountType(String);

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Children => "children",
            Self::Business => "business",
        }
    }
}

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value {
            "personal" => Ok(Self::Personal),
            "children" => Ok(Self::Children),
            "business" => Ok(Self::Business),
            other => Err(UnknownAccountType(other.to_string())),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = UnknownAccountType;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Serialize, Clone, Debug, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub phone: String,
    #[sqlx(try_from = "String")]
    pub account_type: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip)]
    pub avatar_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default)]
pub struct UpdateProfilePayload {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub business_phone: Option<String>,
    pub address: Option<String>,
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fails with `AlreadyExists` when the phone number is taken.
    async fn create(&self, phone: &str, account_type: AccountType) -> Result<User>;

    async fn get_by_id(&self, id: &str) -> Result<User>;

    async fn get_by_phone(&self, phone: &str) -> Result<User>;

    async fn update_profile(&self, id: &str, payload: UpdateProfilePayload) -> Result<User>;

    /// Advisory only: the unique constraint on write is authoritative.
    async fn username_exists(&self, username: &str) -> Result<bool>;

    async fn update_avatar_reference(&self, id: &str, key: &str) -> Result<User>;
}

#[derive(Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn create(&self, phone: &str, account_type: AccountType) -> Result<User> {
        sqlx::query_as::<_, User>(
            "
            INSERT INTO users (id, phone, account_type)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(Ulid::new().to_string())
        .bind(phone)
        .bind(account_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, PHONE_CONSTRAINT) {
                return Error::AlreadyExists;
            }
            tracing::error!("Error occurred while creating a user account: {}", err);
            Error::Storage(err)
        })
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while fetching user with id {}: {}", id, err);
                Error::Storage(err)
            })?
            .ok_or(Error::NotFound)
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE phone = $1")
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred in get_by_phone: {}", err);
                Error::Storage(err)
            })?
            .ok_or(Error::NotFound)
    }

    async fn update_profile(&self, id: &str, payload: UpdateProfilePayload) -> Result<User> {
        sqlx::query_as::<_, User>(
            "
            UPDATE users SET
                username = COALESCE($2, username),
                full_name = COALESCE($3, full_name),
                bio = COALESCE($4, bio),
                business_phone = COALESCE($5, business_phone),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE
                id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(payload.username)
        .bind(payload.full_name)
        .bind(payload.bio)
        .bind(payload.business_phone)
        .bind(payload.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err, USERNAME_CONSTRAINT) {
                return Error::UsernameConflict;
            }
            tracing::error!(
                "Error occurred while trying to update a user by id {}: {}",
                id,
                err
            );
            Error::Storage(err)
        })?
        .ok_or(Error::NotFound)
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!("Error occurred while checking username: {}", err);
                Error::Storage(err)
            })
    }

    async fn update_avatar_reference(&self, id: &str, key: &str) -> Result<User> {
        sqlx::query_as::<_, User>(
            "
            UPDATE users SET
                avatar_key = $2,
                updated_at = NOW()
            WHERE
                id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to update avatar of user {}: {}", id, err);
            Error::Storage(err)
        })?
        .ok_or(Error::NotFound)
    }
}
