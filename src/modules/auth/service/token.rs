//! Bearer credentials.
//!
//! Tokens are HS256 JWTs signed with a key held only by this process. Nothing
//! is persisted: a token is valid exactly while its signature checks out and
//! its expiry lies in the future.

use crate::modules::user::repository::AccountType;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ulid::Ulid;

pub const TOKEN_VALIDITY_DAYS: i64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unauthorized")]
    Unauthorized,
    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub phone: String,
    pub account_type: AccountType,
    pub iat: i64,
    pub exp: i64,
    /// Makes tokens minted within the same second distinct.
    pub jti: String,
}

/// Verified identity of the caller, threaded explicitly into protected
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account_id: String,
    pub phone: String,
    pub account_type: AccountType,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            phone: claims.phone,
            account_type: claims.account_type,
        }
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<Keys>,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
                validation,
            }),
        }
    }

    pub fn issue(
        &self,
        account_id: &str,
        phone: &str,
        account_type: AccountType,
    ) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.to_string(),
            phone: phone.to_string(),
            account_type,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
            jti: Ulid::new().to_string(),
        };

        self.sign(&claims)
    }

    pub fn verify(&self, token: &str) -> Result<Identity, Error> {
        decode::<Claims>(token, &self.keys.decoding, &self.keys.validation)
            .map(|data| data.claims.into())
            .map_err(|err| {
                tracing::debug!("Rejected bearer token: {}", err);
                Error::Unauthorized
            })
    }

    fn sign(&self, claims: &Claims) -> Result<String, Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding).map_err(|err| {
            tracing::error!("Failed to sign token: {}", err);
            Error::Signing(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret";

    fn claims(exp: i64) -> Claims {
        Claims {
            sub: "01J0ACCOUNT".to_string(),
            phone: "09121234567".to_string(),
            account_type: AccountType::Personal,
            iat: Utc::now().timestamp(),
            exp,
            jti: Ulid::new().to_string(),
        }
    }

    #[test]
    fn issued_tokens_verify_to_the_same_identity() {
        let tokens = TokenIssuer::new(SECRET);
        let token = tokens
            .issue("01J0ACCOUNT", "09121234567", AccountType::Business)
            .unwrap();

        let identity = tokens.verify(&token).unwrap();
        assert_eq!(
            identity,
            Identity {
                account_id: "01J0ACCOUNT".to_string(),
                phone: "09121234567".to_string(),
                account_type: AccountType::Business,
            }
        );
    }

    #[test]
    fn tokens_expire_after_thirty_days() {
        let tokens = TokenIssuer::new(SECRET);
        let token = tokens
            .issue("01J0ACCOUNT", "09121234567", AccountType::Personal)
            .unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .unwrap();
        assert_eq!(
            data.claims.exp - data.claims.iat,
            Duration::days(30).num_seconds()
        );
        assert_eq!(data.claims.account_type, AccountType::Personal);
    }

    #[test]
    fn consecutive_tokens_differ() {
        let tokens = TokenIssuer::new(SECRET);
        let first = tokens
            .issue("01J0ACCOUNT", "09121234567", AccountType::Personal)
            .unwrap();
        let second = tokens
            .issue("01J0ACCOUNT", "09121234567", AccountType::Personal)
            .unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn expired_tokens_are_unauthorized() {
        let tokens = TokenIssuer::new(SECRET);
        let token = tokens
            .sign(&claims(Utc::now().timestamp() - 1))
            .unwrap();

        assert!(matches!(tokens.verify(&token), Err(Error::Unauthorized)));
    }

    #[test]
    fn tokens_signed_with_another_key_are_unauthorized() {
        let token = TokenIssuer::new("another_secret")
            .issue("01J0ACCOUNT", "09121234567", AccountType::Personal)
            .unwrap();

        assert!(matches!(
            TokenIssuer::new(SECRET).verify(&token),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn tokens_using_another_algorithm_are_unauthorized() {
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims(Utc::now().timestamp() + 60),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            TokenIssuer::new(SECRET).verify(&token),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let tokens = TokenIssuer::new(SECRET);
        assert!(matches!(tokens.verify("not-a-token"), Err(Error::Unauthorized)));
        assert!(matches!(tokens.verify(""), Err(Error::Unauthorized)));
    }
}
