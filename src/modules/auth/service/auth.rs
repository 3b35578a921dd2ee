use super::{otp, token::TokenIssuer};
use crate::{
    modules::{
        auth::repository::{self as otp_repository, OtpStore},
        notification::service::{self as notification, sms},
        user::repository::{self as user_repository, AccountType, User, UserDirectory},
    },
    types::AppEnvironment,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No active code, an expired code and a wrong code are reported alike.
    #[error("invalid or expired OTP")]
    InvalidCode,
    #[error("failed to create account")]
    CreationFailed,
    #[error("storage failure")]
    Storage,
    #[error("failed to deliver code: {0}")]
    Delivery(#[from] notification::Error),
    #[error(transparent)]
    Token(#[from] super::token::Error),
}

type Result<T> = std::result::Result<T, Error>;

impl From<otp_repository::Error> for Error {
    fn from(err: otp_repository::Error) -> Self {
        match err {
            otp_repository::Error::NotFound => Self::InvalidCode,
            otp_repository::Error::Storage(_) => Self::Storage,
        }
    }
}

#[derive(Debug)]
pub struct Verification {
    pub is_new_user: bool,
    pub token: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug)]
pub struct Registration {
    pub token: String,
    pub user: User,
}

/// Orchestrates code issuance, verification and registration for a phone
/// number. The per-phone state lives entirely in the two stores.
#[derive(Clone)]
pub struct AuthService {
    otps: Arc<dyn OtpStore>,
    users: Arc<dyn UserDirectory>,
    tokens: TokenIssuer,
    environment: AppEnvironment,
}

impl AuthService {
    pub fn new(
        otps: Arc<dyn OtpStore>,
        users: Arc<dyn UserDirectory>,
        tokens: TokenIssuer,
        environment: AppEnvironment,
    ) -> Self {
        Self {
            otps,
            users,
            tokens,
            environment,
        }
    }

    /// Issues a fresh code, superseding any active one. Serves both send and
    /// resend.
    pub async fn request_code(&self, phone: &str) -> Result<()> {
        let code = otp::generate_code();
        let expires_at = Utc::now() + Duration::seconds(otp::OTP_TTL_SECS);

        self.otps.issue_or_replace(phone, &code, expires_at).await?;

        if self.environment.is_production() {
            sms::send(phone, &code).await?;
        } else {
            tracing::info!(phone = %phone, code = %code, "Issued verification code");
        }

        Ok(())
    }

    pub async fn verify_code(&self, phone: &str, submitted_code: &str) -> Result<Verification> {
        let active = self.otps.get_active(phone).await?;

        if !otp::codes_match(&active.code, submitted_code) {
            return Err(Error::InvalidCode);
        }

        // consumed before the account lookup so the same code can never be
        // replayed, whatever the lookup yields; losing a concurrent claim on
        // the same code reads as an invalid code
        self.otps.claim(&active.id).await?;

        match self.users.get_by_phone(phone).await {
            Ok(user) => {
                let token = self.issue_for(&user)?;
                Ok(Verification {
                    is_new_user: false,
                    token: Some(token),
                    account_id: Some(user.id),
                })
            }
            Err(user_repository::Error::NotFound) => Ok(Verification {
                is_new_user: true,
                token: None,
                account_id: None,
            }),
            Err(_) => Err(Error::Storage),
        }
    }

    /// Idempotent: an already registered phone gets a fresh token for its
    /// existing account. Losing a concurrent creation race is handled the
    /// same way.
    pub async fn register(&self, phone: &str, account_type: AccountType) -> Result<Registration> {
        let user = match self.users.get_by_phone(phone).await {
            Ok(user) => user,
            Err(user_repository::Error::NotFound) => self.create_or_fetch(phone, account_type).await?,
            Err(_) => return Err(Error::CreationFailed),
        };

        let token = self.issue_for(&user)?;
        Ok(Registration { token, user })
    }

    async fn create_or_fetch(&self, phone: &str, account_type: AccountType) -> Result<User> {
        match self.users.create(phone, account_type).await {
            Ok(user) => {
                tracing::info!(account_id = %user.id, "Registered new account");
                Ok(user)
            }
            Err(user_repository::Error::AlreadyExists) => {
                tracing::debug!("Concurrent registration for {}, reusing account", phone);
                self.users
                    .get_by_phone(phone)
                    .await
                    .map_err(|_| Error::CreationFailed)
            }
            Err(_) => Err(Error::CreationFailed),
        }
    }

    fn issue_for(&self, user: &User) -> Result<String> {
        Ok(self
            .tokens
            .issue(&user.id, &user.phone, user.account_type)?)
    }
}
