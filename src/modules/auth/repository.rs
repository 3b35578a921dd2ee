#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use ulid::Ulid;

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Otp {
    pub id: String,
    pub phone: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Otp {
    /// Unconsumed and not yet expired at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no active otp")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Consumes every active code for `phone` and inserts the new one as a
    /// single atomic unit.
    async fn issue_or_replace(&self, phone: &str, code: &str, expires_at: DateTime<Utc>)
        -> Result<Otp>;

    /// Most recent unconsumed, unexpired code for `phone`.
    async fn get_active(&self, phone: &str) -> Result<Otp>;

    /// Idempotent: a consumed code keeps its first consumption time.
    async fn mark_consumed(&self, id: &str) -> Result<()>;

    /// Consumes `id` only while it is still unconsumed. Of several concurrent
    /// claims on one code exactly one succeeds; the others get `NotFound`.
    async fn claim(&self, id: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct PgOtpStore {
    pool: PgPool,
}

impl PgOtpStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OtpStore for PgOtpStore {
    async fn issue_or_replace(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Otp> {
        // dropping the transaction without commit (error or cancellation) rolls
        // back both statements
        let mut tx = self.pool.begin().await.map_err(|err| {
            tracing::error!("Failed to start database transaction: {}", err);
            Error::Storage(err)
        })?;

        // serialises concurrent issues for one phone until commit, so the
        // invalidation below always sees the code a racing issue inserted
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(phone)
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                tracing::error!("Failed to lock otps of {}: {}", phone, err);
                Error::Storage(err)
            })?;

        sqlx::query(
            "
            UPDATE otps SET consumed_at = NOW()
            WHERE phone = $1 AND consumed_at IS NULL
            ",
        )
        .bind(phone)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            tracing::error!("Failed to invalidate previous otps: {}", err);
            Error::Storage(err)
        })?;

        let otp = sqlx::query_as::<_, Otp>(
            "
            INSERT INTO otps (id, phone, code, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(Ulid::new().to_string())
        .bind(phone)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while creating otp: {}", err);
            Error::Storage(err)
        })?;

        tx.commit().await.map_err(|err| {
            tracing::error!("Failed to commit database transaction: {}", err);
            Error::Storage(err)
        })?;

        Ok(otp)
    }

    async fn get_active(&self, phone: &str) -> Result<Otp> {
        sqlx::query_as::<_, Otp>(
            "
            SELECT * FROM otps
            WHERE phone = $1 AND consumed_at IS NULL AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            ",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            tracing::error!("Error occurred while trying to fetch active otp: {}", err);
            Error::Storage(err)
        })?
        .ok_or(Error::NotFound)
    }

    async fn mark_consumed(&self, id: &str) -> Result<()> {
        sqlx::query("UPDATE otps SET consumed_at = COALESCE(consumed_at, NOW()) WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                tracing::error!("Failed to mark otp {} as consumed: {}", id, err);
                Error::Storage(err)
            })
            .map(|_| ())
    }

    async fn claim(&self, id: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE otps SET consumed_at = NOW() WHERE id = $1 AND consumed_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            tracing::error!("Failed to claim otp {}: {}", id, err);
            Error::Storage(err)
        })?;

        match result.rows_affected() {
            1 => Ok(()),
            _ => Err(Error::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryOtpStore;
    use super::*;
    use chrono::Duration;

    const PHONE: &str = "09121234567";

    #[tokio::test]
    async fn issuing_supersedes_the_previous_code() {
        let otps = MemoryOtpStore::default();
        let expires_at = Utc::now() + Duration::minutes(2);

        let first = otps.issue_or_replace(PHONE, "11111", expires_at).await.unwrap();
        let second = otps.issue_or_replace(PHONE, "22222", expires_at).await.unwrap();

        let active = otps.get_active(PHONE).await.unwrap();
        assert_eq!(active.id, second.id);
        assert_eq!(active.code, "22222");

        let history = otps.history(PHONE);
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.iter().filter(|otp| otp.is_active(Utc::now())).count(),
            1
        );
        let superseded = history.iter().find(|otp| otp.id == first.id).unwrap();
        assert!(superseded.consumed_at.is_some());
    }

    #[tokio::test]
    async fn codes_are_scoped_per_phone() {
        let otps = MemoryOtpStore::default();
        let expires_at = Utc::now() + Duration::minutes(2);

        otps.issue_or_replace(PHONE, "11111", expires_at).await.unwrap();
        otps.issue_or_replace("09127654321", "22222", expires_at)
            .await
            .unwrap();

        assert_eq!(otps.get_active(PHONE).await.unwrap().code, "11111");
        assert_eq!(
            otps.get_active("09127654321").await.unwrap().code,
            "22222"
        );
    }

    #[tokio::test]
    async fn expired_and_consumed_codes_are_not_found() {
        let otps = MemoryOtpStore::default();

        otps.issue_or_replace(PHONE, "11111", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert!(matches!(otps.get_active(PHONE).await, Err(Error::NotFound)));

        let otp = otps
            .issue_or_replace(PHONE, "22222", Utc::now() + Duration::minutes(2))
            .await
            .unwrap();
        otps.mark_consumed(&otp.id).await.unwrap();
        assert!(matches!(otps.get_active(PHONE).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    async fn consuming_twice_keeps_the_first_timestamp() {
        let otps = MemoryOtpStore::default();
        let otp = otps
            .issue_or_replace(PHONE, "11111", Utc::now() + Duration::minutes(2))
            .await
            .unwrap();

        otps.mark_consumed(&otp.id).await.unwrap();
        let consumed_at = otps.history(PHONE)[0].consumed_at;
        otps.mark_consumed(&otp.id).await.unwrap();

        assert!(consumed_at.is_some());
        assert_eq!(otps.history(PHONE)[0].consumed_at, consumed_at);
    }

    #[tokio::test]
    async fn a_code_can_be_claimed_once() {
        let otps = MemoryOtpStore::default();
        let otp = otps
            .issue_or_replace(PHONE, "11111", Utc::now() + Duration::minutes(2))
            .await
            .unwrap();

        otps.claim(&otp.id).await.unwrap();

        assert!(matches!(otps.claim(&otp.id).await, Err(Error::NotFound)));
        assert!(matches!(otps.get_active(PHONE).await, Err(Error::NotFound)));
    }

    async fn active_count(pool: &PgPool, phone: &str) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM otps WHERE phone = $1 AND consumed_at IS NULL",
        )
        .bind(phone)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn postgres_issuing_supersedes_the_previous_code() {
        let (pool, _container) = crate::utils::testing::postgres().await;
        let otps = PgOtpStore::new(pool.clone());
        let expires_at = Utc::now() + Duration::minutes(2);

        let first = otps.issue_or_replace(PHONE, "11111", expires_at).await.unwrap();
        let second = otps.issue_or_replace(PHONE, "22222", expires_at).await.unwrap();

        let active = otps.get_active(PHONE).await.unwrap();
        assert_eq!(active.id, second.id);
        assert_ne!(active.id, first.id);
        assert_eq!(active_count(&pool, PHONE).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn postgres_concurrent_issues_leave_one_active_code() {
        let (pool, _container) = crate::utils::testing::postgres().await;
        let otps = PgOtpStore::new(pool.clone());
        let expires_at = Utc::now() + Duration::minutes(2);

        let issues = (0..8)
            .map(|n| {
                let otps = otps.clone();
                tokio::spawn(async move {
                    otps.issue_or_replace(PHONE, &format!("{:05}", n), expires_at)
                        .await
                })
            })
            .collect::<Vec<_>>();
        for issue in issues {
            issue.await.unwrap().unwrap();
        }

        assert_eq!(active_count(&pool, PHONE).await, 1);
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn postgres_expired_codes_are_not_active() {
        let (pool, _container) = crate::utils::testing::postgres().await;
        let otps = PgOtpStore::new(pool);

        otps.issue_or_replace(PHONE, "11111", Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(otps.get_active(PHONE).await, Err(Error::NotFound)));
    }

    #[tokio::test]
    #[ignore] // Requires Docker
    async fn postgres_concurrent_claims_admit_one() {
        let (pool, _container) = crate::utils::testing::postgres().await;
        let otps = PgOtpStore::new(pool);
        let otp = otps
            .issue_or_replace(PHONE, "11111", Utc::now() + Duration::minutes(2))
            .await
            .unwrap();

        let (first, second) = tokio::join!(otps.claim(&otp.id), otps.claim(&otp.id));

        assert_eq!(
            [first, second].iter().filter(|claim| claim.is_ok()).count(),
            1
        );
        otps.mark_consumed(&otp.id).await.unwrap();
        assert!(matches!(otps.get_active(PHONE).await, Err(Error::NotFound)));
    }
}
