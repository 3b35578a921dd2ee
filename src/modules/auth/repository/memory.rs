use super::{Error, Otp, OtpStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use ulid::Ulid;

/// Code store kept in process memory. A single lock covers the
/// invalidate-and-insert pair, mirroring the transaction of the Postgres store.
#[derive(Default)]
pub struct MemoryOtpStore {
    otps: Mutex<Vec<Otp>>,
}

impl MemoryOtpStore {
    /// Every record ever issued for `phone`, oldest first.
    pub fn history(&self, phone: &str) -> Vec<Otp> {
        self.otps
            .lock()
            .unwrap()
            .iter()
            .filter(|otp| otp.phone == phone)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn issue_or_replace(
        &self,
        phone: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Otp, Error> {
        let now = Utc::now();
        let mut otps = self.otps.lock().unwrap();

        for otp in otps
            .iter_mut()
            .filter(|otp| otp.phone == phone && otp.consumed_at.is_none())
        {
            otp.consumed_at = Some(now);
        }

        let otp = Otp {
            id: Ulid::new().to_string(),
            phone: phone.to_string(),
            code: code.to_string(),
            expires_at,
            consumed_at: None,
            created_at: now,
        };
        otps.push(otp.clone());
        Ok(otp)
    }

    async fn get_active(&self, phone: &str) -> Result<Otp, Error> {
        let now = Utc::now();
        self.otps
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|otp| otp.phone == phone && otp.is_active(now))
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn mark_consumed(&self, id: &str) -> Result<(), Error> {
        if let Some(otp) = self
            .otps
            .lock()
            .unwrap()
            .iter_mut()
            .find(|otp| otp.id == id && otp.consumed_at.is_none())
        {
            otp.consumed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn claim(&self, id: &str) -> Result<(), Error> {
        let mut otps = self.otps.lock().unwrap();
        let otp = otps
            .iter_mut()
            .find(|otp| otp.id == id && otp.consumed_at.is_none())
            .ok_or(Error::NotFound)?;
        otp.consumed_at = Some(Utc::now());
        Ok(())
    }
}
