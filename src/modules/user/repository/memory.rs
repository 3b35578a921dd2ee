use super::{AccountType, Error, UpdateProfilePayload, User, UserDirectory};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use ulid::Ulid;

type Result<T> = std::result::Result<T, Error>;

/// Directory kept in process memory, enforcing the same unique constraints as
/// the `users` table.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<Vec<User>>,
}

impl MemoryUserDirectory {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn with_user<T>(&self, id: &str, f: impl FnOnce(&mut Vec<User>, usize) -> Result<T>) -> Result<T> {
        let mut users = self.users.lock().unwrap();
        let index = users
            .iter()
            .position(|user| user.id == id)
            .ok_or(Error::NotFound)?;
        f(&mut users, index)
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn create(&self, phone: &str, account_type: AccountType) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.phone == phone) {
            return Err(Error::AlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Ulid::new().to_string(),
            phone: phone.to_string(),
            account_type,
            username: None,
            full_name: None,
            bio: None,
            business_phone: None,
            address: None,
            avatar_key: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        self.with_user(id, |users, index| Ok(users[index].clone()))
    }

    async fn get_by_phone(&self, phone: &str) -> Result<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.phone == phone)
            .cloned()
            .ok_or(Error::NotFound)
    }

    async fn update_profile(&self, id: &str, payload: UpdateProfilePayload) -> Result<User> {
        self.with_user(id, |users, index| {
            if let Some(username) = &payload.username {
                let taken = users.iter().enumerate().any(|(other, user)| {
                    other != index && user.username.as_deref() == Some(username.as_str())
                });
                if taken {
                    return Err(Error::UsernameConflict);
                }
            }

            let user = &mut users[index];
            if payload.username.is_some() {
                user.username = payload.username;
            }
            if payload.full_name.is_some() {
                user.full_name = payload.full_name;
            }
            if payload.bio.is_some() {
                user.bio = payload.bio;
            }
            if payload.business_phone.is_some() {
                user.business_phone = payload.business_phone;
            }
            if payload.address.is_some() {
                user.address = payload.address;
            }
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }

    async fn username_exists(&self, username: &str) -> Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .any(|user| user.username.as_deref() == Some(username)))
    }

    async fn update_avatar_reference(&self, id: &str, key: &str) -> Result<User> {
        self.with_user(id, |users, index| {
            let user = &mut users[index];
            user.avatar_key = Some(key.to_string());
            user.updated_at = Utc::now();
            Ok(user.clone())
        })
    }
}
