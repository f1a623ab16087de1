//! 프로세스 메모리 사용자 디렉터리
//!
//! 모든 쓰기를 하나의 락 아래에서 수행하므로 MongoDB 트랜잭션과 같은
//! 전부-아니면-전무 동작을 보장합니다.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::{
    domain::entities::users::{NewLocalUser, PasswordRecord, Profile, ProviderRecord, User},
    errors::AppError,
    repositories::users::UserDirectory,
};

#[derive(Default)]
struct DirectoryState {
    users: HashMap<ObjectId, User>,
    profiles: HashMap<ObjectId, Profile>,
    passwords: HashMap<ObjectId, PasswordRecord>,
    providers: HashMap<ObjectId, ProviderRecord>,
}

/// 메모리 기반 사용자 디렉터리
#[derive(Default)]
pub struct MemoryUserDirectory {
    state: Mutex<DirectoryState>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, DirectoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::DatabaseError("User directory lock poisoned".to_string()))
    }

    /// (users, profiles, passwords, providers) 레코드 수
    #[cfg(test)]
    pub fn row_counts(&self) -> (usize, usize, usize, usize) {
        let state = self.state.lock().unwrap();
        (state.users.len(), state.profiles.len(), state.passwords.len(), state.providers.len())
    }

    #[cfg(test)]
    pub fn set_provider(&self, user_id: ObjectId, provider: crate::config::AuthProvider) {
        let mut state = self.state.lock().unwrap();
        state.providers.insert(user_id, ProviderRecord { user_id, provider });
    }

    #[cfg(test)]
    pub fn remove_profile(&self, user_id: &ObjectId) {
        self.state.lock().unwrap().profiles.remove(user_id);
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn find_user_by_uuid(&self, uuid_key: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state.users.values().find(|user| user.uuid_key == uuid_key).cloned())
    }

    async fn create_user_tx(&self, input: NewLocalUser) -> Result<User, AppError> {
        let mut state = self.lock()?;

        if state.users.values().any(|user| user.email == input.email) {
            return Err(AppError::ConflictError("Email already exists".to_string()));
        }

        let (user, profile, password, provider) = input.into_records();
        state.profiles.insert(user.id, profile);
        state.passwords.insert(user.id, password);
        state.providers.insert(user.id, provider);
        state.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn delete_user(&self, uuid_key: &str) -> Result<bool, AppError> {
        let mut state = self.lock()?;

        let Some(id) = state
            .users
            .values()
            .find(|user| user.uuid_key == uuid_key)
            .map(|user| user.id)
        else {
            return Ok(false);
        };

        state.users.remove(&id);
        state.profiles.remove(&id);
        state.passwords.remove(&id);
        state.providers.remove(&id);
        Ok(true)
    }

    async fn find_profile(&self, user_id: &ObjectId) -> Result<Option<Profile>, AppError> {
        Ok(self.lock()?.profiles.get(user_id).cloned())
    }

    async fn find_password(&self, user_id: &ObjectId) -> Result<Option<PasswordRecord>, AppError> {
        Ok(self.lock()?.passwords.get(user_id).cloned())
    }

    async fn find_provider(&self, user_id: &ObjectId) -> Result<Option<ProviderRecord>, AppError> {
        Ok(self.lock()?.providers.get(user_id).cloned())
    }
}
