//! 프로세스 메모리 자동 로그인 저장소

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::{
    domain::entities::auto_login::{AutoLoginCode, SsidRecord},
    errors::{AppError, AutoLoginError},
    repositories::auto_login::AutoLoginRepository,
};

#[derive(Default)]
struct AutoLoginState {
    ssids: HashMap<String, SsidRecord>,
    codes: HashMap<String, AutoLoginCode>,
}

/// 메모리 기반 자동 로그인 저장소
#[derive(Default)]
pub struct MemoryAutoLoginRepository {
    state: Mutex<AutoLoginState>,
}

impl MemoryAutoLoginRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, AutoLoginState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::DatabaseError("Auto-login store lock poisoned".to_string()))
    }

    /// SSID에 묶인 코드 수
    #[cfg(test)]
    pub fn codes_for_ssid(&self, ssid: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.codes.values().filter(|code| code.ssid == ssid).count()
    }
}

#[async_trait]
impl AutoLoginRepository for MemoryAutoLoginRepository {
    async fn create_ssid(&self, record: SsidRecord) -> Result<(), AppError> {
        let mut state = self.lock()?;
        if state.ssids.contains_key(&record.ssid) {
            return Err(AppError::DatabaseError("Duplicate SSID".to_string()));
        }
        state.ssids.insert(record.ssid.clone(), record);
        Ok(())
    }

    async fn find_ssid(&self, ssid: &str) -> Result<Option<SsidRecord>, AppError> {
        Ok(self.lock()?.ssids.get(ssid).cloned())
    }

    async fn find_code(&self, code: &str) -> Result<Option<AutoLoginCode>, AppError> {
        Ok(self.lock()?.codes.get(code).cloned())
    }

    async fn replace_code(&self, record: AutoLoginCode, previous: Option<&str>) -> Result<(), AppError> {
        let mut state = self.lock()?;
        if let Some(previous) = previous {
            let live = state
                .codes
                .get(previous)
                .is_some_and(|existing| existing.ssid == record.ssid);
            if !live {
                return Err(AutoLoginError::InvalidCode.into());
            }
        }
        state.codes.retain(|_, existing| existing.ssid != record.ssid);
        state.codes.insert(record.code.clone(), record);
        Ok(())
    }

    async fn delete_codes_for_user(&self, user_id: &ObjectId) -> Result<u64, AppError> {
        let mut state = self.lock()?;
        let before = state.codes.len();
        state.codes.retain(|_, code| code.user_id != *user_id);
        Ok((before - state.codes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(code: &str, ssid: &str, user_id: ObjectId) -> AutoLoginCode {
        AutoLoginCode {
            code: code.to_string(),
            user_id,
            ssid: ssid.to_string(),
            created_at: 0,
            expire_at: i64::MAX,
        }
    }

    #[actix_web::test]
    async fn test_replace_keeps_one_code_per_ssid() {
        let repo = MemoryAutoLoginRepository::new();
        let user_id = ObjectId::new();

        repo.replace_code(code("first", "ssid-1", user_id), None).await.unwrap();
        repo.replace_code(code("second", "ssid-1", user_id), None).await.unwrap();
        repo.replace_code(code("other", "ssid-2", user_id), None).await.unwrap();

        assert!(repo.find_code("first").await.unwrap().is_none());
        assert!(repo.find_code("second").await.unwrap().is_some());
        assert_eq!(repo.codes_for_ssid("ssid-1"), 1);
        assert_eq!(repo.codes_for_ssid("ssid-2"), 1);
    }

    #[actix_web::test]
    async fn test_replace_requires_live_previous_code() {
        let repo = MemoryAutoLoginRepository::new();
        let user_id = ObjectId::new();

        repo.replace_code(code("first", "ssid-1", user_id), None).await.unwrap();
        repo.replace_code(code("second", "ssid-1", user_id), Some("first")).await.unwrap();

        let stale = repo.replace_code(code("third", "ssid-1", user_id), Some("first")).await;
        assert!(matches!(stale, Err(AppError::AutoLogin(AutoLoginError::InvalidCode))));
        assert!(repo.find_code("third").await.unwrap().is_none());
        assert!(repo.find_code("second").await.unwrap().is_some());

        repo.replace_code(code("other", "ssid-2", user_id), None).await.unwrap();
        let wrong_ssid = repo.replace_code(code("fourth", "ssid-1", user_id), Some("other")).await;
        assert!(wrong_ssid.is_err());
        assert_eq!(repo.codes_for_ssid("ssid-1"), 1);
        assert_eq!(repo.codes_for_ssid("ssid-2"), 1);
    }

    #[actix_web::test]
    async fn test_delete_codes_for_user() {
        let repo = MemoryAutoLoginRepository::new();
        let user_id = ObjectId::new();
        let other_user = ObjectId::new();

        repo.replace_code(code("a", "ssid-1", user_id), None).await.unwrap();
        repo.replace_code(code("b", "ssid-2", user_id), None).await.unwrap();
        repo.replace_code(code("c", "ssid-3", other_user), None).await.unwrap();

        assert_eq!(repo.delete_codes_for_user(&user_id).await.unwrap(), 2);
        assert!(repo.find_code("c").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_ssid_lookup() {
        let repo = MemoryAutoLoginRepository::new();
        let record = SsidRecord {
            ssid: "ssid-1".to_string(),
            user_id: ObjectId::new(),
            created_at: 0,
        };

        repo.create_ssid(record.clone()).await.unwrap();

        assert_eq!(repo.find_ssid("ssid-1").await.unwrap().unwrap().user_id, record.user_id);
        assert!(repo.create_ssid(record).await.is_err());
        assert!(repo.find_ssid("missing").await.unwrap().is_none());
    }
}
