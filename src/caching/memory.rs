//! 프로세스 메모리 세션 캐시
//!
//! Redis 없이 서버를 띄우거나 테스트할 때 사용하는 [`SessionCache`] 구현입니다.
//! 만료는 조회 시점에 지연 평가됩니다.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use async_trait::async_trait;
use crate::caching::SessionCache;
use crate::errors::AppError;

struct Entry {
    value: String,
    expires_at: Instant,
}

/// 메모리 기반 세션 캐시
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, AppError> {
        self.entries
            .lock()
            .map_err(|_| AppError::InternalError("Session cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl SessionCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), AppError> {
        if ttl_seconds == 0 {
            return Err(AppError::RedisError("TTL cannot be zero".to_string()));
        }

        let mut entries = self.lock()?;
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64, AppError> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        match entries.remove(key) {
            Some(entry) if entry.expires_at > now => Ok(1),
            _ => Ok(0),
        }
    }
}
