//! 일회용 인가 코드
//!
//! 로그인 이벤트와 토큰 발급을 잇는 짧은 수명의 코드입니다.
//! 세션 캐시에 `auth_code:<code> -> userId`로 저장되고, 교환 시 읽은 뒤 삭제됩니다.

use std::sync::Arc;
use log::{debug, warn};
use mongodb::bson::oid::ObjectId;
use crate::{
    caching::{auth_code_key, SessionCache},
    errors::AppError,
    utils::{random::generate_code, string_utils::mask_secret},
};

/// 초 단위 수명을 캐시 TTL로 변환합니다. 0 이하는 설정 오류입니다.
pub(crate) fn cache_ttl(seconds: i64) -> Result<u64, AppError> {
    u64::try_from(seconds)
        .ok()
        .filter(|ttl| *ttl > 0)
        .ok_or_else(|| AppError::InternalError("Invalid expiration setting".to_string()))
}

/// 인가 코드 발급/소비기
#[derive(Clone)]
pub struct AuthorizationCodes {
    cache: Arc<dyn SessionCache>,
}

impl AuthorizationCodes {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self { cache }
    }

    /// 사용자 ID를 가리키는 새 코드를 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::RedisError` - 캐시 쓰기 실패
    pub async fn issue(&self, user_id: &ObjectId, ttl_seconds: i64) -> Result<String, AppError> {
        let ttl = cache_ttl(ttl_seconds)?;
        let code = generate_code();

        self.cache
            .set(&auth_code_key(&code), &user_id.to_hex(), ttl)
            .await?;

        debug!("인가 코드 발급: {} (user {})", mask_secret(&code), user_id);
        Ok(code)
    }

    /// 코드를 읽고 즉시 삭제한 뒤 사용자 ID를 돌려줍니다.
    ///
    /// 동시에 같은 코드를 교환한 요청이 먼저 삭제했다면(`del`이 0 반환)
    /// 존재하지 않는 코드와 똑같이 취급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 코드가 없거나 이미 소비된 경우
    /// * `AppError::RedisError` - 조회 또는 삭제 실패. 삭제하지 못한 코드로는 토큰을 발급하지 않습니다.
    /// * `AppError::ValidationError` - 저장된 값이 사용자 ID 형식이 아닌 경우 (400)
    pub async fn consume(&self, code: &str) -> Result<ObjectId, AppError> {
        let key = auth_code_key(code);

        let stored = self
            .cache
            .get(&key)
            .await?
            .ok_or_else(|| AppError::NotFound("Code not found".to_string()))?;

        let removed = self.cache.del(&key).await?;
        if removed == 0 {
            warn!("인가 코드가 다른 요청에서 먼저 소비됨: {}", mask_secret(code));
            return Err(AppError::NotFound("Code not found".to_string()));
        }

        ObjectId::parse_str(&stored)
            .map_err(|_| AppError::ValidationError("Invalid code".to_string()))
    }
}
