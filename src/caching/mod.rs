//! 세션 캐시 계층 모듈
//!
//! 사용자별 현재 리프레시 토큰과 일회용 코드를 TTL과 함께 보관하는
//! 키-값 저장소를 추상화합니다.
//!
//! # 구현체
//!
//! - [`redis::RedisClient`] - 운영 환경용 Redis 백엔드
//! - [`memory::MemoryCache`] - 개발/테스트용 프로세스 메모리 백엔드
//!
//! # 키 구성
//!
//! | 키 | 값 |
//! |----|----|
//! | `refresh_token:<uuidKey>` | 현재 유효한 리프레시 토큰 |
//! | `auth_code:<code>` | 인가 코드가 가리키는 사용자 ID |
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use crate::caching::{SessionCache, refresh_token_key};
//!
//! cache.set(&refresh_token_key(&uuid_key), &refresh_token, 259200).await?;
//! let stored = cache.get(&refresh_token_key(&uuid_key)).await?;
//! let removed = cache.del(&refresh_token_key(&uuid_key)).await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

use async_trait::async_trait;
use crate::errors::AppError;

pub mod redis;
pub mod memory;

/// 세션 캐시 추상화
///
/// 개별 연산(`get`, `set`, `del`)은 각각 원자적이지만, 두 번의 호출에 걸친
/// 논리 연산(읽은 뒤 삭제 등)은 원자적이지 않습니다. 호출자는 `del`의
/// 반환값으로 동시 요청에 의한 선점 여부를 판단해야 합니다.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// 키에 저장된 문자열을 조회합니다. 없거나 만료된 경우 `None`.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// 값을 TTL(초)과 함께 저장합니다. 기존 값은 덮어씁니다.
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), AppError>;

    /// 키를 삭제하고 실제로 삭제된 키의 개수를 반환합니다.
    async fn del(&self, key: &str) -> Result<u64, AppError>;
}

/// 사용자별 리프레시 토큰 슬롯 키
pub fn refresh_token_key(uuid_key: &str) -> String {
    format!("refresh_token:{}", uuid_key)
}

/// 인가 코드 키
pub fn auth_code_key(code: &str) -> String {
    format!("auth_code:{}", code)
}
