//! 토큰 페이로드, 클레임, 토큰 쌍
//!
//! 액세스 토큰은 사용자 식별 정보를 담고, 리프레시 토큰은 식별 정보 없이
//! 세션 캐시의 슬롯과 대조해서만 의미를 가집니다.
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use crate::errors::AppError;

/// 액세스 토큰에 담기는 사용자 식별 정보
///
/// 디코딩할 때마다 구조 검증([`AccessTokenPayload::ensure_valid`])을 거칩니다.
/// 서명이 유효하더라도 구조가 맞지 않으면 무효로 취급합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    pub uuid_key: Uuid,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 64))]
    pub nickname: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl AccessTokenPayload {
    /// 신뢰 경계마다 호출하는 구조 검증
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidPayload` - 필드 형식이 맞지 않는 경우
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        self.validate()
            .map_err(|e| AppError::InvalidPayload(e.to_string()))
    }

    /// 리프레시 토큰 슬롯을 찾기 위한 캐시 식별자
    pub fn uuid_key_string(&self) -> String {
        self.uuid_key.to_string()
    }
}

/// 리프레시 토큰 페이로드
///
/// 표준 클레임 외에 아무 정보도 담지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenPayload {}

/// 코덱이 페이로드에 덧붙이는 표준 클레임
///
/// `jti`는 같은 초에 발급된 두 토큰도 서로 다르게 만듭니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub payload: T,
    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// 발급자
    pub iss: String,
    /// 토큰 고유 ID
    pub jti: String,
}

/// 항상 함께 발급되는 액세스/리프레시 토큰 쌍
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Authorization 헤더로 전달되는 단기 토큰
    pub access_token: String,
    /// 쿠키로 전달되는 장기 토큰
    pub refresh_token: String,
}

/// 액세스 토큰 검증 결과
#[derive(Debug, Clone, PartialEq)]
pub enum AccessTokenState {
    /// 서명, 발급자, 만료, 구조 모두 유효
    Valid(AccessTokenPayload),
    /// 만료되었지만 서명과 구조는 유효 (회전 후보)
    Expired(AccessTokenPayload),
    /// 서명 위조, 형식 오류, 구조 불일치 등
    Invalid,
}

impl AccessTokenState {
    pub fn is_valid(&self) -> bool {
        matches!(self, AccessTokenState::Valid(_))
    }

    pub fn payload(&self) -> Option<&AccessTokenPayload> {
        match self {
            AccessTokenState::Valid(payload) | AccessTokenState::Expired(payload) => Some(payload),
            AccessTokenState::Invalid => None,
        }
    }
}
