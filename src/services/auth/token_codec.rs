//! JWT 코덱
//!
//! HS256 단일 비밀키로 토큰을 서명하고 검증합니다. 모든 토큰은 같은 `iss`
//! 클레임을 가지며, 검증 시 발급자가 다르면 거부합니다.
//!
//! 만료와 위조를 구분하여 보고합니다. 서명 검증이 만료 검사보다 먼저
//! 수행되므로 [`TokenCodecError::Expired`]는 서명이 유효했다는 뜻입니다.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;
use crate::domain::models::token::Claims;

/// 코덱 검증/서명 실패
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenCodecError {
    /// 서명은 유효하지만 만료된 토큰
    #[error("Token expired")]
    Expired,

    /// 서명 위조, 형식 오류, 발급자 불일치 등
    #[error("Token invalid")]
    Invalid,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// HS256 JWT 코덱
#[derive(Clone)]
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtCodec {
    pub fn new(secret: &str, issuer: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
        }
    }

    /// 페이로드에 `iat`, `exp`, `iss`, `jti`를 붙여 서명합니다.
    ///
    /// # Arguments
    ///
    /// * `payload` - 토큰에 담을 페이로드
    /// * `expires_in` - 수명 (초). 음수면 이미 만료된 토큰이 만들어집니다.
    ///
    /// # Errors
    ///
    /// * `TokenCodecError::Signing` - 직렬화 또는 서명 실패
    pub fn sign<T: Serialize>(&self, payload: &T, expires_in: i64) -> Result<String, TokenCodecError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            payload,
            iat: now,
            exp: now + expires_in,
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenCodecError::Signing(e.to_string()))
    }

    /// 서명, 발급자, 만료를 모두 검증합니다.
    ///
    /// # Errors
    ///
    /// * `TokenCodecError::Expired` - 서명은 유효하나 `exp`가 지난 경우
    /// * `TokenCodecError::Invalid` - 그 외 모든 실패
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, TokenCodecError> {
        decode::<Claims<T>>(token, &self.decoding_key, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenCodecError::Expired,
                _ => TokenCodecError::Invalid,
            })
    }

    /// 서명과 만료를 확인하지 않고 클레임을 꺼냅니다.
    ///
    /// 만료된 토큰에서 신원을 복구할 때만 사용합니다. 발급자는 여전히 확인합니다.
    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Option<Claims<T>> {
        let mut validation = self.validation();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims<T>>(token, &self.decoding_key, &validation)
            .ok()
            .map(|data| data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}
