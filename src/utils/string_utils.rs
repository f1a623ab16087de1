//! # 문자열 유틸리티
//!
//! 요청 정리, 헤더 파싱, 로그 마스킹에 쓰는 공통 함수들입니다.

use serde::Deserialize;

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some 으로 반환합니다.
///
/// # 예제
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`와 함께 사용합니다.
///
/// // JSON: {"nickname": "  Alice  "} → Some("Alice")
/// // JSON: {"nickname": ""} → None
/// // JSON: {"nickname": null} → None
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 닉네임이 없을 때 이메일의 로컬 파트를 기본 닉네임으로 사용합니다.
pub fn default_nickname(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

/// `Authorization: Bearer <token>` 헤더 값에서 토큰 부분만 추출합니다.
///
/// 형식이 맞지 않거나 토큰이 비어 있으면 `None`.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// 로그에 남길 비밀값 앞부분 (최대 8자)
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(8).collect();
    format!("{}…", prefix)
}
