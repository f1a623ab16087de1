//! 인증 요청 DTO
//!
//! 핸들러에서 `validator`로 검증한 뒤 서비스로 넘깁니다.

use serde::Deserialize;
use validator::Validate;
use crate::utils::string_utils::deserialize_optional_string;

/// 로컬 가입 요청
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocalSignupRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    /// 생략하면 이메일의 로컬 파트를 사용
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 3, max = 20, message = "닉네임은 3-20자 사이여야 합니다"))]
    pub nickname: Option<String>,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url(message = "유효한 이미지 URL을 입력해주세요"))]
    pub image_url: Option<String>,
}

/// 로컬 로그인 요청
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LocalLoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 인가 코드 교환 요청 (본문 또는 쿼리)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CodeRequest {
    #[validate(length(min = 1, max = 128, message = "코드가 필요합니다"))]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let request: LocalSignupRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "password": "longenough"
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.nickname, None);

        let short_password: LocalSignupRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "password": "short"
        }))
        .unwrap();
        assert!(short_password.validate().is_err());

        let bad_email: LocalSignupRequest = serde_json::from_value(serde_json::json!({
            "email": "not-email",
            "password": "longenough"
        }))
        .unwrap();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let request: LocalSignupRequest = serde_json::from_value(serde_json::json!({
            "email": "a@b.com",
            "password": "longenough",
            "nickname": "   ",
            "imageUrl": ""
        }))
        .unwrap();

        assert_eq!(request.nickname, None);
        assert_eq!(request.image_url, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_code_request_requires_code() {
        let request = CodeRequest { code: String::new() };
        assert!(request.validate().is_err());
    }
}
