//! 서명 쿠키
//!
//! 리프레시 토큰, 자동 로그인 코드, SSID는 모두 서명된 HttpOnly 쿠키로 오갑니다.
//! 서명 키는 `COOKIE_SECRET`에서 SHA-512로 유도합니다.

use actix_web::HttpRequest;
use actix_web::cookie::{time, Cookie, CookieJar, Key, SameSite};
use sha2::{Digest, Sha512};
use crate::errors::AppError;

pub const REFRESH_COOKIE: &str = "refresh";
pub const AUTO_LOGIN_COOKIE: &str = "AUTO";
pub const SSID_COOKIE: &str = "SSID";

/// 쿠키 서명/검증기
#[derive(Clone)]
pub struct CookieSigner {
    key: Key,
}

impl CookieSigner {
    /// 임의 길이의 비밀값으로부터 64바이트 서명 키를 만듭니다.
    pub fn new(secret: &str) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            key: Key::from(digest.as_slice()),
        }
    }

    /// 서명된 쿠키를 만듭니다.
    ///
    /// # Arguments
    ///
    /// * `name` - 쿠키 이름
    /// * `value` - 서명할 원문 값
    /// * `max_age_secs` - 쿠키 수명 (초)
    pub fn signed_cookie(&self, name: &str, value: &str, max_age_secs: i64) -> Result<Cookie<'static>, AppError> {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(Cookie::new(name.to_string(), value.to_string()));

        let signed_value = jar
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(|| AppError::InternalError("Cookie signing failed".to_string()))?;

        Ok(Cookie::build(name.to_string(), signed_value)
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .max_age(time::Duration::seconds(max_age_secs))
            .finish())
    }

    /// 쿠키 값을 검증하고 원문을 돌려줍니다. 서명이 맞지 않으면 `None`.
    pub fn verify(&self, cookie: Cookie<'static>) -> Option<String> {
        let name = cookie.name().to_string();
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        jar.signed(&self.key)
            .get(&name)
            .map(|verified| verified.value().to_string())
    }

    /// 요청에서 서명 쿠키를 꺼내 검증합니다.
    pub fn read(&self, req: &HttpRequest, name: &str) -> Option<String> {
        req.cookie(name).and_then(|cookie| self.verify(cookie))
    }

    /// 클라이언트 쿠키를 지우기 위한 만료 쿠키
    pub fn removal_cookie(name: &str) -> Cookie<'static> {
        let mut cookie = Cookie::build(name.to_string(), "")
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::None)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_cookie_verifies() {
        let signer = CookieSigner::new("cookie-secret");
        let cookie = signer.signed_cookie(AUTO_LOGIN_COOKIE, "code-123", 60).unwrap();

        assert_ne!(cookie.value(), "code-123");
        assert!(cookie.http_only().unwrap_or(false));
        assert_eq!(signer.verify(cookie).as_deref(), Some("code-123"));
    }

    #[test]
    fn test_tampered_or_foreign_cookie_is_rejected() {
        let signer = CookieSigner::new("cookie-secret");
        let other = CookieSigner::new("another-secret");

        let foreign = other.signed_cookie(SSID_COOKIE, "ssid-1", 60).unwrap();
        assert_eq!(signer.verify(foreign), None);

        let unsigned = Cookie::new(SSID_COOKIE, "ssid-1");
        assert_eq!(signer.verify(unsigned), None);
    }
}
