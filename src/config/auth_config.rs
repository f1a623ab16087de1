//! # Authentication Configuration Module
//!
//! 토큰 서명, 토큰/코드 수명, 쿠키 서명 등 인증 관련 설정을 관리하는 모듈입니다.
//!
//! 모든 수명 값은 **초 단위**입니다.
//!
//! | 환경 변수 | 기본값 | 의미 |
//! |-----------|--------|------|
//! | `TOKEN_SECRET` | 개발용 기본값 | 토큰 서명 비밀키 |
//! | `TOKEN_ISSUER` | `ifelfi.com` | `iss` 클레임 |
//! | `ACCESS_TOKEN_EXPIRATION` | 300 (5분) | 액세스 토큰 수명 |
//! | `REFRESH_TOKEN_EXPIRATION` | 259200 (3일) | 리프레시 토큰 수명 |
//! | `AUTH_CODE_EXPIRATION` | 180 (3분) | 인가 코드 수명 |
//! | `AUTO_LOGIN_CODE_EXPIRATION` | 604800 (7일) | 자동 로그인 코드 수명 |
//! | `COOKIE_SECRET` | 개발용 기본값 | 쿠키 서명 비밀키 |

use std::env;
use std::fmt;
use std::str::FromStr;

/// 정수형 환경 변수를 읽고, 없거나 파싱에 실패하면 기본값을 사용합니다.
fn env_seconds(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<i64>() {
            Ok(value) if value > 0 => value,
            _ => {
                log::warn!("{} 값이 올바르지 않습니다 ({}). 기본값 {} 사용", name, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// 토큰 서명 설정
pub struct JwtConfig;

impl JwtConfig {
    /// 토큰 서명용 비밀키
    ///
    /// 설정되지 않은 경우 개발용 기본값을 사용하며 경고 로그를 남깁니다.
    pub fn secret() -> String {
        env::var("TOKEN_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("TOKEN_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    /// 모든 토큰에 기록되고 검증 시 요구되는 발급자
    pub fn issuer() -> String {
        env::var("TOKEN_ISSUER").unwrap_or_else(|_| "ifelfi.com".to_string())
    }

    pub fn access_token_expiration() -> i64 {
        env_seconds("ACCESS_TOKEN_EXPIRATION", 60 * 5)
    }

    pub fn refresh_token_expiration() -> i64 {
        env_seconds("REFRESH_TOKEN_EXPIRATION", 60 * 60 * 24 * 3)
    }

    pub fn auth_code_expiration() -> i64 {
        env_seconds("AUTH_CODE_EXPIRATION", 60 * 3)
    }
}

/// 자동 로그인 설정
pub struct AutoLoginConfig;

impl AutoLoginConfig {
    pub fn code_expiration() -> i64 {
        env_seconds("AUTO_LOGIN_CODE_EXPIRATION", 60 * 60 * 24 * 7)
    }
}

/// 서명 쿠키 설정
pub struct CookieConfig;

impl CookieConfig {
    pub fn secret() -> String {
        env::var("COOKIE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("COOKIE_SECRET not set, using default (not secure for production!)");
                "cookie-secret".to_string()
            })
    }
}

/// 토큰 서비스가 사용하는 설정 묶음
///
/// 서비스는 환경 변수를 직접 읽지 않고 이 구조체를 주입받습니다.
/// 테스트에서는 필드를 직접 채워서 생성합니다.
#[derive(Debug, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub issuer: String,
    /// 액세스 토큰 수명 (초)
    pub access_token_ttl: i64,
    /// 리프레시 토큰 수명 (초)
    pub refresh_token_ttl: i64,
    /// 인가 코드 수명 (초)
    pub auth_code_ttl: i64,
}

impl TokenSettings {
    pub fn from_env() -> Self {
        Self {
            secret: JwtConfig::secret(),
            issuer: JwtConfig::issuer(),
            access_token_ttl: JwtConfig::access_token_expiration(),
            refresh_token_ttl: JwtConfig::refresh_token_expiration(),
            auth_code_ttl: JwtConfig::auth_code_expiration(),
        }
    }
}

/// 자동 로그인 서비스가 사용하는 설정 묶음
#[derive(Debug, Clone)]
pub struct AutoLoginSettings {
    /// 자동 로그인 코드 수명 (초)
    pub code_ttl: i64,
    /// 자동 로그인 흐름에서 발급하는 인가 코드 수명 (초)
    pub auth_code_ttl: i64,
}

impl AutoLoginSettings {
    pub fn from_env() -> Self {
        Self {
            code_ttl: AutoLoginConfig::code_expiration(),
            auth_code_ttl: JwtConfig::auth_code_expiration(),
        }
    }
}

/// 계정이 등록된 인증 프로바이더
///
/// 로컬 로그인은 `Local` 프로바이더로 등록된 계정에만 허용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// 이메일/비밀번호 로그인
    Local,
    Google,
    Github,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "local",
            AuthProvider::Google => "google",
            AuthProvider::Github => "github",
        }
    }
}

impl FromStr for AuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AuthProvider::Local),
            "google" => Ok(AuthProvider::Google),
            "github" => Ok(AuthProvider::Github),
            _ => Err(format!("Unsupported auth provider: {}", s)),
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_provider_parsing() {
        assert_eq!("local".parse::<AuthProvider>().unwrap(), AuthProvider::Local);
        assert_eq!("GOOGLE".parse::<AuthProvider>().unwrap(), AuthProvider::Google);
        assert!("twitter".parse::<AuthProvider>().is_err());
    }

    #[test]
    fn test_auth_provider_serializes_lowercase() {
        let json = serde_json::to_string(&AuthProvider::Local).unwrap();
        assert_eq!(json, "\"local\"");
        assert_eq!(AuthProvider::Github.to_string(), "github");
    }

    #[test]
    fn test_expiration_defaults() {
        if env::var("ACCESS_TOKEN_EXPIRATION").is_err() {
            assert_eq!(JwtConfig::access_token_expiration(), 300);
        }
        if env::var("AUTH_CODE_EXPIRATION").is_err() {
            assert_eq!(JwtConfig::auth_code_expiration(), 180);
        }
        if env::var("AUTO_LOGIN_CODE_EXPIRATION").is_err() {
            assert_eq!(AutoLoginConfig::code_expiration(), 604800);
        }
    }

    #[test]
    fn test_issuer_default() {
        if env::var("TOKEN_ISSUER").is_err() {
            assert_eq!(JwtConfig::issuer(), "ifelfi.com");
        }
    }
}
