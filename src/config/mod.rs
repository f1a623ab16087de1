//! # Configuration Module
//!
//! 세션 인증 백엔드의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 저장소, 서버, 환경, 비밀번호 해싱 관련 설정
//! - [`auth_config`] - 토큰, 인가 코드, 자동 로그인, 쿠키 관련 설정
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::config::{JwtConfig, ServerConfig, TokenSettings};
//!
//! let port = ServerConfig::port();
//! let issuer = JwtConfig::issuer();
//!
//! // 서비스에는 환경 변수 대신 설정 구조체를 넘깁니다
//! let settings = TokenSettings::from_env();
//! ```
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//!
//! # 토큰 (초 단위)
//! export TOKEN_SECRET="your-super-secret-key"
//! export TOKEN_ISSUER="ifelfi.com"
//! export ACCESS_TOKEN_EXPIRATION="300"
//! export REFRESH_TOKEN_EXPIRATION="259200"
//! export AUTH_CODE_EXPIRATION="180"
//! export AUTO_LOGIN_CODE_EXPIRATION="604800"
//!
//! # 쿠키 서명
//! export COOKIE_SECRET="cookie-secret"
//!
//! # 저장소
//! export STORAGE_BACKEND="external"   # external | memory
//! export REDIS_URL="redis://localhost:6379"
//! export MONGODB_URI="mongodb://localhost:27017"
//! ```

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
