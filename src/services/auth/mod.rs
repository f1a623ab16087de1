//! 인증 서비스
//!
//! - [`token_codec`] - HS256 JWT 서명/검증
//! - [`auth_code`] - 일회용 인가 코드
//! - [`token_service`] - 토큰 발급, 검증, 회전
//! - [`auto_login_service`] - SSID 기반 자동 로그인
//! - [`credential`] - bcrypt 비밀번호 저장소
//! - [`local_auth_service`] - 이메일/비밀번호 가입과 로그인
//!
//! # Examples
//!
//! ```rust,ignore
//! let code = token_service.issue_authorization_code(&user_id).await?;
//! let pair = token_service.issue_token_pair_by_auth_code(&code).await?;
//! let rotated = token_service.validate_or_refresh(&pair).await?;
//! ```

pub mod token_codec;
pub mod auth_code;
pub mod token_service;
pub mod auto_login_service;
pub mod credential;
pub mod local_auth_service;

pub use token_codec::{JwtCodec, TokenCodecError};
pub use auth_code::AuthorizationCodes;
pub use token_service::TokenService;
pub use auto_login_service::{AutoLoginService, AutoLoginVerification};
pub use credential::{BcryptCredentialStore, CredentialStore};
pub use local_auth_service::LocalAuthService;
