//! 세션 인증 백엔드
//!
//! 인가 코드 교환, 액세스/리프레시 토큰 발급과 회전, SSID에 묶인
//! 자동 로그인 코드를 제공하는 토큰/세션 엔진입니다.
//!
//! # Features
//!
//! - **인가 코드**: 로그인 이벤트와 토큰 발급을 잇는 일회용 코드
//! - **토큰 쌍**: 단기 액세스 토큰 + 사용자당 슬롯 하나에만 저장되는 리프레시 토큰
//! - **회전**: 검증에 성공할 때마다 새 쌍을 발급하고 이전 리프레시 토큰을 무효화
//! - **자동 로그인**: SSID 쿠키에 묶인 장기 코드, 사용할 때마다 회전
//! - **저장소**: Redis(세션 캐시) + MongoDB(디렉터리), 또는 프로세스 메모리
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /auth/local, /token, /user, /auto
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 헤더/쿠키 전송, 요청 검증
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← TokenService, AutoLoginService, LocalAuthService, UserService
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserDirectory, AutoLoginRepository, SessionCache
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 또는 메모리 구현
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use session_auth_backend::routes::AppState;
//!
//! let code = state.token_service.issue_authorization_code(&user_id).await?;
//! let pair = state.token_service.issue_token_pair_by_auth_code(&code).await?;
//! let rotated = state.token_service.validate_or_refresh(&pair).await?;
//! ```

pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
