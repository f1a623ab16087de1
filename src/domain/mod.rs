//! 도메인 계층
//!
//! - [`entities`] - 디렉터리/자동 로그인 저장소에 영속되는 레코드
//! - [`models`] - 토큰 페이로드와 토큰 쌍
//! - [`dto`] - HTTP 요청/응답 본문

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use dto::*;
pub use models::*;
