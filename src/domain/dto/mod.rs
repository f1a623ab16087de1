//! 요청/응답 DTO
//!
//! HTTP 계층과 서비스 계층 사이에서 오가는 데이터입니다.

pub mod auth;

pub use auth::*;
