//! 사용자 계정 서비스
//!
//! 로그아웃과 계정 삭제처럼 세션 상태를 함께 정리해야 하는 작업을 담당합니다.

pub mod user_service;

pub use user_service::UserService;
