//! 에러 타입 모듈
//!
//! [`errors::AppError`]를 중심으로 서비스 전역에서 사용하는 에러를 제공합니다.

pub mod errors;

pub use errors::*;
