//! 도메인 모델
//!
//! 저장소에 영속되지 않고 토큰 안에서만 오가는 값들입니다.

pub mod token;

pub use token::*;
