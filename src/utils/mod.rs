//! 공통 유틸리티
//!
//! - [`string_utils`] - 문자열 정리, Bearer 헤더 파싱, 로그 마스킹
//! - [`random`] - 불투명 코드 생성
//! - [`cookies`] - 서명 쿠키

pub mod string_utils;
pub mod random;
pub mod cookies;
