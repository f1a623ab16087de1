//! 저장소에 영속되는 엔티티
//!
//! - [`users`] - 사용자, 프로필, 비밀번호, 프로바이더 레코드
//! - [`auto_login`] - SSID와 자동 로그인 코드 레코드

pub mod users;
pub mod auto_login;

pub use users::*;
pub use auto_login::*;
