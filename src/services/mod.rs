//! 비즈니스 로직 계층
//!
//! 서비스는 생성자로 협력 객체(`Arc<dyn SessionCache>`, `Arc<dyn UserDirectory>` 등)를
//! 주입받으며, 바이너리는 이들을 [`crate::routes::AppState`]로 묶어 핸들러에 전달합니다.
//!
//! - [`auth`] - 토큰 엔진, 자동 로그인, 로컬 인증
//! - [`users`] - 로그아웃과 계정 삭제

pub mod users;
pub mod auth;
