//! 자동 로그인 저장소
//!
//! SSID 레코드와 SSID에 묶인 자동 로그인 코드를 보관합니다.

pub mod auto_login_repo;
pub mod memory;

pub use auto_login_repo::{AutoLoginRepository, MongoAutoLoginRepository};
pub use memory::MemoryAutoLoginRepository;
