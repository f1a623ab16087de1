//! 사용자 디렉터리
//!
//! [`UserDirectory`](user_repo::UserDirectory) trait과 MongoDB/메모리 구현을 제공합니다.

pub mod user_repo;
pub mod memory;

pub use user_repo::{UserDirectory, MongoUserDirectory};
pub use memory::MemoryUserDirectory;
