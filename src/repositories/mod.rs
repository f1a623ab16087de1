//! 데이터 액세스 계층
//!
//! 서비스 계층은 trait 객체(`Arc<dyn UserDirectory>`, `Arc<dyn AutoLoginRepository>`)
//! 만 알고, 실제 백엔드는 바이너리 시작 시 [`crate::config::StorageConfig`]에 따라
//! MongoDB 또는 메모리 구현으로 결정됩니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crate::repositories::users::{MongoUserDirectory, UserDirectory};
//!
//! let directory: Arc<dyn UserDirectory> = Arc::new(MongoUserDirectory::new(database.clone()));
//! let user = directory.find_user_by_email("user@example.com").await?;
//! ```

pub mod users;
pub mod auto_login;

/// MongoDB 중복 키 에러 코드
pub(crate) const DUPLICATE_KEY_CODE: i32 = 11000;

/// 드라이버 에러가 유니크 인덱스 위반인지 확인합니다.
pub(crate) fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

pub(crate) fn database_error(error: mongodb::error::Error) -> crate::errors::AppError {
    crate::errors::AppError::DatabaseError(error.to_string())
}
