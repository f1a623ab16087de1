//! # 사용자 계정 서비스 구현
//!
//! 두 작업 모두 호출 전에 [`crate::services::auth::TokenService::verify`]로
//! 토큰 쌍의 신원이 확인되었다고 가정합니다.
//!
//! | 작업 | 디렉터리 | 세션 캐시 | 자동 로그인 |
//! |------|----------|-----------|-------------|
//! | `logout` | 조회 | 리프레시 슬롯 삭제 | - |
//! | `delete_account` | 트랜잭션 삭제 | 리프레시 슬롯 삭제 | 코드 전부 삭제 |

use std::sync::Arc;
use log::info;
use crate::{
    caching::{refresh_token_key, SessionCache},
    errors::AppError,
    repositories::{auto_login::AutoLoginRepository, users::UserDirectory},
};

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

pub struct UserService {
    directory: Arc<dyn UserDirectory>,
    cache: Arc<dyn SessionCache>,
    auto_login: Arc<dyn AutoLoginRepository>,
}

impl UserService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        cache: Arc<dyn SessionCache>,
        auto_login: Arc<dyn AutoLoginRepository>,
    ) -> Self {
        Self {
            directory,
            cache,
            auto_login,
        }
    }

    /// 리프레시 토큰 슬롯을 비워 현재 세션을 끝냅니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 사용자가 없는 경우
    /// * `AppError::RedisError` - 캐시 삭제 실패
    pub async fn logout(&self, uuid_key: &str) -> Result<(), AppError> {
        self.directory
            .find_user_by_uuid(uuid_key)
            .await?
            .ok_or_else(user_not_found)?;

        self.cache.del(&refresh_token_key(uuid_key)).await?;
        info!("로그아웃: {}", uuid_key);
        Ok(())
    }

    /// 계정과 연관 레코드, 세션 상태를 모두 삭제합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 사용자가 없는 경우
    /// * `AppError::DatabaseError` - 디렉터리 트랜잭션 실패 (아무것도 삭제되지 않음)
    pub async fn delete_account(&self, uuid_key: &str) -> Result<(), AppError> {
        let user = self
            .directory
            .find_user_by_uuid(uuid_key)
            .await?
            .ok_or_else(user_not_found)?;

        if !self.directory.delete_user(uuid_key).await? {
            return Err(user_not_found());
        }

        self.cache.del(&refresh_token_key(uuid_key)).await?;
        let revoked = self.auto_login.delete_codes_for_user(&user.id).await?;

        info!("계정 삭제: {} (자동 로그인 코드 {}개 폐기)", uuid_key, revoked);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::{
        caching::memory::MemoryCache,
        domain::entities::{auto_login::AutoLoginCode, users::{NewLocalUser, User}},
        repositories::{auto_login::MemoryAutoLoginRepository, users::MemoryUserDirectory},
    };

    struct Fixture {
        service: UserService,
        directory: Arc<MemoryUserDirectory>,
        cache: Arc<MemoryCache>,
        auto_login: Arc<MemoryAutoLoginRepository>,
        user: User,
    }

    async fn fixture() -> Fixture {
        let directory = Arc::new(MemoryUserDirectory::new());
        let cache = Arc::new(MemoryCache::new());
        let auto_login = Arc::new(MemoryAutoLoginRepository::new());
        let user = directory
            .create_user_tx(NewLocalUser {
                email: "a@b.com".to_string(),
                nickname: "a".to_string(),
                image_url: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        cache.set(&refresh_token_key(&user.uuid_key), "refresh", 60).await.unwrap();
        auto_login
            .replace_code(AutoLoginCode {
                code: "auto".to_string(),
                user_id: user.id,
                ssid: "ssid".to_string(),
                created_at: Utc::now().timestamp(),
                expire_at: Utc::now().timestamp() + 60,
            }, None)
            .await
            .unwrap();

        Fixture {
            service: UserService::new(directory.clone(), cache.clone(), auto_login.clone()),
            directory,
            cache,
            auto_login,
            user,
        }
    }

    #[actix_web::test]
    async fn test_logout_clears_refresh_slot_only() {
        let fx = fixture().await;

        fx.service.logout(&fx.user.uuid_key).await.unwrap();

        assert_eq!(fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(), None);
        assert!(fx.directory.find_user_by_id(&fx.user.id).await.unwrap().is_some());
        assert!(fx.auto_login.find_code("auto").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_logout_unknown_user_is_not_found() {
        let fx = fixture().await;
        assert!(matches!(fx.service.logout("unknown").await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_delete_account_removes_everything() {
        let fx = fixture().await;

        fx.service.delete_account(&fx.user.uuid_key).await.unwrap();

        assert_eq!(fx.directory.row_counts(), (0, 0, 0, 0));
        assert_eq!(fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(), None);
        assert!(fx.auto_login.find_code("auto").await.unwrap().is_none());

        assert!(matches!(
            fx.service.delete_account(&fx.user.uuid_key).await,
            Err(AppError::NotFound(_))
        ));
    }
}
