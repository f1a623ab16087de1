//! 로컬(이메일/비밀번호) 인증 서비스
//!
//! 가입과 로그인은 사용자 ID만 돌려줍니다. 토큰 발급은 핸들러가
//! 인가 코드를 통해 [`super::TokenService`]에 위임합니다.

use std::sync::Arc;
use log::{error, info};
use mongodb::bson::oid::ObjectId;
use crate::{
    config::AuthProvider,
    domain::{
        dto::auth::{LocalLoginRequest, LocalSignupRequest},
        entities::users::NewLocalUser,
    },
    errors::AppError,
    repositories::users::UserDirectory,
    services::auth::credential::CredentialStore,
    utils::string_utils::default_nickname,
};

fn invalid_credentials() -> AppError {
    AppError::AuthenticationError("Invalid email or password".to_string())
}

pub struct LocalAuthService {
    directory: Arc<dyn UserDirectory>,
    credentials: Arc<dyn CredentialStore>,
}

impl LocalAuthService {
    pub fn new(directory: Arc<dyn UserDirectory>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            directory,
            credentials,
        }
    }

    /// 로컬 계정을 만듭니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일이 이미 존재하는 경우
    /// * `AppError::InternalError` - 디렉터리 트랜잭션 실패 ("Error creating user")
    pub async fn signup(&self, request: &LocalSignupRequest) -> Result<ObjectId, AppError> {
        if self.directory.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::ConflictError("Email already exists".to_string()));
        }

        let password_hash = self.credentials.hash(&request.password)?;
        let nickname = request
            .nickname
            .clone()
            .unwrap_or_else(|| default_nickname(&request.email));

        let created = self
            .directory
            .create_user_tx(NewLocalUser {
                email: request.email.clone(),
                nickname,
                image_url: request.image_url.clone(),
                password_hash,
            })
            .await;

        match created {
            Ok(user) => {
                info!("✅ 로컬 가입 완료: {}", user.id);
                Ok(user.id)
            }
            Err(AppError::ConflictError(message)) => Err(AppError::ConflictError(message)),
            Err(e) => {
                error!("가입 트랜잭션 실패: {}", e);
                Err(AppError::InternalError("Error creating user".to_string()))
            }
        }
    }

    /// 이메일/비밀번호로 로그인합니다. 캐시에는 아무것도 쓰지 않습니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 이메일 없음, 비밀번호 없음/불일치
    /// * `AppError::ValidationError` - 다른 프로바이더로 가입된 이메일
    /// * `AppError::InternalError` - 프로필이 없는 경우
    pub async fn login(&self, request: &LocalLoginRequest) -> Result<ObjectId, AppError> {
        let user = self
            .directory
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let provider = self.directory.find_provider(&user.id).await?;
        if let Some(record) = provider {
            if record.provider != AuthProvider::Local {
                return Err(AppError::ValidationError(
                    "This email is registered with a different provider".to_string(),
                ));
            }
        }

        let password = self
            .directory
            .find_password(&user.id)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !self.credentials.compare(&request.password, &password.password)? {
            return Err(invalid_credentials());
        }

        if self.directory.find_profile(&user.id).await?.is_none() {
            error!("프로필 없는 사용자: {}", user.id);
            return Err(AppError::InternalError("Error finding user profile".to_string()));
        }

        Ok(user.id)
    }
}
