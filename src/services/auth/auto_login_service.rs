//! 자동 로그인 서비스
//!
//! 서버가 발급한 SSID에 묶인 장기 코드로 자격 증명 없이 재인증합니다.
//! 코드는 검증될 때마다 새 코드로 회전하므로 한 번 사용한 코드는 다시 통과하지 못합니다.
//!
//! # 흐름
//!
//! ```text
//! 로그인 ─► issue_ssid ─► SSID 쿠키
//!        └► 인가 코드 ─► issue_code(인가 코드, SSID) ─► AUTO 쿠키
//!
//! 재방문 ─► verify_auto_login_code(AUTO, SSID) ─► 새 AUTO 쿠키 + 새 인가 코드
//! ```
//!
//! 검증 시 인가 코드를 먼저 발급하고 회전은 마지막에 커밋합니다. 인가 코드
//! 발급이 실패하면 이전 자동 로그인 코드가 그대로 남습니다.

use std::sync::Arc;
use chrono::Utc;
use log::{debug, info};
use mongodb::bson::oid::ObjectId;
use crate::{
    caching::SessionCache,
    config::AutoLoginSettings,
    domain::entities::auto_login::{AutoLoginCode, SsidRecord},
    errors::{AppError, AutoLoginError},
    repositories::auto_login::AutoLoginRepository,
    services::auth::auth_code::AuthorizationCodes,
    utils::{random::generate_code, string_utils::mask_secret},
};

/// 자동 로그인 코드 검증 결과
#[derive(Debug, Clone, PartialEq)]
pub struct AutoLoginVerification {
    pub user_id: ObjectId,
    /// 회전된 새 자동 로그인 코드
    pub code: String,
    /// 토큰 교환에 쓰는 일회용 인가 코드
    pub auth_code: String,
}

pub struct AutoLoginService {
    repo: Arc<dyn AutoLoginRepository>,
    codes: AuthorizationCodes,
    settings: AutoLoginSettings,
}

impl AutoLoginService {
    pub fn new(
        cache: Arc<dyn SessionCache>,
        repo: Arc<dyn AutoLoginRepository>,
        settings: AutoLoginSettings,
    ) -> Self {
        Self {
            repo,
            codes: AuthorizationCodes::new(cache),
            settings,
        }
    }

    pub fn settings(&self) -> &AutoLoginSettings {
        &self.settings
    }

    /// 사용자를 위한 새 SSID를 발급합니다.
    pub async fn issue_ssid(&self, user_id: &ObjectId) -> Result<String, AppError> {
        let ssid = generate_code();
        self.repo
            .create_ssid(SsidRecord {
                ssid: ssid.clone(),
                user_id: *user_id,
                created_at: Utc::now().timestamp(),
            })
            .await?;

        debug!("SSID 발급: {} (user {})", mask_secret(&ssid), user_id);
        Ok(ssid)
    }

    /// 자동 로그인 흐름용 인가 코드를 발급합니다.
    pub async fn issue_authorization_code(&self, user_id: &ObjectId) -> Result<String, AppError> {
        self.codes.issue(user_id, self.settings.auth_code_ttl).await
    }

    /// SSID에 묶인 자동 로그인 코드를 발급합니다. 같은 SSID의 이전 코드는 삭제됩니다.
    pub async fn issue_auto_login_code(&self, user_id: &ObjectId, ssid: &str) -> Result<String, AppError> {
        self.rotate_code(user_id, ssid, None).await
    }

    async fn rotate_code(&self, user_id: &ObjectId, ssid: &str, previous: Option<&str>) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let code = generate_code();

        self.repo
            .replace_code(
                AutoLoginCode {
                    code: code.clone(),
                    user_id: *user_id,
                    ssid: ssid.to_string(),
                    created_at: now,
                    expire_at: now + self.settings.code_ttl,
                },
                previous,
            )
            .await?;

        Ok(code)
    }

    /// 자동 로그인 코드를 검증하고 새 코드로 회전합니다.
    ///
    /// 회전은 제시된 코드를 소비하는 조건으로만 커밋되므로, 같은 코드로 동시에
    /// 들어온 요청 중 하나만 성공합니다.
    ///
    /// # Errors
    ///
    /// * `AutoLoginError::InvalidCode` - 코드가 없거나 이미 회전된 경우 (동시 요청이 먼저 소비한 경우 포함)
    /// * `AutoLoginError::InvalidClient` - 코드가 다른 SSID에 묶인 경우
    /// * `AutoLoginError::Expired` - 코드가 만료된 경우
    /// * `AppError::RedisError` - 인가 코드 발급 실패. 이 경우 이전 코드는 그대로 남습니다.
    /// * `AppError::DatabaseError` - 저장소 오류. 이 경우 이전 코드는 그대로 남습니다.
    pub async fn verify_auto_login_code(&self, code: &str, ssid: &str) -> Result<AutoLoginVerification, AppError> {
        let record = self
            .repo
            .find_code(code)
            .await?
            .ok_or(AutoLoginError::InvalidCode)?;

        if record.ssid != ssid {
            info!("다른 SSID에서 자동 로그인 코드 사용 시도: {}", mask_secret(code));
            return Err(AutoLoginError::InvalidClient.into());
        }

        if record.is_expired_at(Utc::now().timestamp()) {
            return Err(AutoLoginError::Expired.into());
        }

        let auth_code = self.issue_authorization_code(&record.user_id).await?;
        let rotated = self.rotate_code(&record.user_id, ssid, Some(code)).await?;

        Ok(AutoLoginVerification {
            user_id: record.user_id,
            code: rotated,
            auth_code,
        })
    }

    /// 인가 코드를 소비하고 호출자의 SSID에 묶인 자동 로그인 코드를 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 인가 코드가 없거나 이미 사용된 경우
    /// * `AutoLoginError::InvalidClient` - SSID가 없거나 다른 사용자의 것인 경우
    pub async fn issue_code(&self, auth_code: &str, ssid: &str) -> Result<String, AppError> {
        let user_id = self.codes.consume(auth_code).await?;

        let record = self
            .repo
            .find_ssid(ssid)
            .await?
            .ok_or(AutoLoginError::InvalidClient)?;

        if record.user_id != user_id {
            info!("SSID 소유자 불일치: {}", mask_secret(ssid));
            return Err(AutoLoginError::InvalidClient.into());
        }

        self.issue_auto_login_code(&user_id, ssid).await
    }
}
