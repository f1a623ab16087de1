//! # 자동 로그인 저장소 구현
//!
//! | 컬렉션 | 인덱스 |
//! |--------|--------|
//! | `ssids` | `ssid` (unique) |
//! | `auto_login_codes` | `code` (unique), `ssid` |
//!
//! 코드 회전([`AutoLoginRepository::replace_code`])은 제시된 코드 소비, 기존 코드
//! 삭제, 새 코드 생성을 하나의 트랜잭션으로 묶어, 중간에 실패해도 이전 코드와
//! 새 코드 중 정확히 한쪽 상태만 남게 합니다. 같은 코드로 동시에 회전을 시도하면
//! 하나만 성공합니다.

use async_trait::async_trait;
use log::{info, warn};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    Collection, IndexModel,
};
use crate::{
    db::Database,
    domain::entities::auto_login::{AutoLoginCode, SsidRecord},
    errors::{AppError, AutoLoginError},
    repositories::database_error,
};

/// 자동 로그인 저장소 추상화
#[async_trait]
pub trait AutoLoginRepository: Send + Sync {
    async fn create_ssid(&self, record: SsidRecord) -> Result<(), AppError>;

    async fn find_ssid(&self, ssid: &str) -> Result<Option<SsidRecord>, AppError>;

    async fn find_code(&self, code: &str) -> Result<Option<AutoLoginCode>, AppError>;

    /// 같은 SSID에 묶인 코드를 모두 지우고 새 코드를 저장합니다. 원자적으로 수행됩니다.
    ///
    /// `previous`가 주어지면 그 코드가 같은 SSID에 아직 남아 있어야 회전합니다.
    ///
    /// # Errors
    ///
    /// * `AutoLoginError::InvalidCode` - `previous`가 이미 소비된 경우 (아무것도 바뀌지 않음)
    async fn replace_code(&self, record: AutoLoginCode, previous: Option<&str>) -> Result<(), AppError>;

    /// 사용자에게 발급된 자동 로그인 코드를 모두 삭제하고 삭제 개수를 반환합니다.
    async fn delete_codes_for_user(&self, user_id: &ObjectId) -> Result<u64, AppError>;
}

/// MongoDB 기반 자동 로그인 저장소
#[derive(Clone)]
pub struct MongoAutoLoginRepository {
    db: Database,
}

impl MongoAutoLoginRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn ssids(&self) -> Collection<SsidRecord> {
        self.db.get_database().collection("ssids")
    }

    fn codes(&self) -> Collection<AutoLoginCode> {
        self.db.get_database().collection("auto_login_codes")
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let unique = IndexOptions::builder().unique(true).build();

        self.ssids()
            .create_index(IndexModel::builder().keys(doc! { "ssid": 1 }).options(unique.clone()).build())
            .await
            .map_err(database_error)?;
        self.codes()
            .create_index(IndexModel::builder().keys(doc! { "code": 1 }).options(unique).build())
            .await
            .map_err(database_error)?;
        self.codes()
            .create_index(IndexModel::builder().keys(doc! { "ssid": 1 }).build())
            .await
            .map_err(database_error)?;

        info!("✅ 자동 로그인 저장소 인덱스 준비 완료");
        Ok(())
    }
}

#[async_trait]
impl AutoLoginRepository for MongoAutoLoginRepository {
    async fn create_ssid(&self, record: SsidRecord) -> Result<(), AppError> {
        self.ssids()
            .insert_one(&record)
            .await
            .map_err(database_error)?;
        Ok(())
    }

    async fn find_ssid(&self, ssid: &str) -> Result<Option<SsidRecord>, AppError> {
        self.ssids()
            .find_one(doc! { "ssid": ssid })
            .await
            .map_err(database_error)
    }

    async fn find_code(&self, code: &str) -> Result<Option<AutoLoginCode>, AppError> {
        self.codes()
            .find_one(doc! { "code": code })
            .await
            .map_err(database_error)
    }

    async fn replace_code(&self, record: AutoLoginCode, previous: Option<&str>) -> Result<(), AppError> {
        let mut session = self.db.client().start_session().await.map_err(database_error)?;
        session.start_transaction().await.map_err(database_error)?;

        let rotated = async {
            if let Some(previous) = previous {
                let consumed = self
                    .codes()
                    .delete_one(doc! { "code": previous, "ssid": record.ssid.as_str() })
                    .session(&mut session)
                    .await?;
                if consumed.deleted_count == 0 {
                    return Ok(false);
                }
            }
            self.codes()
                .delete_many(doc! { "ssid": record.ssid.as_str() })
                .session(&mut session)
                .await?;
            self.codes().insert_one(&record).session(&mut session).await?;
            Ok::<bool, mongodb::error::Error>(true)
        }
        .await;

        match rotated {
            Ok(true) => session.commit_transaction().await.map_err(database_error),
            Ok(false) => {
                if let Err(abort_error) = session.abort_transaction().await {
                    warn!("자동 로그인 코드 회전 롤백 실패: {}", abort_error);
                }
                Err(AutoLoginError::InvalidCode.into())
            }
            Err(e) => {
                if let Err(abort_error) = session.abort_transaction().await {
                    warn!("자동 로그인 코드 회전 롤백 실패: {}", abort_error);
                }
                Err(database_error(e))
            }
        }
    }

    async fn delete_codes_for_user(&self, user_id: &ObjectId) -> Result<u64, AppError> {
        let result = self
            .codes()
            .delete_many(doc! { "user_id": *user_id })
            .await
            .map_err(database_error)?;
        Ok(result.deleted_count)
    }
}
