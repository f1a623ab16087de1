//! # 사용자 디렉터리 구현
//!
//! 계정 하나는 `users`, `profiles`, `passwords`, `providers` 네 컬렉션에 걸쳐
//! 저장됩니다. 생성과 삭제는 항상 하나의 MongoDB 트랜잭션 안에서 수행되므로
//! 일부 레코드만 남는 상태는 생기지 않습니다.
//!
//! ## 인덱스
//!
//! | 컬렉션 | 필드 | 옵션 |
//! |--------|------|------|
//! | `users` | `email` | unique |
//! | `users` | `uuid_key` | unique |
//! | `profiles`, `passwords`, `providers` | `user_id` | unique |

use async_trait::async_trait;
use log::{info, warn};
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};
use crate::{
    db::Database,
    domain::entities::users::{NewLocalUser, PasswordRecord, Profile, ProviderRecord, User},
    errors::AppError,
    repositories::{database_error, is_duplicate_key},
};

/// 사용자 디렉터리 추상화
///
/// 토큰 엔진과 로컬 인증 서비스가 소비하는 조회/생성/삭제 연산입니다.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn find_user_by_uuid(&self, uuid_key: &str) -> Result<Option<User>, AppError>;

    /// 사용자, 프로필, 비밀번호, 프로바이더 레코드를 하나의 단위로 생성합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ConflictError` - 이메일이 이미 존재하는 경우
    /// * `AppError::DatabaseError` - 트랜잭션이 실패하여 롤백된 경우
    async fn create_user_tx(&self, input: NewLocalUser) -> Result<User, AppError>;

    /// 사용자와 연관 레코드를 모두 삭제합니다. 사용자가 없으면 `false`.
    async fn delete_user(&self, uuid_key: &str) -> Result<bool, AppError>;

    async fn find_profile(&self, user_id: &ObjectId) -> Result<Option<Profile>, AppError>;

    async fn find_password(&self, user_id: &ObjectId) -> Result<Option<PasswordRecord>, AppError>;

    async fn find_provider(&self, user_id: &ObjectId) -> Result<Option<ProviderRecord>, AppError>;
}

/// MongoDB 기반 사용자 디렉터리
#[derive(Clone)]
pub struct MongoUserDirectory {
    db: Database,
}

impl MongoUserDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.get_database().collection("users")
    }

    fn profiles(&self) -> Collection<Profile> {
        self.db.get_database().collection("profiles")
    }

    fn passwords(&self) -> Collection<PasswordRecord> {
        self.db.get_database().collection("passwords")
    }

    fn providers(&self) -> Collection<ProviderRecord> {
        self.db.get_database().collection("providers")
    }

    /// 유니크 인덱스를 설치합니다. 서버 시작 시 한 번 호출합니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let unique = || IndexOptions::builder().unique(true).build();

        self.users()
            .create_index(IndexModel::builder().keys(doc! { "email": 1 }).options(unique()).build())
            .await
            .map_err(database_error)?;
        self.users()
            .create_index(IndexModel::builder().keys(doc! { "uuid_key": 1 }).options(unique()).build())
            .await
            .map_err(database_error)?;

        let by_user = || IndexModel::builder().keys(doc! { "user_id": 1 }).options(unique()).build();
        self.profiles().create_index(by_user()).await.map_err(database_error)?;
        self.passwords().create_index(by_user()).await.map_err(database_error)?;
        self.providers().create_index(by_user()).await.map_err(database_error)?;

        info!("✅ 사용자 디렉터리 인덱스 준비 완료");
        Ok(())
    }

    async fn abort(session: &mut ClientSession) {
        if let Err(e) = session.abort_transaction().await {
            warn!("트랜잭션 롤백 실패: {}", e);
        }
    }
}

#[async_trait]
impl UserDirectory for MongoUserDirectory {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "email": email })
            .await
            .map_err(database_error)
    }

    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(database_error)
    }

    async fn find_user_by_uuid(&self, uuid_key: &str) -> Result<Option<User>, AppError> {
        self.users()
            .find_one(doc! { "uuid_key": uuid_key })
            .await
            .map_err(database_error)
    }

    async fn create_user_tx(&self, input: NewLocalUser) -> Result<User, AppError> {
        let (user, profile, password, provider) = input.into_records();

        let mut session = self.db.client().start_session().await.map_err(database_error)?;
        session.start_transaction().await.map_err(database_error)?;

        let written = async {
            self.users().insert_one(&user).session(&mut session).await?;
            self.profiles().insert_one(&profile).session(&mut session).await?;
            self.passwords().insert_one(&password).session(&mut session).await?;
            self.providers().insert_one(&provider).session(&mut session).await?;
            Ok::<(), mongodb::error::Error>(())
        }
        .await;

        if let Err(e) = written {
            Self::abort(&mut session).await;
            return Err(if is_duplicate_key(&e) {
                AppError::ConflictError("Email already exists".to_string())
            } else {
                database_error(e)
            });
        }

        session.commit_transaction().await.map_err(database_error)?;
        Ok(user)
    }

    async fn delete_user(&self, uuid_key: &str) -> Result<bool, AppError> {
        let Some(user) = self.find_user_by_uuid(uuid_key).await? else {
            return Ok(false);
        };

        let mut session = self.db.client().start_session().await.map_err(database_error)?;
        session.start_transaction().await.map_err(database_error)?;

        let deleted = async {
            let result = self
                .users()
                .delete_one(doc! { "_id": user.id })
                .session(&mut session)
                .await?;
            let owned = doc! { "user_id": user.id };
            self.profiles().delete_many(owned.clone()).session(&mut session).await?;
            self.passwords().delete_many(owned.clone()).session(&mut session).await?;
            self.providers().delete_many(owned).session(&mut session).await?;
            Ok::<u64, mongodb::error::Error>(result.deleted_count)
        }
        .await;

        match deleted {
            Ok(count) => {
                session.commit_transaction().await.map_err(database_error)?;
                Ok(count > 0)
            }
            Err(e) => {
                Self::abort(&mut session).await;
                Err(database_error(e))
            }
        }
    }

    async fn find_profile(&self, user_id: &ObjectId) -> Result<Option<Profile>, AppError> {
        self.profiles()
            .find_one(doc! { "user_id": *user_id })
            .await
            .map_err(database_error)
    }

    async fn find_password(&self, user_id: &ObjectId) -> Result<Option<PasswordRecord>, AppError> {
        self.passwords()
            .find_one(doc! { "user_id": *user_id })
            .await
            .map_err(database_error)
    }

    async fn find_provider(&self, user_id: &ObjectId) -> Result<Option<ProviderRecord>, AppError> {
        self.providers()
            .find_one(doc! { "user_id": *user_id })
            .await
            .map_err(database_error)
    }
}
