//! MongoDB 연결 관리
//!
//! 사용자 디렉터리와 자동 로그인 저장소가 공유하는 클라이언트를 보관합니다.
//! 가입/코드 회전처럼 여러 컬렉션에 걸친 쓰기는 [`Database::client`]로
//! 세션을 열어 트랜잭션으로 묶습니다. 트랜잭션은 레플리카셋 구성이 필요합니다.
//!
//! # 환경 변수 설정
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017/?replicaSet=rs0"
//! export DATABASE_NAME="session_auth_dev"
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::config::StorageConfig;
//! use crate::db::Database;
//!
//! let database = Database::new(&StorageConfig::mongodb_uri(), &StorageConfig::database_name()).await?;
//! let users = MongoUserDirectory::new(database.clone());
//! ```

use mongodb::{bson::doc, options::ClientOptions, Client};
use log::info;
use crate::errors::AppError;

/// MongoDB 데이터베이스 연결 래퍼
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 새 MongoDB 연결을 생성하고 ping으로 연결 상태를 확인합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::DatabaseError` - URI 파싱, 클라이언트 생성, ping 중 하나라도 실패한 경우
    pub async fn new(mongodb_uri: &str, database_name: &str) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        client_options.app_name = Some("session_auth".to_string());

        let client = Client::with_options(client_options)
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        client
            .database(database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name: database_name.to_string(),
        })
    }

    /// 리포지토리에서 컬렉션에 접근할 때 사용하는 데이터베이스 핸들
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    /// 트랜잭션 세션을 열 때 사용합니다.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
