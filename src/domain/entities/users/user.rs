//! 사용자 디렉터리 엔티티
//!
//! 하나의 계정은 `users`, `profiles`, `passwords`, `providers` 네 개의
//! 레코드로 구성되며, 가입 시 하나의 트랜잭션으로 함께 생성됩니다.

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::config::AuthProvider;

/// 사용자 계정
///
/// `id`는 디렉터리 내부 식별자(인가 코드가 가리키는 값)이고,
/// `uuid_key`는 토큰과 세션 캐시에서 사용하는 외부 식별자입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub uuid_key: String,
    pub email: String,
    pub created_at: i64,
}

impl User {
    /// 새 사용자 레코드를 만듭니다. ID와 UUID 키는 즉시 할당됩니다.
    pub fn new(email: String) -> Self {
        Self {
            id: ObjectId::new(),
            uuid_key: Uuid::new_v4().to_string(),
            email,
            created_at: Utc::now().timestamp(),
        }
    }
}

/// 사용자 프로필
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: ObjectId,
    pub nickname: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 로컬 계정 비밀번호 해시
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordRecord {
    pub user_id: ObjectId,
    pub password: String,
}

/// 계정이 등록된 인증 프로바이더
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub user_id: ObjectId,
    pub provider: AuthProvider,
}

/// 로컬 가입 시 디렉터리에 넘기는 입력
#[derive(Debug, Clone)]
pub struct NewLocalUser {
    pub email: String,
    pub nickname: String,
    pub image_url: Option<String>,
    pub password_hash: String,
}

impl NewLocalUser {
    /// 가입 트랜잭션에서 생성할 네 개의 레코드
    pub fn into_records(self) -> (User, Profile, PasswordRecord, ProviderRecord) {
        let user = User::new(self.email);
        let profile = Profile {
            user_id: user.id,
            nickname: self.nickname,
            image_url: self.image_url,
        };
        let password = PasswordRecord {
            user_id: user.id,
            password: self.password_hash,
        };
        let provider = ProviderRecord {
            user_id: user.id,
            provider: AuthProvider::Local,
        };
        (user, profile, password, provider)
    }
}
