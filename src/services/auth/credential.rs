//! 비밀번호 해싱/비교

use bcrypt::{hash, verify};
use crate::{
    config::PasswordConfig,
    errors::{AppError, ErrorContext},
};

/// 비밀번호 해시 저장소 추상화
pub trait CredentialStore: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    /// 평문이 해시와 일치하는지 확인합니다. 해시 형식이 잘못된 경우도 에러입니다.
    fn compare(&self, plaintext: &str, hashed: &str) -> Result<bool, AppError>;
}

/// bcrypt 기반 구현
pub struct BcryptCredentialStore {
    cost: u32,
}

impl BcryptCredentialStore {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// 환경별 cost(`PasswordConfig::bcrypt_cost`)를 사용합니다.
    pub fn from_env() -> Self {
        Self::new(PasswordConfig::bcrypt_cost())
    }
}

impl CredentialStore for BcryptCredentialStore {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        hash(plaintext, self.cost).context("비밀번호 해싱 실패")
    }

    fn compare(&self, plaintext: &str, hashed: &str) -> Result<bool, AppError> {
        verify(plaintext, hashed).context("비밀번호 검증 실패")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_compare() {
        let store = BcryptCredentialStore::new(4);
        let hashed = store.hash("longenough").unwrap();

        assert_ne!(hashed, "longenough");
        assert!(store.compare("longenough", &hashed).unwrap());
        assert!(!store.compare("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        let store = BcryptCredentialStore::new(4);
        assert!(store.compare("longenough", "not-a-bcrypt-hash").is_err());
    }
}
