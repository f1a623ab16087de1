//! 자동 로그인 엔티티
//!
//! SSID는 클라이언트 세션마다 서버가 발급하는 장기 식별자이고,
//! 자동 로그인 코드는 하나의 SSID에 묶인 회전형 비밀값입니다.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// 서버가 발급한 클라이언트 세션 식별자
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsidRecord {
    pub ssid: String,
    pub user_id: ObjectId,
    pub created_at: i64,
}

/// SSID에 묶인 자동 로그인 코드
///
/// SSID 하나에는 최대 하나의 유효한 코드만 존재합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoginCode {
    pub code: String,
    pub user_id: ObjectId,
    pub ssid: String,
    pub created_at: i64,
    /// 만료 시각 (Unix timestamp, 초)
    pub expire_at: i64,
}

impl AutoLoginCode {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expire_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_boundary() {
        let code = AutoLoginCode {
            code: "c".to_string(),
            user_id: ObjectId::new(),
            ssid: "s".to_string(),
            created_at: 100,
            expire_at: 200,
        };

        assert!(!code.is_expired_at(199));
        assert!(code.is_expired_at(200));
        assert!(code.is_expired_at(201));
    }
}
