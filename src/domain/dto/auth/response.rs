use serde::Serialize;

/// 기본 응답 본문
#[derive(Debug, Serialize)]
pub struct ReplyData {
    pub success: bool,
    pub message: String,
}

impl ReplyData {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// 인가 코드를 함께 돌려주는 응답 본문
#[derive(Debug, Serialize)]
pub struct AuthReplyData {
    pub success: bool,
    pub message: String,
    pub code: String,
}

impl AuthReplyData {
    pub fn ok(message: &str, code: String) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            code,
        }
    }
}
