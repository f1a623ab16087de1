//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 토큰/세션 엔진을 위한 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 타입 안전하고
//! 일관된 에러 처리를 제공합니다.
//!
//! 5xx 계열 에러는 상세 내용을 로그로만 남기고, 클라이언트에게는
//! 고정된 메시지만 전달합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::AppError;
//!
//! async fn exchange(code: &str) -> Result<TokenPair, AppError> {
//!     let user_id = codes.consume(code).await?;
//!     token_service.issue_token_pair_by_user_id(&user_id).await
//! }
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스(디렉터리) 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 세션 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 토큰 페이로드 구조 검증 실패 (400 Bad Request)
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 자동 로그인 코드 검증 실패 (400 Bad Request)
    #[error(transparent)]
    AutoLogin(#[from] AutoLoginError),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// 자동 로그인 코드 검증 실패 사유
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutoLoginError {
    /// 존재하지 않거나 이미 사용된 코드
    #[error("Invalid code")]
    InvalidCode,

    /// 코드가 묶인 SSID와 요청 SSID가 다름
    #[error("Invalid client")]
    InvalidClient,

    /// 만료된 코드
    #[error("Expired code")]
    Expired,
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드
    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            AppError::AutoLogin(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 클라이언트에게 노출해도 되는 짧은 메시지
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::InvalidPayload(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg) => msg.clone(),
            AppError::AutoLogin(e) => e.to_string(),
            // 스토리지 계층 에러는 내부 식별자를 포함할 수 있으므로 숨김
            AppError::DatabaseError(_) | AppError::RedisError(_) => "Internal server error".to_string(),
            AppError::InternalError(msg) => msg.clone(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.http_status()
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 각 에러 타입을 적절한 HTTP 상태 코드와 JSON 응답으로 변환합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.http_status();

        if status.is_server_error() {
            log::error!("요청 처리 중 내부 오류: {}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "success": false,
                "message": self.public_message(),
            }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}
