//! 토큰 교환/검증 핸들러

use actix_web::{post, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::{
    domain::dto::auth::CodeRequest,
    errors::AppError,
    handlers::{token_pair_from_request, token_pair_response},
    routes::AppState,
};

/// 인가 코드를 토큰 쌍으로 교환합니다.
///
/// # Endpoint
/// `POST /token/exchange`
#[post("/exchange")]
pub async fn exchange_code(
    state: web::Data<AppState>,
    payload: web::Json<CodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let pair = state
        .token_service
        .issue_token_pair_by_auth_code(&payload.code)
        .await?;

    token_pair_response(HttpResponse::Ok(), &state, &pair, "Token issued")
}

/// 토큰 쌍을 검증하고 새 쌍으로 회전합니다.
///
/// # Endpoint
/// `POST /token/validate`
#[post("/validate")]
pub async fn validate_token(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let pair = token_pair_from_request(&req, &state)?;
    let rotated = state.token_service.validate_or_refresh(&pair).await?;

    token_pair_response(HttpResponse::Ok(), &state, &rotated, "Token refreshed")
}
