//! 로컬 가입/로그인 핸들러
//!
//! 두 엔드포인트 모두 토큰 대신 일회용 인가 코드를 돌려주고,
//! 자동 로그인에 쓸 SSID를 서명 쿠키로 심습니다.
//! 클라이언트는 코드를 `POST /token/exchange`로 교환합니다.

use actix_web::{cookie::Cookie, post, web, HttpResponse};
use mongodb::bson::oid::ObjectId;
use validator::Validate;
use crate::{
    domain::dto::auth::{AuthReplyData, LocalLoginRequest, LocalSignupRequest},
    errors::AppError,
    routes::AppState,
    utils::cookies::SSID_COOKIE,
};

async fn ssid_cookie(state: &AppState, user_id: &ObjectId) -> Result<Cookie<'static>, AppError> {
    let ssid = state.auto_login_service.issue_ssid(user_id).await?;
    state.cookies.signed_cookie(
        SSID_COOKIE,
        &ssid,
        state.auto_login_service.settings().code_ttl,
    )
}

/// 로컬 가입
///
/// # Endpoint
/// `POST /auth/local/signup`
#[post("/signup")]
pub async fn local_signup(
    state: web::Data<AppState>,
    payload: web::Json<LocalSignupRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user_id = state.local_auth_service.signup(&payload).await?;
    let code = state.token_service.issue_authorization_code(&user_id).await?;
    let cookie = ssid_cookie(&state, &user_id).await?;

    Ok(HttpResponse::Created()
        .cookie(cookie)
        .json(AuthReplyData::ok("Signup successful", code)))
}

/// 로컬 로그인
///
/// # Endpoint
/// `POST /auth/local/login`
#[post("/login")]
pub async fn local_login(
    state: web::Data<AppState>,
    payload: web::Json<LocalLoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user_id = state.local_auth_service.login(&payload).await?;
    let code = state.token_service.issue_authorization_code(&user_id).await?;
    let cookie = ssid_cookie(&state, &user_id).await?;

    log::info!("로컬 로그인 성공: {}", user_id);
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthReplyData::ok("Login successful", code)))
}
