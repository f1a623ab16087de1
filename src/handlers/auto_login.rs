//! 자동 로그인 핸들러
//!
//! 자동 로그인 코드(`AUTO`)와 SSID(`SSID`)는 모두 서명 쿠키로만 오갑니다.

use actix_web::{get, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::{
    domain::dto::auth::{AuthReplyData, CodeRequest, ReplyData},
    errors::{AppError, AutoLoginError},
    routes::AppState,
    utils::cookies::{AUTO_LOGIN_COOKIE, SSID_COOKIE},
};

fn client_ssid(state: &AppState, req: &HttpRequest) -> Result<String, AppError> {
    state
        .cookies
        .read(req, SSID_COOKIE)
        .ok_or_else(|| AutoLoginError::InvalidClient.into())
}

/// 자동 로그인 코드를 검증하고 새 인가 코드를 발급합니다. `AUTO` 쿠키는 회전됩니다.
///
/// # Endpoint
/// `GET /auto/verify`
#[get("/verify")]
pub async fn verify_auto_login(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let code = state
        .cookies
        .read(&req, AUTO_LOGIN_COOKIE)
        .ok_or(AutoLoginError::InvalidCode)?;
    let ssid = client_ssid(&state, &req)?;

    let verification = state
        .auto_login_service
        .verify_auto_login_code(&code, &ssid)
        .await?;

    let cookie = state.cookies.signed_cookie(
        AUTO_LOGIN_COOKIE,
        &verification.code,
        state.auto_login_service.settings().code_ttl,
    )?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(AuthReplyData::ok("Auto login successful", verification.auth_code)))
}

/// 인가 코드를 자동 로그인 코드로 교환합니다.
///
/// # Endpoint
/// `GET /auto/issue?code={code}`
#[get("/issue")]
pub async fn issue_auto_login(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<CodeRequest>,
) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    let ssid = client_ssid(&state, &req)?;

    let code = state.auto_login_service.issue_code(&query.code, &ssid).await?;

    let cookie = state.cookies.signed_cookie(
        AUTO_LOGIN_COOKIE,
        &code,
        state.auto_login_service.settings().code_ttl,
    )?;

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(ReplyData::ok("Auto login code issued")))
}
