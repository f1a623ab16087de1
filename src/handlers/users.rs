//! 사용자 계정 핸들러
//!
//! 두 엔드포인트 모두 토큰 쌍으로 신원을 확인한 뒤 동작합니다.

use actix_web::{delete, get, web, HttpRequest, HttpResponse};
use crate::{
    domain::dto::auth::ReplyData,
    errors::AppError,
    handlers::token_pair_from_request,
    routes::AppState,
    utils::cookies::{CookieSigner, AUTO_LOGIN_COOKIE, REFRESH_COOKIE, SSID_COOKIE},
};

/// 로그아웃
///
/// # Endpoint
/// `GET /user/logout`
#[get("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let pair = token_pair_from_request(&req, &state)?;
    let payload = state.token_service.verify(&pair).await?;

    state.user_service.logout(&payload.uuid_key_string()).await?;

    Ok(HttpResponse::Ok()
        .cookie(CookieSigner::removal_cookie(REFRESH_COOKIE))
        .json(ReplyData::ok("Logout successful")))
}

/// 계정 삭제
///
/// # Endpoint
/// `DELETE /user`
#[delete("")]
pub async fn delete_account(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let pair = token_pair_from_request(&req, &state)?;
    let payload = state.token_service.verify(&pair).await?;

    state.user_service.delete_account(&payload.uuid_key_string()).await?;

    Ok(HttpResponse::Ok()
        .cookie(CookieSigner::removal_cookie(REFRESH_COOKIE))
        .cookie(CookieSigner::removal_cookie(AUTO_LOGIN_COOKIE))
        .cookie(CookieSigner::removal_cookie(SSID_COOKIE))
        .json(ReplyData::ok("Account deleted")))
}
