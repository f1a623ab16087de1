//! # HTTP 요청 핸들러
//!
//! 핸들러는 전송 계층만 담당합니다. 요청 본문 검증(`validator`), 헤더/쿠키에서
//! 토큰과 코드 꺼내기, 응답 헤더/쿠키 설정을 하고 나머지는 서비스에 위임합니다.
//!
//! | 모듈 | 경로 |
//! |------|------|
//! | [`auth`] | `/auth/local/signup`, `/auth/local/login` |
//! | [`token_handlers`] | `/token/exchange`, `/token/validate` |
//! | [`users`] | `/user/logout`, `DELETE /user` |
//! | [`auto_login`] | `/auto/verify`, `/auto/issue` |

use actix_web::{http::header, HttpRequest, HttpResponse, HttpResponseBuilder};
use crate::{
    domain::{dto::auth::ReplyData, models::token::TokenPair},
    errors::AppError,
    routes::AppState,
    utils::{
        cookies::REFRESH_COOKIE,
        string_utils::extract_bearer_token,
    },
};

pub mod auth;
pub mod token_handlers;
pub mod users;
pub mod auto_login;

/// `Authorization: Bearer` 헤더와 `refresh` 쿠키로 토큰 쌍을 구성합니다.
///
/// 리프레시 쿠키가 없으면 빈 문자열로 두어, 액세스 토큰이 유효한 경우에만 통과하게 합니다.
///
/// # Errors
///
/// * `AppError::AuthenticationError` - Bearer 헤더가 없거나 형식이 잘못된 경우
pub(crate) fn token_pair_from_request(req: &HttpRequest, state: &AppState) -> Result<TokenPair, AppError> {
    let access_token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .ok_or_else(|| AppError::AuthenticationError("Token is invalid".to_string()))?;

    let refresh_token = state.cookies.read(req, REFRESH_COOKIE).unwrap_or_default();

    Ok(TokenPair {
        access_token: access_token.to_string(),
        refresh_token,
    })
}

/// 액세스 토큰은 `Authorization` 헤더로, 리프레시 토큰은 서명 쿠키로 내려줍니다.
pub(crate) fn token_pair_response(
    mut builder: HttpResponseBuilder,
    state: &AppState,
    pair: &TokenPair,
    message: &str,
) -> Result<HttpResponse, AppError> {
    let refresh_cookie = state.cookies.signed_cookie(
        REFRESH_COOKIE,
        &pair.refresh_token,
        state.token_service.settings().refresh_token_ttl,
    )?;

    Ok(builder
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.access_token)))
        .cookie(refresh_cookie)
        .json(ReplyData::ok(message)))
}
