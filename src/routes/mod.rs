//! API 라우트와 애플리케이션 상태
//!
//! | 스코프 | 핸들러 |
//! |--------|--------|
//! | `/health` | [`health_check`] |
//! | `/auth/local` | 가입, 로그인 |
//! | `/token` | 인가 코드 교환, 토큰 검증/회전 |
//! | `/user` | 로그아웃, 계정 삭제 |
//! | `/auto` | 자동 로그인 검증, 자동 로그인 코드 발급 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//!
//! let state = web::Data::new(AppState::in_memory(token_settings, auto_login_settings, cookies, 4));
//! let app = App::new().app_data(state).configure(configure_all_routes);
//! ```

use std::sync::Arc;
use actix_web::{error::{JsonPayloadError, QueryPayloadError}, get, web, HttpRequest, HttpResponse};
use serde_json::json;
use crate::{
    caching::{memory::MemoryCache, SessionCache},
    config::{AutoLoginSettings, TokenSettings},
    errors::AppError,
    handlers,
    repositories::{
        auto_login::{AutoLoginRepository, MemoryAutoLoginRepository},
        users::{MemoryUserDirectory, UserDirectory},
    },
    services::{
        auth::{AutoLoginService, BcryptCredentialStore, CredentialStore, LocalAuthService, TokenService},
        users::UserService,
    },
    utils::cookies::CookieSigner,
};

/// 핸들러가 `web::Data<AppState>`로 공유하는 서비스 묶음
pub struct AppState {
    pub token_service: TokenService,
    pub auto_login_service: AutoLoginService,
    pub local_auth_service: LocalAuthService,
    pub user_service: UserService,
    pub cookies: CookieSigner,
}

impl AppState {
    /// 협력 객체를 받아 서비스를 조립합니다.
    pub fn new(
        cache: Arc<dyn SessionCache>,
        directory: Arc<dyn UserDirectory>,
        auto_login: Arc<dyn AutoLoginRepository>,
        credentials: Arc<dyn CredentialStore>,
        token_settings: TokenSettings,
        auto_login_settings: AutoLoginSettings,
        cookies: CookieSigner,
    ) -> Self {
        Self {
            token_service: TokenService::new(cache.clone(), directory.clone(), token_settings),
            auto_login_service: AutoLoginService::new(cache.clone(), auto_login.clone(), auto_login_settings),
            local_auth_service: LocalAuthService::new(directory.clone(), credentials),
            user_service: UserService::new(directory, cache, auto_login),
            cookies,
        }
    }

    /// 모든 저장소를 프로세스 메모리로 구성합니다. (`STORAGE_BACKEND=memory`)
    pub fn in_memory(
        token_settings: TokenSettings,
        auto_login_settings: AutoLoginSettings,
        cookies: CookieSigner,
        bcrypt_cost: u32,
    ) -> Self {
        Self::new(
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryUserDirectory::new()),
            Arc::new(MemoryAutoLoginRepository::new()),
            Arc::new(BcryptCredentialStore::new(bcrypt_cost)),
            token_settings,
            auto_login_settings,
            cookies,
        )
    }
}

fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(error.to_string()).into()
}

fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(error.to_string()).into()
}

/// 모든 라우트를 설정합니다
///
/// 본문/쿼리 파싱 실패도 다른 에러와 같은 JSON 형식으로 응답합니다.
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.service(health_check);

    cfg.service(
        web::scope("/auth/local")
            .service(handlers::auth::local_signup)
            .service(handlers::auth::local_login),
    );

    cfg.service(
        web::scope("/token")
            .service(handlers::token_handlers::exchange_code)
            .service(handlers::token_handlers::validate_token),
    );

    cfg.service(
        web::scope("/user")
            .service(handlers::users::logout)
            .service(handlers::users::delete_account),
    );

    cfg.service(
        web::scope("/auto")
            .service(handlers::auto_login::verify_auto_login)
            .service(handlers::auto_login::issue_auto_login),
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```bash
/// curl http://localhost:8080/health
/// ```
#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "session_auth_service",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
