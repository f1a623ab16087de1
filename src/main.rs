//! 세션 인증 서비스 메인 애플리케이션
//!
//! Actix-web HTTP 서버를 구동하고 저장소와 서비스를 조립합니다.
//! `STORAGE_BACKEND=memory`이면 Redis/MongoDB 없이 프로세스 메모리로 동작합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info, warn};
use session_auth_backend::caching::redis::RedisClient;
use session_auth_backend::config::{
    AutoLoginSettings, CookieConfig, PasswordConfig, ServerConfig, StorageBackend, StorageConfig,
    TokenSettings,
};
use session_auth_backend::db::Database;
use session_auth_backend::errors::AppError;
use session_auth_backend::repositories::auto_login::MongoAutoLoginRepository;
use session_auth_backend::repositories::users::MongoUserDirectory;
use session_auth_backend::routes::{configure_all_routes, AppState};
use session_auth_backend::services::auth::BcryptCredentialStore;
use session_auth_backend::utils::cookies::CookieSigner;

/// Rate Limiting 설정 구조체
#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 세션 인증 서비스 시작중...");

    let state = match build_state().await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("서비스 초기화 실패: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(state).await
}

/// 저장소 백엔드를 선택하고 서비스를 조립합니다
///
/// # Errors
///
/// * `AppError::DatabaseError` - MongoDB 연결 또는 인덱스 생성 실패
/// * `AppError::RedisError` - Redis 연결 실패
async fn build_state() -> Result<AppState, AppError> {
    let token_settings = TokenSettings::from_env();
    let auto_login_settings = AutoLoginSettings::from_env();
    let cookies = CookieSigner::new(&CookieConfig::secret());
    let bcrypt_cost = PasswordConfig::bcrypt_cost();

    match StorageConfig::backend() {
        StorageBackend::Memory => {
            warn!("⚠️ 메모리 저장소 사용 중: 재시작하면 모든 세션과 계정이 사라집니다");
            Ok(AppState::in_memory(token_settings, auto_login_settings, cookies, bcrypt_cost))
        }
        StorageBackend::External => {
            info!("📡 데이터베이스 연결 중...");

            let database = Database::new(&StorageConfig::mongodb_uri(), &StorageConfig::database_name()).await?;
            let redis = RedisClient::new(&StorageConfig::redis_url()).await?;

            let directory = MongoUserDirectory::new(database.clone());
            directory.create_indexes().await?;
            let auto_login = MongoAutoLoginRepository::new(database);
            auto_login.create_indexes().await?;

            Ok(AppState::new(
                Arc::new(redis),
                Arc::new(directory),
                Arc::new(auto_login),
                Arc::new(BcryptCredentialStore::from_env()),
                token_settings,
                auto_login_settings,
                cookies,
            ))
        }
    }
}

/// HTTP 서버를 구성하고 실행합니다
///
/// Rate Limiting, CORS, 요청 로깅, 경로 정규화 미들웨어를 포함합니다.
///
/// # Errors
///
/// * `std::io::Error` - 포트 바인딩 실패 또는 서버 실행 오류
async fn start_http_server(state: web::Data<AppState>) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", ServerConfig::host(), ServerConfig::port());

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// ```bash
/// RUST_LOG=session_auth_backend::services=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
///
/// 허용 오리진은 `CORS_ORIGINS`(쉼표 구분)에서 읽습니다. 쿠키를 주고받으므로
/// 자격 증명을 허용하고, 클라이언트가 새 액세스 토큰을 읽을 수 있도록
/// `Authorization` 응답 헤더를 노출합니다.
fn configure_cors() -> Cors {
    let cors = ServerConfig::cors_origins()
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin));

    cors.allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .expose_headers(vec![header::AUTHORIZATION])
        .supports_credentials()
        .max_age(3600)
}

/// 환경변수에서 Rate Limiting 설정을 로드합니다
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}
