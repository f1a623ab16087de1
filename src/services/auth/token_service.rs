//! 토큰 서비스
//!
//! 인가 코드 교환, 액세스/리프레시 토큰 발급, 검증, 회전을 담당하는
//! 세션 엔진의 중심입니다.
//!
//! # 상태 전이 (요청 하나의 토큰 쌍 기준)
//!
//! ```text
//! Valid ──────────────────────────────► 통과
//! Expired + 캐시와 일치하는 Refresh ──► Rotated (새 쌍 발급, 캐시 덮어쓰기)
//! Expired + 불일치 Refresh ──────────► Rejected (401)
//! Invalid (위조/형식 오류) ───────────► Rejected (401)
//! ```
//!
//! 리프레시 토큰은 사용자당 슬롯 하나(`refresh_token:<uuidKey>`)에만 저장되므로
//! 새 쌍을 발급하는 순간 이전 리프레시 토큰은 더 이상 통과하지 못합니다.

use std::sync::Arc;
use log::{debug, error, info, warn};
use mongodb::bson::oid::ObjectId;
use uuid::Uuid;
use crate::{
    caching::{refresh_token_key, SessionCache},
    config::TokenSettings,
    domain::models::token::{AccessTokenPayload, AccessTokenState, RefreshTokenPayload, TokenPair},
    errors::AppError,
    repositories::users::UserDirectory,
    services::auth::{
        auth_code::{cache_ttl, AuthorizationCodes},
        token_codec::{JwtCodec, TokenCodecError},
    },
    utils::string_utils::mask_secret,
};

fn token_invalid() -> AppError {
    AppError::AuthenticationError("Token is invalid".to_string())
}

fn signing_failed(error: TokenCodecError) -> AppError {
    error!("토큰 서명 실패: {}", error);
    AppError::InternalError("Token signing failed".to_string())
}

/// 토큰/세션 엔진
pub struct TokenService {
    cache: Arc<dyn SessionCache>,
    directory: Arc<dyn UserDirectory>,
    codec: JwtCodec,
    codes: AuthorizationCodes,
    settings: TokenSettings,
}

impl TokenService {
    pub fn new(
        cache: Arc<dyn SessionCache>,
        directory: Arc<dyn UserDirectory>,
        settings: TokenSettings,
    ) -> Self {
        Self {
            codec: JwtCodec::new(&settings.secret, &settings.issuer),
            codes: AuthorizationCodes::new(cache.clone()),
            cache,
            directory,
            settings,
        }
    }

    pub fn settings(&self) -> &TokenSettings {
        &self.settings
    }

    /// 사용자에게 일회용 인가 코드를 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::RedisError` - 캐시 쓰기 실패
    pub async fn issue_authorization_code(&self, user_id: &ObjectId) -> Result<String, AppError> {
        self.codes.issue(user_id, self.settings.auth_code_ttl).await
    }

    /// 디렉터리에서 사용자와 프로필을 읽어 새 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 사용자 또는 프로필이 없는 경우
    /// * `AppError::RedisError` - 리프레시 토큰 저장 실패
    pub async fn issue_token_pair_by_user_id(&self, user_id: &ObjectId) -> Result<TokenPair, AppError> {
        let user = self
            .directory
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let profile = self
            .directory
            .find_profile(&user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        let uuid_key = Uuid::parse_str(&user.uuid_key).map_err(|e| {
            error!("사용자 {}의 uuid_key 손상: {}", user.id, e);
            AppError::InternalError("Error finding user".to_string())
        })?;

        let payload = AccessTokenPayload {
            uuid_key,
            email: user.email,
            nickname: profile.nickname,
            image_url: profile.image_url,
        };

        self.refresh(&payload).await
    }

    /// 인가 코드를 소비하고 토큰 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::NotFound` - 코드가 없거나 이미 사용된 경우
    /// * `AppError::ValidationError` - 코드가 가리키는 값이 사용자 ID가 아닌 경우.
    ///   위조되거나 손상된 코드로 보고 400 Bad Request로 응답합니다.
    /// * `AppError::RedisError` - 코드를 무효화하지 못한 경우
    pub async fn issue_token_pair_by_auth_code(&self, code: &str) -> Result<TokenPair, AppError> {
        let user_id = self.codes.consume(code).await?;
        self.issue_token_pair_by_user_id(&user_id).await
    }

    /// 액세스 토큰을 검증합니다.
    ///
    /// 만료된 경우에만 서명 없는 디코딩으로 페이로드를 복구하며, 복구한
    /// 페이로드도 구조 검증을 통과해야 합니다. 실패는 모두 [`AccessTokenState::Invalid`].
    pub fn verify_access_token(&self, token: &str) -> AccessTokenState {
        match self.codec.verify::<AccessTokenPayload>(token) {
            Ok(claims) => match claims.payload.ensure_valid() {
                Ok(()) => AccessTokenState::Valid(claims.payload),
                Err(_) => AccessTokenState::Invalid,
            },
            Err(TokenCodecError::Expired) => match self.codec.decode::<AccessTokenPayload>(token) {
                Some(claims) if claims.payload.ensure_valid().is_ok() => AccessTokenState::Expired(claims.payload),
                _ => AccessTokenState::Invalid,
            },
            Err(_) => AccessTokenState::Invalid,
        }
    }

    /// 리프레시 토큰이 유효하고 캐시 슬롯의 값과 정확히 일치하는지 확인합니다.
    ///
    /// 캐시 조회 실패를 포함한 모든 실패는 `false`입니다.
    pub async fn verify_refresh_token(&self, token: &str, uuid_key: &str) -> bool {
        if self.codec.verify::<RefreshTokenPayload>(token).is_err() {
            return false;
        }

        match self.cache.get(&refresh_token_key(uuid_key)).await {
            Ok(Some(stored)) => stored == token,
            Ok(None) => false,
            Err(e) => {
                warn!("리프레시 토큰 조회 실패 ({}): {}", uuid_key, e);
                false
            }
        }
    }

    /// 같은 신원으로 새 토큰 쌍을 발급하고 캐시 슬롯을 덮어씁니다.
    ///
    /// # Errors
    ///
    /// * `AppError::InvalidPayload` - 페이로드 구조 검증 실패
    /// * `AppError::RedisError` - 캐시 쓰기 실패
    pub async fn refresh(&self, payload: &AccessTokenPayload) -> Result<TokenPair, AppError> {
        payload.ensure_valid()?;

        let access_token = self
            .codec
            .sign(payload, self.settings.access_token_ttl)
            .map_err(signing_failed)?;
        let refresh_token = self
            .codec
            .sign(&RefreshTokenPayload::default(), self.settings.refresh_token_ttl)
            .map_err(signing_failed)?;

        let uuid_key = payload.uuid_key_string();
        self.cache
            .set(
                &refresh_token_key(&uuid_key),
                &refresh_token,
                cache_ttl(self.settings.refresh_token_ttl)?,
            )
            .await?;

        debug!("토큰 쌍 발급: {} (refresh {})", uuid_key, mask_secret(&refresh_token));
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// 토큰 쌍의 신원을 확인합니다. 회전은 하지 않습니다.
    ///
    /// 액세스 토큰이 유효하면 바로 통과하고, 만료된 경우 리프레시 토큰이
    /// 캐시와 일치할 때만 통과합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 그 외 모든 경우
    pub async fn verify(&self, pair: &TokenPair) -> Result<AccessTokenPayload, AppError> {
        match self.verify_access_token(&pair.access_token) {
            AccessTokenState::Valid(payload) => Ok(payload),
            AccessTokenState::Expired(payload) => {
                if self
                    .verify_refresh_token(&pair.refresh_token, &payload.uuid_key_string())
                    .await
                {
                    Ok(payload)
                } else {
                    Err(token_invalid())
                }
            }
            AccessTokenState::Invalid => Err(token_invalid()),
        }
    }

    /// 토큰 쌍을 검증하고 항상 새 쌍으로 회전합니다.
    ///
    /// 액세스 토큰이 유효하거나 만료되었더라도 서명이 맞아야 하고, 리프레시
    /// 토큰은 캐시 슬롯과 일치해야 합니다. 성공하면 이전 리프레시 토큰은 무효가 됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::AuthenticationError` - 위조된 액세스 토큰 또는 리프레시 불일치
    /// * `AppError::RedisError` - 새 리프레시 토큰 저장 실패
    pub async fn validate_or_refresh(&self, pair: &TokenPair) -> Result<TokenPair, AppError> {
        let payload = match self.verify_access_token(&pair.access_token) {
            AccessTokenState::Valid(payload) | AccessTokenState::Expired(payload) => payload,
            AccessTokenState::Invalid => return Err(token_invalid()),
        };

        if !self
            .verify_refresh_token(&pair.refresh_token, &payload.uuid_key_string())
            .await
        {
            info!("리프레시 토큰 불일치로 거부: {}", payload.uuid_key);
            return Err(token_invalid());
        }

        self.refresh(&payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures_util::future::join;
    use crate::{
        caching::{auth_code_key, memory::MemoryCache},
        domain::entities::users::{NewLocalUser, User},
        repositories::users::MemoryUserDirectory,
    };

    fn settings() -> TokenSettings {
        TokenSettings {
            secret: "test-secret".to_string(),
            issuer: "ifelfi.com".to_string(),
            access_token_ttl: 300,
            refresh_token_ttl: 3600,
            auth_code_ttl: 180,
        }
    }

    struct Fixture {
        service: TokenService,
        cache: Arc<MemoryCache>,
        directory: Arc<MemoryUserDirectory>,
        user: User,
    }

    async fn fixture_with_cache(cache: Arc<dyn SessionCache>, memory: Arc<MemoryCache>) -> Fixture {
        let directory = Arc::new(MemoryUserDirectory::new());
        let user = directory
            .create_user_tx(NewLocalUser {
                email: "a@b.com".to_string(),
                nickname: "a".to_string(),
                image_url: None,
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        Fixture {
            service: TokenService::new(cache, directory.clone(), settings()),
            cache: memory,
            directory,
            user,
        }
    }

    async fn fixture() -> Fixture {
        let cache = Arc::new(MemoryCache::new());
        fixture_with_cache(cache.clone(), cache).await
    }

    fn payload_of(fx: &Fixture) -> AccessTokenPayload {
        AccessTokenPayload {
            uuid_key: Uuid::parse_str(&fx.user.uuid_key).unwrap(),
            email: fx.user.email.clone(),
            nickname: "a".to_string(),
            image_url: None,
        }
    }

    /// 캐시에 저장된 리프레시 토큰과 만료된 액세스 토큰의 쌍
    async fn expired_pair(fx: &Fixture) -> TokenPair {
        let issued = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();
        TokenPair {
            access_token: fx.service.codec.sign(&payload_of(fx), -10).unwrap(),
            refresh_token: issued.refresh_token,
        }
    }

    /// `del`이 항상 실패하는 캐시
    struct FailingDelCache(Arc<MemoryCache>);

    #[async_trait]
    impl SessionCache for FailingDelCache {
        async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            self.0.get(key).await
        }
        async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<(), AppError> {
            self.0.set(key, value, ttl).await
        }
        async fn del(&self, _key: &str) -> Result<u64, AppError> {
            Err(AppError::RedisError("connection reset".to_string()))
        }
    }

    /// 다른 요청이 먼저 코드를 지운 것처럼 `del`이 0을 반환하는 캐시
    struct RacedDelCache(Arc<MemoryCache>);

    #[async_trait]
    impl SessionCache for RacedDelCache {
        async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
            self.0.get(key).await
        }
        async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<(), AppError> {
            self.0.set(key, value, ttl).await
        }
        async fn del(&self, _key: &str) -> Result<u64, AppError> {
            Ok(0)
        }
    }

    /// `get`이 항상 실패하는 캐시
    struct FailingGetCache(Arc<MemoryCache>);

    #[async_trait]
    impl SessionCache for FailingGetCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
            Err(AppError::RedisError("timeout".to_string()))
        }
        async fn set(&self, key: &str, value: &str, ttl: u64) -> Result<(), AppError> {
            self.0.set(key, value, ttl).await
        }
        async fn del(&self, key: &str) -> Result<u64, AppError> {
            self.0.del(key).await
        }
    }

    #[actix_web::test]
    async fn test_issued_pair_matches_user_and_cache() {
        let fx = fixture().await;

        let pair = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();

        let state = fx.service.verify_access_token(&pair.access_token);
        assert_eq!(state.payload().unwrap().uuid_key.to_string(), fx.user.uuid_key);
        assert_eq!(
            fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(),
            Some(pair.refresh_token)
        );
    }

    #[actix_web::test]
    async fn test_verify_access_token_round_trip() {
        let fx = fixture().await;
        let payload = payload_of(&fx);
        let token = fx.service.codec.sign(&payload, 60).unwrap();

        assert_eq!(fx.service.verify_access_token(&token), AccessTokenState::Valid(payload));
    }

    #[actix_web::test]
    async fn test_verify_access_token_rejections() {
        let fx = fixture().await;
        let payload = payload_of(&fx);

        let expired = fx.service.codec.sign(&payload, -10).unwrap();
        assert_eq!(fx.service.verify_access_token(&expired), AccessTokenState::Expired(payload.clone()));

        let forged = JwtCodec::new("attacker", "ifelfi.com").sign(&payload, -10).unwrap();
        assert_eq!(fx.service.verify_access_token(&forged), AccessTokenState::Invalid);

        let mut tampered = fx.service.codec.sign(&payload, 60).unwrap();
        tampered.push('x');
        assert_eq!(fx.service.verify_access_token(&tampered), AccessTokenState::Invalid);

        let mut malformed = payload.clone();
        malformed.email = "not-an-email".to_string();
        let expired_malformed = fx.service.codec.sign(&malformed, -10).unwrap();
        assert_eq!(fx.service.verify_access_token(&expired_malformed), AccessTokenState::Invalid);
        let live_malformed = fx.service.codec.sign(&malformed, 60).unwrap();
        assert_eq!(fx.service.verify_access_token(&live_malformed), AccessTokenState::Invalid);

        let refresh_as_access = fx.service.codec.sign(&RefreshTokenPayload::default(), 60).unwrap();
        assert_eq!(fx.service.verify_access_token(&refresh_as_access), AccessTokenState::Invalid);
    }

    #[actix_web::test]
    async fn test_auth_code_exchanges_once() {
        let fx = fixture().await;
        let code = fx.service.issue_authorization_code(&fx.user.id).await.unwrap();

        let pair = fx.service.issue_token_pair_by_auth_code(&code).await.unwrap();
        assert!(!pair.access_token.is_empty() && !pair.refresh_token.is_empty());

        assert!(matches!(
            fx.service.issue_token_pair_by_auth_code(&code).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_concurrent_exchange_succeeds_once() {
        let fx = fixture().await;
        let code = fx.service.issue_authorization_code(&fx.user.id).await.unwrap();

        let (first, second) = join(
            fx.service.issue_token_pair_by_auth_code(&code),
            fx.service.issue_token_pair_by_auth_code(&code),
        )
        .await;

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!([first, second].into_iter().any(|r| matches!(r, Err(AppError::NotFound(_)))));
    }

    #[actix_web::test]
    async fn test_code_consumed_by_racing_request_is_not_found() {
        let memory = Arc::new(MemoryCache::new());
        let fx = fixture_with_cache(Arc::new(RacedDelCache(memory.clone())), memory).await;
        let code = fx.service.issue_authorization_code(&fx.user.id).await.unwrap();

        assert!(matches!(
            fx.service.issue_token_pair_by_auth_code(&code).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_code_delete_failure_issues_no_tokens() {
        let memory = Arc::new(MemoryCache::new());
        let fx = fixture_with_cache(Arc::new(FailingDelCache(memory.clone())), memory).await;
        let code = fx.service.issue_authorization_code(&fx.user.id).await.unwrap();

        assert!(matches!(
            fx.service.issue_token_pair_by_auth_code(&code).await,
            Err(AppError::RedisError(_))
        ));
        assert_eq!(fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_malformed_code_value_is_invalid() {
        let fx = fixture().await;
        fx.cache.set(&auth_code_key("bad"), "12345", 60).await.unwrap();

        let result = fx.service.issue_token_pair_by_auth_code("bad").await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert_eq!(result.unwrap_err().http_status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_user_or_profile_is_not_found() {
        let fx = fixture().await;

        assert!(matches!(
            fx.service.issue_token_pair_by_user_id(&ObjectId::new()).await,
            Err(AppError::NotFound(_))
        ));

        fx.directory.remove_profile(&fx.user.id);
        assert!(matches!(
            fx.service.issue_token_pair_by_user_id(&fx.user.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn test_refresh_rejects_malformed_payload() {
        let fx = fixture().await;
        let mut payload = payload_of(&fx);
        payload.nickname = String::new();

        assert!(matches!(fx.service.refresh(&payload).await, Err(AppError::InvalidPayload(_))));
        assert_eq!(fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_refresh_revokes_previous_refresh_token() {
        let fx = fixture().await;
        let first = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();
        assert!(fx.service.verify_refresh_token(&first.refresh_token, &fx.user.uuid_key).await);

        let second = fx.service.refresh(&payload_of(&fx)).await.unwrap();

        assert!(!fx.service.verify_refresh_token(&first.refresh_token, &fx.user.uuid_key).await);
        assert!(fx.service.verify_refresh_token(&second.refresh_token, &fx.user.uuid_key).await);
    }

    #[actix_web::test]
    async fn test_verify_refresh_token_failures() {
        let fx = fixture().await;
        let pair = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();

        assert!(!fx.service.verify_refresh_token(&pair.refresh_token, &Uuid::new_v4().to_string()).await);
        assert!(!fx.service.verify_refresh_token("garbage", &fx.user.uuid_key).await);

        let expired = fx.service.codec.sign(&RefreshTokenPayload::default(), -10).unwrap();
        fx.cache
            .set(&refresh_token_key(&fx.user.uuid_key), &expired, 60)
            .await
            .unwrap();
        assert!(!fx.service.verify_refresh_token(&expired, &fx.user.uuid_key).await);
    }

    #[actix_web::test]
    async fn test_verify_refresh_token_cache_failure_is_false() {
        let memory = Arc::new(MemoryCache::new());
        let fx = fixture_with_cache(Arc::new(FailingGetCache(memory.clone())), memory).await;
        let pair = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();

        assert!(!fx.service.verify_refresh_token(&pair.refresh_token, &fx.user.uuid_key).await);
    }

    #[actix_web::test]
    async fn test_validate_or_refresh_rotates_expired_pair() {
        let fx = fixture().await;
        let pair = expired_pair(&fx).await;

        let rotated = fx.service.validate_or_refresh(&pair).await.unwrap();

        assert_ne!(rotated.access_token, pair.access_token);
        assert_ne!(rotated.refresh_token, pair.refresh_token);
        assert!(fx.service.verify_access_token(&rotated.access_token).is_valid());
        assert!(!fx.service.verify_refresh_token(&pair.refresh_token, &fx.user.uuid_key).await);
        assert!(matches!(
            fx.service.validate_or_refresh(&pair).await,
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_validate_or_refresh_rejects_unknown_refresh_token() {
        let fx = fixture().await;
        let mut pair = expired_pair(&fx).await;
        pair.refresh_token = fx.service.codec.sign(&RefreshTokenPayload::default(), 3600).unwrap();

        assert!(matches!(
            fx.service.validate_or_refresh(&pair).await,
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_validate_or_refresh_rotates_valid_pair() {
        let fx = fixture().await;
        let pair = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();

        let rotated = fx.service.validate_or_refresh(&pair).await.unwrap();

        assert_ne!(rotated.refresh_token, pair.refresh_token);
        assert!(!fx.service.verify_refresh_token(&pair.refresh_token, &fx.user.uuid_key).await);
    }

    #[actix_web::test]
    async fn test_validate_or_refresh_rejects_forged_access_token() {
        let fx = fixture().await;
        let issued = fx.service.issue_token_pair_by_user_id(&fx.user.id).await.unwrap();
        let pair = TokenPair {
            access_token: JwtCodec::new("attacker", "ifelfi.com").sign(&payload_of(&fx), 60).unwrap(),
            refresh_token: issued.refresh_token.clone(),
        };

        assert!(matches!(
            fx.service.validate_or_refresh(&pair).await,
            Err(AppError::AuthenticationError(_))
        ));
        assert_eq!(
            fx.cache.get(&refresh_token_key(&fx.user.uuid_key)).await.unwrap(),
            Some(issued.refresh_token)
        );
    }

    #[actix_web::test]
    async fn test_verify_does_not_rotate() {
        let fx = fixture().await;
        let pair = expired_pair(&fx).await;

        let payload = fx.service.verify(&pair).await.unwrap();

        assert_eq!(payload.uuid_key.to_string(), fx.user.uuid_key);
        assert!(fx.service.verify_refresh_token(&pair.refresh_token, &fx.user.uuid_key).await);

        let mismatched = TokenPair {
            access_token: pair.access_token.clone(),
            refresh_token: fx.service.codec.sign(&RefreshTokenPayload::default(), 60).unwrap(),
        };
        assert!(matches!(fx.service.verify(&mismatched).await, Err(AppError::AuthenticationError(_))));
    }
}
