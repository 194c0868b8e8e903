//! Authentication service - registration, login, logout and token checks.
//!
//! Tokens are HS256 JWTs carrying the user id, a random `jti` and the admin
//! flag. Logout revokes the `jti`; verification rejects revoked identifiers
//! even while the signature and expiry are still valid.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_DAY, TOKEN_TYPE_BEARER};
use crate::domain::password::DUMMY_HASH;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::{TokenRevocationStore, UnitOfWork};
use crate::with_transaction;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i32,
    /// Token identifier, the unit of revocation
    pub jti: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 2592000)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. The first user ever registered becomes admin.
    async fn register(&self, username: String, password: String) -> AppResult<User>;

    /// Check credentials and issue an access token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Revoke the token identified by `jti`
    async fn logout(&self, jti: String) -> AppResult<()>;

    /// Verify signature, expiry and revocation, returning the claims
    async fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

fn issue_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.jwt_expiration_days);

    let claims = Claims {
        sub: user.id,
        jti: Uuid::new_v4().to_string(),
        is_admin: user.is_admin,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_days * SECONDS_PER_DAY,
    })
}

fn decode_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    revocations: Arc<dyn TokenRevocationStore>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, revocations: Arc<dyn TokenRevocationStore>, config: Config) -> Self {
        Self {
            uow,
            revocations,
            config,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, username: String, password: String) -> AppResult<User> {
        let password_hash = Password::new(&password)?.into_string();

        let user = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let is_admin = users.count().await? == 0;
            users.create(username, password_hash, is_admin).await
        })?;

        tracing::info!(user_id = user.id, is_admin = user.is_admin, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_username(&username).await?;

        // Verify against a dummy hash for unknown users so both failure paths
        // take the same time.
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.as_str())
                .unwrap_or(DUMMY_HASH),
        );
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::debug!(user_id = user.id, "Login succeeded");
                issue_token(&user, &self.config)
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    async fn logout(&self, jti: String) -> AppResult<()> {
        self.revocations.add(jti).await
    }

    async fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let claims = decode_token(token, &self.config)?;

        if self.revocations.contains(&claims.jti).await? {
            return Err(AppError::TokenRevoked);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryRevocationStore, MockTokenRevocationStore, MockUserRepository};
    use crate::services::test_support::TestUnitOfWork;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    fn config() -> Config {
        Config::new("sqlite::memory:", SECRET)
    }

    fn user(id: i32, password: &str) -> User {
        User {
            id,
            username: format!("user{}", id),
            password_hash: Password::new(password).unwrap().into_string(),
            is_admin: id == 1,
            created_at: Utc::now(),
        }
    }

    fn authenticator(users: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork::builder().users(users).build();
        Authenticator::new(
            Arc::new(uow),
            Arc::new(InMemoryRevocationStore::new()),
            config(),
        )
    }

    fn encode_claims(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(1, "password123"))));
        let auth = authenticator(users);

        let token = auth
            .login("user1".to_string(), "password123".to_string())
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 30 * SECONDS_PER_DAY);

        let claims = auth.verify_token(&token.access_token).await.unwrap();
        assert_eq!(claims.sub, 1);
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 30 * SECONDS_PER_DAY);
    }

    #[tokio::test]
    async fn test_tokens_get_distinct_identifiers() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(2, "password123"))));
        let auth = authenticator(users);

        let first = auth.login("user2".into(), "password123".into()).await.unwrap();
        let second = auth.login("user2".into(), "password123".into()).await.unwrap();

        let first = auth.verify_token(&first.access_token).await.unwrap();
        let second = auth.verify_token(&second.access_token).await.unwrap();
        assert_ne!(first.jti, second.jti);
        assert!(!first.is_admin);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(2, "password123"))));
        let auth = authenticator(users);

        let result = auth.login("user2".into(), "not-the-password".into()).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        let auth = authenticator(users);

        let result = auth.login("ghost".into(), "password123".into()).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_revoked_token_rejected_on_every_call() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(3, "password123"))));
        let auth = authenticator(users);

        let token = auth.login("user3".into(), "password123".into()).await.unwrap();
        let claims = auth.verify_token(&token.access_token).await.unwrap();

        auth.logout(claims.jti).await.unwrap();

        for _ in 0..3 {
            let result = auth.verify_token(&token.access_token).await;
            assert!(matches!(result, Err(AppError::TokenRevoked)));
        }
    }

    #[tokio::test]
    async fn test_expired_token() {
        let auth = authenticator(MockUserRepository::new());
        let now = Utc::now().timestamp();
        let token = encode_claims(
            &Claims {
                sub: 1,
                jti: "expired".to_string(),
                is_admin: false,
                exp: now - 3600,
                iat: now - 7200,
            },
            SECRET,
        );

        let result = auth.verify_token(&token).await;
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret() {
        let auth = authenticator(MockUserRepository::new());
        let now = Utc::now().timestamp();
        let token = encode_claims(
            &Claims {
                sub: 1,
                jti: "forged".to_string(),
                is_admin: true,
                exp: now + 3600,
                iat: now,
            },
            "another-secret-key-that-is-32-chars-long",
        );

        let result = auth.verify_token(&token).await;
        assert!(matches!(result, Err(AppError::TokenInvalid)));

        let garbage = auth.verify_token("not-a-jwt").await;
        assert!(matches!(garbage, Err(AppError::TokenInvalid)));
    }

    #[tokio::test]
    async fn test_revocation_lookup_uses_token_identifier() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .returning(|_| Ok(Some(user(4, "password123"))));
        let mut revocations = MockTokenRevocationStore::new();
        revocations
            .expect_contains()
            .withf(|jti| Uuid::parse_str(jti).is_ok())
            .times(1)
            .returning(|_| Err(AppError::internal("revocation store unavailable")));

        let auth = Authenticator::new(
            Arc::new(TestUnitOfWork::builder().users(users).build()),
            Arc::new(revocations),
            config(),
        );
        let token = auth.login("user4".into(), "password123".into()).await.unwrap();

        let result = auth.verify_token(&token.access_token).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_before_storage() {
        let auth = authenticator(MockUserRepository::new());

        let result = auth.register("dave".into(), "short".into()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
