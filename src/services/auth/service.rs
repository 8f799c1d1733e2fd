use chrono::Duration;
use sqlx::SqliteConnection;
use tracing::{error, info, warn};

use crate::error::AppError;
use crate::repos::{error::RepoError, user_repo};
use crate::services::auth::{
    jwt::{TokenCodec, TokenError},
    password::PasswordHasher,
};

/// Service-level return type to keep handlers thin.
#[derive(Clone, Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Signup and login: credential storage/verification plus token minting.
#[derive(Clone, Debug)]
pub struct AuthService {
    hasher: PasswordHasher,
    tokens: TokenCodec,
    access_token_ttl_seconds: u64,
    // Verified against on unknown emails so both login failures cost one argon2 run.
    dummy_digest: String,
}

impl AuthService {
    pub fn new(
        hasher: PasswordHasher,
        tokens: TokenCodec,
        access_token_ttl_seconds: u64,
    ) -> Result<Self, AppError> {
        let dummy_digest = hasher.hash("unused-login-placeholder")?;
        Ok(Self {
            hasher,
            tokens,
            access_token_ttl_seconds,
            dummy_digest,
        })
    }

    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    pub fn access_token_ttl_seconds(&self) -> u64 {
        self.access_token_ttl_seconds
    }

    /// Register a new user. Fails with `EmailTaken` on an exact duplicate email.
    pub async fn signup(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
        password: &str,
    ) -> Result<i64, AppError> {
        if user_repo::find_by_email(conn, email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = self.hash_blocking(password).await?;

        // A concurrent signup can still win the race; the UNIQUE constraint decides.
        let user_id = match user_repo::create(conn, email, &password_hash).await {
            Ok(id) => id,
            Err(RepoError::Conflict) => return Err(AppError::EmailTaken),
            Err(e) => return Err(e.into()),
        };

        info!(user_id, "user registered");
        Ok(user_id)
    }

    /// Verify credentials and mint an access token.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub async fn login(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken, AppError> {
        let Some(user) = user_repo::find_by_email(conn, email).await? else {
            self.verify_blocking(password, &self.dummy_digest).await?;
            warn!("login rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_blocking(password, &user.password_hash).await? {
            warn!(user_id = user.id, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.issue_access_token(&user.email, user.id)?;

        info!(user_id = user.id, "access token issued");
        Ok(IssuedToken {
            access_token,
            token_type: "bearer",
            expires_in: self.access_token_ttl_seconds,
        })
    }

    fn issue_access_token(&self, email: &str, user_id: i64) -> Result<String, AppError> {
        let token = i64::try_from(self.access_token_ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(TokenError::ExpiryOutOfRange)
            .and_then(|ttl| self.tokens.encode(email, user_id, ttl));

        token.map_err(|e| {
            error!(user_id, error = %e, "failed to issue access token");
            AppError::TokenIssuance
        })
    }

    // argon2 is CPU-bound; keep it off the async workers.
    async fn hash_blocking(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "password hashing task failed");
                AppError::Internal
            })?
    }

    async fn verify_blocking(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let digest = digest.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| {
                error!(error = %e, "password verification task failed");
                AppError::Internal
            })
    }
}
