use serde::Serialize;
use shared::{AuthConfig, Email, Result, ServiceError, User, UserId, Username};

use crate::repository::{TokenRepository, UserRepository};
use crate::service::auth::{
    create_access_token, hash_password, hash_token, validate_access_token, validate_password,
    verify_password,
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, token_repo: TokenRepository, config: AuthConfig) -> Self {
        Self {
            user_repo,
            token_repo,
            config,
        }
    }

    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        email: &str,
        name: &str,
    ) -> Result<AuthToken> {
        let username = Username::new(username)?;
        let email = Email::new(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        let user = self
            .user_repo
            .create_user(&username, &email, name.trim(), &password_hash)
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered successfully"
        );
        shared::record_counter("doodle_signups_total", 1);

        self.issue_token(user)
    }

    /// Unknown users and wrong passwords get the same answer.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthToken> {
        let credentials = match self.user_repo.get_credentials_by_username(username).await {
            Ok(credentials) => credentials,
            Err(ServiceError::UserNotFound(_)) => {
                return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()))
            }
            Err(e) => return Err(e),
        };

        if !verify_password(password, &credentials.password_hash)? {
            tracing::warn!(user_id = %credentials.user.id, "Login rejected: bad password");
            return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
        }

        tracing::info!(user_id = %credentials.user.id, "User logged in");

        self.issue_token(credentials.user)
    }

    /// Resolve a bearer token to its user.
    pub async fn current_user(&self, token: &str) -> Result<User> {
        if self.token_repo.is_blacklisted(&hash_token(token)).await? {
            return Err(ServiceError::Unauthorized(
                "Token has been invalidated".to_string(),
            ));
        }

        let claims = validate_access_token(token, &self.config.secret_key)?;
        let user_id = claims.user_id()?;

        match self.user_repo.get_by_id(&user_id).await {
            Err(ServiceError::UserNotFound(_)) => {
                Err(ServiceError::Unauthorized("User no longer exists".to_string()))
            }
            other => other,
        }
    }

    /// Denylist the token until it would have expired on its own.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let user = self.current_user(token).await?;
        let claims = validate_access_token(token, &self.config.secret_key)?;

        self.token_repo
            .blacklist(&hash_token(token), claims.expires_at())
            .await?;
        let purged = self.token_repo.purge_expired().await?;

        tracing::info!(user_id = %user.id, purged = purged, "User logged out");

        Ok(())
    }

    /// Acknowledge a reset request for a known email. No mail is sent.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let email = Email::new(email)?;
        let user = self.user_repo.get_by_email(&email).await?;

        tracing::info!(user_id = %user.id, "Password reset requested");

        Ok(())
    }

    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let credentials = self.user_repo.get_credentials_by_id(user_id).await?;

        if !verify_password(current_password, &credentials.password_hash)? {
            return Err(ServiceError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }
        validate_password(new_password)?;

        let password_hash = hash_password(new_password)?;
        self.user_repo.update_password(user_id, &password_hash).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(())
    }

    fn issue_token(&self, user: User) -> Result<AuthToken> {
        let access_token =
            create_access_token(&user.id, &self.config.secret_key, self.config.token_ttl_minutes)?;

        Ok(AuthToken {
            access_token,
            token_type: "bearer",
            user,
        })
    }
}
