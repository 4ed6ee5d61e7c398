use shared::{Email, ProfileData, Result, ServiceError, User, UserId, Username};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::repository::metrics_repo;

/// A user row together with its stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the user and its zeroed metrics row in one transaction.
    pub async fn create_user(
        &self,
        username: &Username,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<User> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, name, created_at
            "#,
        )
        .bind(username.as_str())
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, username, email))?;

        let user = user_from_row(&row)?;

        metrics_repo::init_metrics(&mut *tx, &user.id).await?;

        tx.commit().await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, user_id: &UserId) -> Result<User> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))?;

        user_from_row(&row)
    }

    pub async fn get_by_email(&self, email: &Email) -> Result<User> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, name, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(email.to_string()))?;

        user_from_row(&row)
    }

    pub async fn get_credentials_by_username(&self, username: &str) -> Result<UserCredentials> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, name, created_at, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(username.to_string()))?;

        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.get("password_hash"),
        })
    }

    pub async fn get_credentials_by_id(&self, user_id: &UserId) -> Result<UserCredentials> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, name, created_at, password_hash
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))?;

        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.get("password_hash"),
        })
    }

    pub async fn update_password(&self, user_id: &UserId, password_hash: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(password_hash)
        .bind(user_id.0)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::UserNotFound(user_id.to_string()));
        }

        Ok(())
    }

    pub async fn get_profile(&self, user_id: &UserId) -> Result<ProfileData> {
        let row = sqlx::query(
            r#"
            SELECT
                u.username,
                u.email,
                u.name,
                u.created_at,
                COALESCE(um.total_games_played, 0) AS total_games_played,
                COALESCE(um.total_attempts, 0) AS total_attempts,
                COALESCE(um.successful_attempts, 0) AS successful_attempts,
                COALESCE(
                    ROUND(um.successful_attempts::NUMERIC * 100 / NULLIF(um.total_attempts, 0), 2),
                    0
                )::FLOAT8 AS average_accuracy,
                COALESCE(um.best_score, 0) AS highest_score,
                COALESCE(um.current_level, 1) AS current_level,
                COALESCE(um.experience_points, 0) AS experience_points,
                COALESCE(um.total_time_spent_seconds, 0) AS total_time_spent_seconds
            FROM users u
            LEFT JOIN user_metrics um ON um.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))?;

        Ok(ProfileData {
            username: Username::new(row.get::<String, _>("username"))?,
            email: Email::new(row.get::<String, _>("email"))?,
            name: row.get("name"),
            created_at: row.get("created_at"),
            total_games_played: row.get("total_games_played"),
            total_attempts: row.get("total_attempts"),
            successful_attempts: row.get("successful_attempts"),
            average_accuracy: row.get("average_accuracy"),
            highest_score: row.get("highest_score"),
            current_level: row.get("current_level"),
            experience_points: row.get("experience_points"),
            total_time_spent_seconds: row.get("total_time_spent_seconds"),
        })
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    Ok(User {
        id: UserId(row.get("id")),
        username: Username::new(row.get::<String, _>("username"))?,
        email: Email::new(row.get::<String, _>("email"))?,
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

fn map_unique_violation(err: sqlx::Error, username: &Username, email: &Email) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => {
                    ServiceError::UserAlreadyExists(format!("Email {} is already registered", email))
                }
                _ => ServiceError::UserAlreadyExists(format!(
                    "Username {} is already registered",
                    username
                )),
            };
        }
    }
    ServiceError::Database(err.to_string())
}
