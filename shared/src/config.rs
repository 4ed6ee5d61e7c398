use std::env;

use crate::errors::{Result, ServiceError};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ServiceError::Internal("DATABASE_URL not set".to_string()))?,
            max_connections: env::var("MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid MAX_CONNECTIONS: {}", e)))?,
            min_connections: env::var("MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid MIN_CONNECTIONS: {}", e)))?,
            acquire_timeout_secs: env::var("DB_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| {
                    ServiceError::Internal(format!("Invalid DB_ACQUIRE_TIMEOUT_SECS: {}", e))
                })?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub metrics_port: u16,
    pub run_migrations: bool,
    pub leaderboard_size: i64,
}

impl ServiceConfig {
    pub fn from_env(default_port: u16) -> Result<Self> {
        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| default_port.to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid PORT: {}", e)))?,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9092".to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid METRICS_PORT: {}", e)))?,
            run_migrations: env::var("RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid RUN_MIGRATIONS: {}", e)))?,
            leaderboard_size: env::var("LEADERBOARD_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|e| ServiceError::Internal(format!("Invalid LEADERBOARD_SIZE: {}", e)))?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub token_ttl_minutes: i64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            secret_key: env::var("SECRET_KEY")
                .map_err(|_| ServiceError::Internal("SECRET_KEY not set".to_string()))?,
            token_ttl_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|e| {
                    ServiceError::Internal(format!("Invalid ACCESS_TOKEN_EXPIRE_MINUTES: {}", e))
                })?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl RecognitionConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env::var("GEMINI_API_KEY")
                .map_err(|_| ServiceError::Internal("GEMINI_API_KEY not set".to_string()))?,
            model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            endpoint: env::var("GEMINI_ENDPOINT")
                .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string()),
            timeout_secs: env::var("RECOGNITION_TIMEOUT_SECS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .map_err(|e| {
                    ServiceError::Internal(format!("Invalid RECOGNITION_TIMEOUT_SECS: {}", e))
                })?,
        })
    }
}
