use std::{env, time::Duration};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: SecretString,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub webhook_url: String,
    pub webhook_timeout_secs: u64,
    pub activation_interval_secs: u64,
    pub activation_concurrency: usize,
    /// Actor stamped on audit fields when a request names none.
    pub system_actor: String,
    /// Actor stamped on quizzes flipped by the activation sweep.
    pub scheduler_actor: String,
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: SecretString::from(
                env::var("MONGO_CONN_STRING")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "quiz-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: parsed_or("WEB_SERVER_PORT", 8080),
            webhook_url: env::var("WEBHOOK_URL").unwrap_or_else(|_| {
                "http://localhost:8080/api/webhooks/quiz-activation".to_string()
            }),
            webhook_timeout_secs: parsed_or("WEBHOOK_TIMEOUT_SECS", 5),
            activation_interval_secs: parsed_or("ACTIVATION_INTERVAL_SECS", 60),
            activation_concurrency: parsed_or("ACTIVATION_CONCURRENCY", 8),
            system_actor: env::var("SYSTEM_ACTOR").unwrap_or_else(|_| "SYSTEM".to_string()),
            scheduler_actor: env::var("SCHEDULER_ACTOR")
                .unwrap_or_else(|_| "SCHEDULER".to_string()),
        }
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }

    pub fn activation_interval(&self) -> Duration {
        Duration::from_secs(self.activation_interval_secs)
    }

    /// Rejects settings that would stall or disable the activation sweep.
    pub fn validate(&self) -> AppResult<()> {
        if self.activation_interval_secs == 0 {
            return Err(AppError::ValidationError(
                "ACTIVATION_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if self.webhook_timeout_secs == 0 {
            return Err(AppError::ValidationError(
                "WEBHOOK_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        if self.activation_concurrency == 0 {
            return Err(AppError::ValidationError(
                "ACTIVATION_CONCURRENCY must be greater than zero".to_string(),
            ));
        }
        reqwest::Url::parse(&self.webhook_url).map_err(|e| {
            AppError::ValidationError(format!("WEBHOOK_URL '{}' is invalid: {}", self.webhook_url, e))
        })?;
        if self.system_actor.trim().is_empty() || self.scheduler_actor.trim().is_empty() {
            return Err(AppError::ValidationError(
                "SYSTEM_ACTOR and SCHEDULER_ACTOR cannot be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: SecretString::from("mongodb://localhost:27017".to_string()),
            mongo_db_name: "quiz-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            webhook_url: "http://127.0.0.1:9/api/webhooks/quiz-activation".to_string(),
            webhook_timeout_secs: 1,
            activation_interval_secs: 60,
            activation_concurrency: 4,
            system_actor: "SYSTEM".to_string(),
            scheduler_actor: "SCHEDULER".to_string(),
        }
    }
}
