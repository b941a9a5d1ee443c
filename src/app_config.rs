// Centralized configuration management for the Learnify backend
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Access the global config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_connect_timeout: u64,
    pub database_idle_timeout: u64,
    pub database_max_lifetime: u64,

    // Nested sections
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub email: EmailConfig,
    pub gateway: GatewayConfig,
    pub reminders: ReminderConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// JWT configuration, one signing secret per principal role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub student_secret: String,
    pub instructor_secret: String,
    pub admin_secret: String,
    pub expiry_seconds: u64,
    pub issuer: String,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
    pub rate_limit_per_second: u32,
    pub rate_limit_burst: u32,
    pub cors_allowed_origins: Vec<String>,
    pub otp_ttl_seconds: u64,
    pub reset_token_ttl_seconds: u64,
}

/// Email configuration (Resend-compatible JSON API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    pub api_url: String,
    pub from_email: String,
    pub from_name: String,
    pub support_email: String,
    pub frontend_url: String,
}

/// Payment gateway configuration (Razorpay-style order API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_url: String,
}

/// EMI reminder task configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub interval_seconds: u64,
    pub due_window_days: i64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get required env var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
        };

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to parse env var with default
        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let environment_str = get_or_default("ENVIRONMENT", "development");
        let environment = Environment::from(environment_str);

        let database_url = get_required("DATABASE_URL")?;
        let database_max_connections = parse_or_default("DATABASE_MAX_CONNECTIONS", "50")?;
        let database_min_connections = parse_or_default("DATABASE_MIN_CONNECTIONS", "5")?;
        let database_connect_timeout = parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "30")?;
        let database_idle_timeout = parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?;
        let database_max_lifetime = parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?;

        // JWT secrets, one per role
        let jwt_student_secret = get_required("JWT_SECRET")?;
        let jwt_instructor_secret = get_required("JWT_SECRET_INSTRUCTOR")?;
        let jwt_admin_secret = get_required("JWT_SECRET_ADMIN")?;
        for (key, secret) in [
            ("JWT_SECRET", &jwt_student_secret),
            ("JWT_SECRET_INSTRUCTOR", &jwt_instructor_secret),
            ("JWT_SECRET_ADMIN", &jwt_admin_secret),
        ] {
            if secret.len() < 32 {
                return Err(ConfigError::InvalidValue(
                    key.to_string(),
                    "Secret must be at least 32 characters long".to_string(),
                ));
            }
        }
        let jwt_expiry_seconds = parse_u64_or_default("JWT_EXPIRY_SECONDS", "86400")?;
        let jwt_issuer = get_or_default("JWT_ISSUER", "learnify");

        let bcrypt_cost = parse_or_default("BCRYPT_COST", "10")?;
        let rate_limit_per_second = parse_or_default("RATE_LIMIT_PER_SECOND", "100")?;
        let rate_limit_burst = parse_or_default("RATE_LIMIT_BURST", "200")?;
        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
        let otp_ttl_seconds = parse_u64_or_default("OTP_TTL_SECONDS", "600")?;
        let reset_token_ttl_seconds = parse_u64_or_default("RESET_TOKEN_TTL_SECONDS", "900")?;

        // Gateway credentials are required in production only, so dev/test can
        // run against the sandbox defaults
        let (gateway_key_id, gateway_key_secret) = if environment == Environment::Production {
            (get_required("GATEWAY_KEY_ID")?, get_required("GATEWAY_KEY_SECRET")?)
        } else {
            (
                get_or_default("GATEWAY_KEY_ID", "rzp_test_key"),
                get_or_default("GATEWAY_KEY_SECRET", "rzp_test_secret"),
            )
        };
        let gateway_api_url = get_or_default("GATEWAY_API_URL", "https://api.razorpay.com/v1");

        let email_api_key = if environment == Environment::Production {
            get_required("EMAIL_API_KEY")?
        } else {
            get_or_default("EMAIL_API_KEY", "re_test_key")
        };
        let email_api_url = get_or_default("EMAIL_API_URL", "https://api.resend.com/emails");
        let from_email = get_or_default("EMAIL_FROM", "noreply@learnify.example");
        let from_name = get_or_default("EMAIL_FROM_NAME", "Learnify");
        let support_email = get_or_default("EMAIL_SUPPORT", "support@learnify.example");
        let frontend_url = get_or_default("FRONTEND_URL", "http://localhost:3000");

        let reminder_interval_seconds =
            parse_u64_or_default("EMI_REMINDER_INTERVAL_SECONDS", "86400")?;
        let reminder_due_window_days = parse_u64_or_default("EMI_REMINDER_WINDOW_DAYS", "2")? as i64;

        let rust_log = get_or_default("RUST_LOG", "info");

        let server = ServerConfig {
            bind_address: bind_address.clone(),
            port,
            environment: environment.clone(),
            rust_log: rust_log.clone(),
        };

        let jwt = JwtConfig {
            student_secret: jwt_student_secret,
            instructor_secret: jwt_instructor_secret,
            admin_secret: jwt_admin_secret,
            expiry_seconds: jwt_expiry_seconds,
            issuer: jwt_issuer,
        };

        let security = SecurityConfig {
            bcrypt_cost,
            rate_limit_per_second,
            rate_limit_burst,
            cors_allowed_origins,
            otp_ttl_seconds,
            reset_token_ttl_seconds,
        };

        let email = EmailConfig {
            api_key: email_api_key,
            api_url: email_api_url,
            from_email,
            from_name,
            support_email,
            frontend_url,
        };

        let gateway = GatewayConfig {
            key_id: gateway_key_id,
            key_secret: gateway_key_secret,
            api_url: gateway_api_url,
        };

        let reminders = ReminderConfig {
            interval_seconds: reminder_interval_seconds,
            due_window_days: reminder_due_window_days,
        };

        Ok(AppConfig {
            bind_address,
            port,
            environment,
            rust_log,
            database_url,
            database_max_connections,
            database_min_connections,
            database_connect_timeout,
            database_idle_timeout,
            database_max_lifetime,
            server,
            jwt,
            security,
            email,
            gateway,
            reminders,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from("production".to_string()),
            Environment::Production
        );
        assert_eq!(Environment::from("dev".to_string()), Environment::Development);
        assert_eq!(
            Environment::from("unknown".to_string()),
            Environment::Development
        );
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Staging.to_string(), "staging");
        assert_eq!(Environment::Test.to_string(), "test");
    }
}
