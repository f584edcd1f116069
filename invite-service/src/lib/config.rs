use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub invitation: InvitationConfig,
    pub rate_limit: RateLimitSettings,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub key_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
}

/// Which backend holds invitation tokens.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    /// Process-local; tokens do not survive a restart.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InvitationConfig {
    pub ttl_hours: i64,
    pub store: StoreBackend,
}

impl InvitationConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub deadline_ms: u64,
    /// Accounts registered with one of these emails get the admin role.
    #[serde(default)]
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("redis.key_prefix", "invitation_token:")?
            .set_default("invitation.ttl_hours", 24)?
            .set_default("invitation.store", "redis")?
            .set_default("jwt.access_token_expiry_secs", 15 * 60)?
            .set_default("jwt.refresh_token_expiry_secs", 7 * 24 * 60 * 60)?
            .set_default("rate_limit.max_requests", 30)?
            .set_default("rate_limit.window_secs", 60)?
            .set_default("auth.deadline_ms", 5000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("auth.admin_emails")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.invitation.ttl_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "invitation.ttl_hours must be positive, got {}",
                self.invitation.ttl_hours
            )));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Message(
                "rate_limit.window_secs must be positive".to_string(),
            ));
        }
        if self.auth.deadline_ms == 0 {
            return Err(ConfigError::Message(
                "auth.deadline_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_overrides_files() {
        env::set_var("JWT__SECRET", "secret-from-environment-at-least-32-bytes");
        env::set_var("AUTH__ADMIN_EMAILS", "root@example.com,ops@example.com");

        let config = Config::load().expect("Failed to load configuration");

        env::remove_var("JWT__SECRET");
        env::remove_var("AUTH__ADMIN_EMAILS");

        assert_eq!(config.jwt.secret, "secret-from-environment-at-least-32-bytes");
        assert_eq!(
            config.auth.admin_emails,
            vec!["root@example.com".to_string(), "ops@example.com".to_string()]
        );
        assert_eq!(config.invitation.ttl_hours, 24);
    }

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/invitations".to_string(),
            },
            redis: RedisConfig {
                url: "redis://127.0.0.1:6379".to_string(),
                key_prefix: "invitation_token:".to_string(),
            },
            server: ServerConfig { http_port: 8080 },
            jwt: JwtConfig {
                secret: "secret".to_string(),
                access_token_expiry_secs: 900,
                refresh_token_expiry_secs: 604800,
            },
            invitation: InvitationConfig {
                ttl_hours: 24,
                store: StoreBackend::Memory,
            },
            rate_limit: RateLimitSettings {
                max_requests: 30,
                window_secs: 60,
            },
            auth: AuthConfig {
                deadline_ms: 5000,
                admin_emails: Vec::new(),
            },
        }
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        assert!(valid_config().validate().is_ok());

        for ttl_hours in [0, -1] {
            let mut config = valid_config();
            config.invitation.ttl_hours = ttl_hours;
            assert!(matches!(config.validate(), Err(ConfigError::Message(_))));
        }
    }

    #[test]
    fn test_validate_rejects_zero_window_and_deadline() {
        let mut config = valid_config();
        config.rate_limit.window_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.deadline_ms = 0;
        assert!(config.validate().is_err());
    }
}
