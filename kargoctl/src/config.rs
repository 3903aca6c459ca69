//! Configuration loading.
//!
//! Settings come from a YAML file merged with `KARGOCTL_`-prefixed
//! environment variables (nested keys separated by `__`, e.g.
//! `KARGOCTL_AUTH__SESSION__COOKIE_NAME`). `DATABASE_URL` is also honoured
//! for compatibility with common deployment tooling.

use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cargo tracking panel backend")]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short = 'f', long = "config", env = "KARGOCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate the configuration and exit without serving
    #[arg(long, default_value_t = false)]
    pub validate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub host: String,
    pub port: u16,

    pub database: DatabaseConfig,

    /// HMAC secret for session tokens. Must be set in production; login
    /// fails with a server error when it is missing.
    pub secret_key: Option<String>,

    /// Credentials for the admin account seeded at startup.
    pub admin_username: String,
    pub admin_password: String,

    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            database: DatabaseConfig::default(),
            secret_key: None,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            auth: AuthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DatabaseConfig {
    /// SQLite connection string. The file is created if it does not exist.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://kargoctl.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AuthConfig {
    pub session: SessionConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SessionConfig {
    /// Base cookie name. Tab-scoped sessions append `-<tabId>`.
    pub cookie_name: String,

    /// Session lifetime, e.g. "7days".
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "auth-token".to_string(),
            timeout: Duration::from_secs(7 * 24 * 60 * 60),
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            allow_credentials: true,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("KARGOCTL_").split("__"));

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            figment = figment.merge(("database.url", database_url));
        }

        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.auth.session.cookie_name, "auth-token");
        assert_eq!(
            config.auth.session.timeout,
            Duration::from_secs(7 * 24 * 60 * 60)
        );
    }

    #[test]
    fn env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 8080
                secret_key: from-yaml
                "#,
            )?;
            jail.set_env("KARGOCTL_SECRET_KEY", "from-env");
            jail.set_env("KARGOCTL_AUTH__SESSION__COOKIE_NAME", "panel-session");

            let args = Args {
                config: "config.yaml".to_string(),
                validate: false,
            };
            let config = Config::load(&args).expect("config should load");

            assert_eq!(config.port, 8080);
            assert_eq!(config.secret_key.as_deref(), Some("from-env"));
            assert_eq!(config.auth.session.cookie_name, "panel-session");
            Ok(())
        });
    }
}
