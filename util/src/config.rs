//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    /// Lifetime of a freshly issued QR token when the caller does not ask for one.
    pub qr_expiry_minutes: i64,
    /// Upper bound a teacher may request for a single QR token.
    pub max_qr_expiry_minutes: i64,
    /// Grace period after a session starts during which check-ins count as present.
    pub late_threshold_minutes: i32,
}

/// Signing secret used when `JWT_SECRET` is unset outside production.
pub const DEV_JWT_SECRET: &str = "dev-only-jwt-secret";

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

/// Reads `key` and parses it, falling back to `default` when unset or malformed.
fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring malformed config value");
                default
            }
        },
        Err(_) => default,
    }
}

/// Whether `env` may run with the built-in development secret.
fn allows_dev_secret(env: &str) -> bool {
    matches!(env, "development" | "test")
}

/// The configured secret, or [`DEV_JWT_SECRET`] in development and test.
/// Empty when unset elsewhere; [`AppConfig::check`] then refuses to start.
fn jwt_secret_for(env: &str, configured: Option<String>) -> String {
    match configured.filter(|s| !s.trim().is_empty()) {
        Some(secret) => secret,
        None if allows_dev_secret(env) => DEV_JWT_SECRET.into(),
        None => String::new(),
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a development default so the binaries and the test suite
    /// can start without a populated environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        Self {
            jwt_secret: jwt_secret_for(&app_env, env::var("JWT_SECRET").ok()),
            env: app_env,
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "qr-attendance".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "data/attendance.db".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: parsed_or("PORT", 3000),
            jwt_duration_minutes: parsed_or("JWT_DURATION_MINUTES", 60),
            qr_expiry_minutes: parsed_or("QR_EXPIRY_MINUTES", 5),
            max_qr_expiry_minutes: parsed_or("MAX_QR_EXPIRY_MINUTES", 240),
            late_threshold_minutes: parsed_or("LATE_THRESHOLD_MINUTES", 15),
        }
    }

    /// Rejects configurations the server must not start with.
    pub fn check(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err(format!("JWT_SECRET is required when APP_ENV is '{}'", self.env));
        }
        Ok(())
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_host(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.host = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_jwt_duration_minutes(value: impl Into<u64>) {
        AppConfig::set_field(|cfg| cfg.jwt_duration_minutes = value.into());
    }

    pub fn set_qr_expiry_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.qr_expiry_minutes = value);
    }

    pub fn set_max_qr_expiry_minutes(value: i64) {
        AppConfig::set_field(|cfg| cfg.max_qr_expiry_minutes = value);
    }

    pub fn set_late_threshold_minutes(value: i32) {
        AppConfig::set_field(|cfg| cfg.late_threshold_minutes = value);
    }
}
