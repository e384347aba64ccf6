use std::{env, path::PathBuf};

use crate::{
    access::{DEFAULT_LANDING_PATH, DEFAULT_LOGIN_PATH},
    error::ConfigError,
};

/// Directory used for the session record when `SESSION_DIR` is not set locally.
pub const DEFAULT_SESSION_DIR: &str = ".volunteer-session";

/// AppConfig
///
/// Immutable configuration read once at startup and carried by the
/// `AccessContext`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and which variables are mandatory.
    pub env: Env,
    // Directory holding the durable session record.
    pub session_dir: PathBuf,
    // Redirect target for anonymous visitors on guarded routes.
    pub login_path: String,
    // Redirect target for signed-in principals lacking the required role.
    pub landing_path: String,
}

/// Env
///
/// Local development (pretty logs, defaults everywhere) or production (JSON
/// logs, explicit session directory).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

impl Default for AppConfig {
    /// Safe values for tests; nothing is read from the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            session_dir: PathBuf::from(DEFAULT_SESSION_DIR),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            landing_path: DEFAULT_LANDING_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the environment (after loading `.env`).
    ///
    /// Fails fast in production when `SESSION_DIR` is missing, and in any
    /// environment when a redirect path does not start with `/`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let session_dir = match (env, env::var("SESSION_DIR")) {
            (_, Ok(dir)) if !dir.trim().is_empty() => PathBuf::from(dir),
            (Env::Production, _) => return Err(ConfigError::Missing("SESSION_DIR")),
            (Env::Local, _) => PathBuf::from(DEFAULT_SESSION_DIR),
        };

        Ok(Self {
            env,
            session_dir,
            login_path: route_var("LOGIN_PATH", DEFAULT_LOGIN_PATH)?,
            landing_path: route_var("LANDING_PATH", DEFAULT_LANDING_PATH)?,
        })
    }
}

fn route_var(var: &'static str, default: &str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(value) if value.starts_with('/') => Ok(value),
        Ok(value) => Err(ConfigError::Invalid { var, value }),
        Err(_) => Ok(default.to_string()),
    }
}
