//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles. Values override defaults and file-loaded settings.
//!
//! # Naming Convention
//! - `PD_LOG_LEVEL`: Logging level (trace/debug/info/warn/error)
//! - `PD_DRIVE_BASE_URL` / `PD_DRIVE_UPLOAD_BASE_URL`: Drive endpoints
//! - `PD_SUMMARIZER_BASE_URL` / `PD_SUMMARIZER_MODEL`: Summarization
//!   endpoint and model
//! - `PD_OAUTH_CLIENT_ID` / `PD_OAUTH_CLIENT_SECRET`: OAuth client
//! - `PD_OAUTH_REDIRECT_PORT`: Fixed loopback port for the redirect
//!   listener

use crate::config::AppConfig;
use std::env;

/// Apply `PD_*` environment overrides on top of the given configuration.
pub fn apply_env(mut config: AppConfig) -> AppConfig {
    if let Ok(level) = env::var("PD_LOG_LEVEL") {
        config.observability.logging_level = level;
    }
    if let Ok(url) = env::var("PD_DRIVE_BASE_URL") {
        config.drive.base_url = url;
    }
    if let Ok(url) = env::var("PD_DRIVE_UPLOAD_BASE_URL") {
        config.drive.upload_base_url = url;
    }
    if let Ok(url) = env::var("PD_SUMMARIZER_BASE_URL") {
        config.summarizer.base_url = url;
    }
    if let Ok(model) = env::var("PD_SUMMARIZER_MODEL") {
        config.summarizer.model = model;
    }
    if let Ok(id) = env::var("PD_OAUTH_CLIENT_ID") {
        config.auth.client_id = id;
    }
    if let Ok(secret) = env::var("PD_OAUTH_CLIENT_SECRET") {
        config.auth.client_secret = secret;
    }
    if let Ok(port) = env::var("PD_OAUTH_REDIRECT_PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.auth.redirect_port = Some(port),
            Err(_) => {
                tracing::warn!(value = %port, "Ignoring unparsable PD_OAUTH_REDIRECT_PORT")
            }
        }
    }

    config
}

/// Load configuration from environment variables over the defaults.
pub fn load_from_env() -> AppConfig {
    apply_env(AppConfig::default())
}
