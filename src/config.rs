//! Admin configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "CMS_API_BASE_URL";
pub const TOKEN_VAR: &str = "CMS_API_TOKEN";
pub const REQUEST_TIMEOUT_VAR: &str = "CMS_REQUEST_TIMEOUT_SECS";
pub const CONNECT_TIMEOUT_VAR: &str = "CMS_CONNECT_TIMEOUT_SECS";
pub const CACHE_DIR_VAR: &str = "CMS_LAYOUT_CACHE_DIR";
pub const LAYOUT_AS_STRING_VAR: &str = "CMS_LAYOUT_AS_STRING";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    /// REST API root, without a trailing slash.
    pub api_base_url: String,
    /// Bearer token sent with every request, if any.
    pub api_token: Option<String>,
    pub timeouts: RequestTimeouts,
    /// Directory for last-known-good layouts. Caching is off when unset.
    pub cache_dir: Option<PathBuf>,
    /// Save layouts as a JSON-encoded string rather than a nested object,
    /// for backends whose layout column is plain text.
    pub layout_as_string: bool,
}

impl AdminConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `CMS_API_BASE_URL`: `http://` or `https://` API root
    ///
    /// Optional:
    /// - `CMS_API_TOKEN`: bearer token
    /// - `CMS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CMS_CONNECT_TIMEOUT_SECS`: default 10
    /// - `CMS_LAYOUT_CACHE_DIR`: enables the local layout cache
    /// - `CMS_LAYOUT_AS_STRING`: `true`/`false` (default false)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is missing or any value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build typed config from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Same as [`AdminConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |var| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = parse_base_url(get(BASE_URL_VAR))?;
        let timeouts = RequestTimeouts {
            request_secs: parse_secs(REQUEST_TIMEOUT_VAR, get(REQUEST_TIMEOUT_VAR), DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_secs(CONNECT_TIMEOUT_VAR, get(CONNECT_TIMEOUT_VAR), DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };
        let layout_as_string = parse_bool(LAYOUT_AS_STRING_VAR, get(LAYOUT_AS_STRING_VAR))?;

        Ok(Self {
            api_base_url,
            api_token: get(TOKEN_VAR),
            timeouts,
            cache_dir: get(CACHE_DIR_VAR).map(PathBuf::from),
            layout_as_string,
        })
    }
}

fn parse_base_url(raw: Option<String>) -> Result<String, ConfigError> {
    let raw = raw.ok_or(ConfigError::Missing { var: BASE_URL_VAR })?;
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::Invalid { var: BASE_URL_VAR, value: raw, reason: "expected an http(s) URL" });
    }
    Ok(raw.trim_end_matches('/').to_owned())
}

fn parse_secs(var: &'static str, raw: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid { var, value: raw, reason: "must be greater than zero" }),
        Ok(secs) => Ok(secs),
        Err(_) => Err(ConfigError::Invalid { var, value: raw, reason: "expected whole seconds" }),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw, reason: "expected true or false" }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
