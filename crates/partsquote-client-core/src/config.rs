pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
pub const ENV_API_BASE_URL: &str = "PARTSQUOTE_API_BASE_URL";
pub const ENV_API_BASE_URL_LEGACY: &str = "PARTSQUOTE_BASE_URL";
pub const API_BASE_SOURCE_DEFAULT_LOCAL: &str = "default_local";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must use http:// or https:// and include a host")]
    InvalidBaseUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedApiBaseUrl {
    pub base_url: String,
    pub source: &'static str,
}

pub fn resolve_api_base_url() -> Result<ResolvedApiBaseUrl, ConfigError> {
    for key in [ENV_API_BASE_URL, ENV_API_BASE_URL_LEGACY] {
        if let Some(raw) = env_non_empty(key) {
            let base_url = normalize_base_url(&raw)?;
            tracing::debug!(source = key, %base_url, "resolved api base url from environment");
            return Ok(ResolvedApiBaseUrl {
                base_url,
                source: key,
            });
        }
    }
    Ok(ResolvedApiBaseUrl {
        base_url: normalize_base_url(DEFAULT_API_BASE_URL)?,
        source: API_BASE_SOURCE_DEFAULT_LOCAL,
    })
}

pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    let Some((scheme, remainder)) = trimmed.split_once("://") else {
        return Err(ConfigError::InvalidBaseUrl);
    };
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidBaseUrl);
    }
    if remainder.trim().is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(trimmed.to_string())
}

/// Joins an API path onto a normalized base url.
#[must_use]
pub fn api_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
