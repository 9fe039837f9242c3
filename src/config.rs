// src/config.rs
use crate::errors::StudioError;
use crate::services::image_processor::DEFAULT_MAX_UPLOAD_BYTES;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub bind_addr: String,
    pub text_model: String,
    pub image_model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub max_reference_dim: u32,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, StudioError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `GEMINI_API_KEY` is required,
    /// everything else has a default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StudioError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| StudioError::Config("GEMINI_API_KEY must be set".to_string()))?;

        let request_timeout = match get("BRANDSHOT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().map_err(|_| {
                StudioError::Config(format!("Invalid BRANDSHOT_REQUEST_TIMEOUT_SECS: {}", raw))
            })?),
            None => Duration::from_secs(120),
        };

        let max_reference_dim = match get("BRANDSHOT_MAX_REFERENCE_DIM") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                StudioError::Config(format!("Invalid BRANDSHOT_MAX_REFERENCE_DIM: {}", raw))
            })?,
            None => 2048,
        };

        let max_upload_bytes = match get("BRANDSHOT_MAX_UPLOAD_BYTES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                StudioError::Config(format!("Invalid BRANDSHOT_MAX_UPLOAD_BYTES: {}", raw))
            })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            api_key,
            bind_addr: get("BRANDSHOT_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            text_model: get("BRANDSHOT_TEXT_MODEL")
                .unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: get("BRANDSHOT_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            api_base: get("BRANDSHOT_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            request_timeout,
            max_reference_dim,
            max_upload_bytes,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "GEMINI_API_KEY" => Some("test-key".to_string()),
            _ => None,
        })
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn requires_api_key() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));

        let err = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn applies_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND);
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.image_model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.max_reference_dim, 2048);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("BRANDSHOT_BIND", "127.0.0.1:9000"),
            ("BRANDSHOT_IMAGE_MODEL", "imagen-x"),
            ("BRANDSHOT_REQUEST_TIMEOUT_SECS", "30"),
            ("BRANDSHOT_MAX_REFERENCE_DIM", "1024"),
            ("BRANDSHOT_MAX_UPLOAD_BYTES", "4096"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.image_model, "imagen-x");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_reference_dim, 1024);
        assert_eq!(config.max_upload_bytes, 4096);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("BRANDSHOT_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("BRANDSHOT_REQUEST_TIMEOUT_SECS"));
    }
}
