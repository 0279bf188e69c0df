use std::env;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::types::{ConfigError, Environment};

const DEFAULT_CORS_ORIGINS: &[&str] =
    &["http://localhost:5173", "http://localhost:3000", "http://localhost:8080"];

/// Uncompressed P-256 point: 0x04 prefix followed by two 32-byte coordinates.
const VAPID_PUBLIC_KEY_LEN: usize = 65;

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_u64(field: &'static str, value: String) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_usize(field: &'static str, value: String) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidValue { field, value })
}

pub(super) fn parse_cors_origins(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = value else {
        return Ok(default_cors_origins());
    };

    if raw.trim().is_empty() {
        return Ok(default_cors_origins());
    }

    if raw.trim_start().starts_with('[') {
        let parsed: Vec<String> =
            serde_json::from_str(&raw).map_err(|_| ConfigError::InvalidCors(raw.clone()))?;
        if parsed.is_empty() {
            return Ok(default_cors_origins());
        }
        return Ok(parsed);
    }

    let items: Vec<String> = raw
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Ok(default_cors_origins());
    }

    Ok(items)
}

pub(super) fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES" | "on" | "ON")
}

pub(super) fn parse_environment(value: Option<String>) -> Environment {
    match value.as_deref().map(|item| item.to_lowercase()) {
        Some(ref val) if val == "production" || val == "prod" => Environment::Production,
        Some(ref val) if val == "staging" => Environment::Staging,
        Some(ref val) if val == "test" || val == "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

pub(super) fn normalize_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let valid_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    if !valid_scheme || trimmed.len() <= "https://".len() {
        return Err(ConfigError::InvalidValue {
            field: "BACKEND_BASE_URL",
            value: value.to_string(),
        });
    }

    Ok(trimmed.to_string())
}

pub(super) fn validate_vapid_public_key(value: &str) -> Result<(), ConfigError> {
    let invalid =
        || ConfigError::InvalidValue { field: "VAPID_PUBLIC_KEY", value: value.to_string() };

    let decoded = URL_SAFE_NO_PAD.decode(value.trim_end_matches('=')).map_err(|_| invalid())?;
    if decoded.len() != VAPID_PUBLIC_KEY_LEN || decoded[0] != 0x04 {
        return Err(invalid());
    }

    Ok(())
}

fn default_cors_origins() -> Vec<String> {
    DEFAULT_CORS_ORIGINS.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cors_origins_json() {
        let raw = "[\"http://a\",\"http://b\"]".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors json");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_csv() {
        let raw = "http://a, http://b".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors csv");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn parse_cors_origins_defaults_on_empty() {
        let parsed = parse_cors_origins(Some(" ".to_string())).expect("cors empty");
        assert_eq!(parsed, default_cors_origins());
    }

    #[test]
    fn parse_bool_variants() {
        assert!(parse_bool("1"));
        assert!(parse_bool("true"));
        assert!(parse_bool("yes"));
        assert!(parse_bool("on"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
    }

    #[test]
    fn parse_environment_variants() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://backend:5000/").expect("url"),
            "http://backend:5000".to_string()
        );
        assert!(normalize_base_url("backend:5000").is_err());
        assert!(normalize_base_url("http://").is_err());
    }

    #[test]
    fn vapid_key_must_be_uncompressed_point() {
        let key = "BGUjqRdIyVFsVfZA6vGmHWSVksy9Wc5c70jtWep-W2TXdW9SGznYuA8RqErHnFEwSDC2evlXGII_Qir-L3sW-Zc";
        assert!(validate_vapid_public_key(key).is_ok());
        assert!(validate_vapid_public_key("not base64 at all!").is_err());
        assert!(validate_vapid_public_key("BGUj").is_err());
    }
}
