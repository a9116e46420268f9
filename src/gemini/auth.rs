//! API key resolution: environment first, then the system keyring

use keyring::Entry;

use super::error::GeminiError;

/// Service name for keyring storage
const SERVICE_NAME: &str = "smartstudy";
/// Entry name for the API key
const API_KEY_ENTRY: &str = "gemini-api-key";
/// Environment variables checked in order
const ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Where the active key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Environment variable with this name
    Env(&'static str),
    /// System keyring
    Keyring,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Env(name) => write!(f, "${}", name),
            KeySource::Keyring => f.write_str("system keyring"),
        }
    }
}

/// Manages the Gemini API key
pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Find the API key, or fail with [`GeminiError::ApiKeyNotFound`]
    pub fn resolve() -> Result<(String, KeySource), GeminiError> {
        Self::resolve_with(|name| std::env::var(name).ok(), Self::get_api_key)
    }

    /// Resolution order with injectable lookups
    fn resolve_with(
        env: impl Fn(&str) -> Option<String>,
        keyring: impl FnOnce() -> Result<String, GeminiError>,
    ) -> Result<(String, KeySource), GeminiError> {
        for name in ENV_VARS {
            if let Some(value) = env(name) {
                let value = value.trim();
                if !value.is_empty() {
                    return Ok((value.to_string(), KeySource::Env(name)));
                }
            }
        }

        match keyring() {
            Ok(key) => Ok((key, KeySource::Keyring)),
            Err(GeminiError::KeyringError(e)) => {
                // No usable keyring on this machine: same outcome as no key
                tracing::warn!("Keyring unavailable: {}", e);
                Err(GeminiError::ApiKeyNotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Get the API key from system keyring
    pub fn get_api_key() -> Result<String, GeminiError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| GeminiError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => GeminiError::ApiKeyNotFound,
            _ => GeminiError::KeyringError(e.to_string()),
        })
    }

    /// Store the API key in system keyring
    pub fn set_api_key(key: &str) -> Result<(), GeminiError> {
        let key = key.trim();
        if !Self::validate_key_format(key) {
            return Err(GeminiError::InvalidApiKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| GeminiError::KeyringError(e.to_string()))?;

        entry.set_password(key).map_err(|e| GeminiError::KeyringError(e.to_string()))
    }

    /// Delete the stored API key
    pub fn delete_api_key() -> Result<(), GeminiError> {
        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| GeminiError::KeyringError(e.to_string()))?;

        entry.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => GeminiError::ApiKeyNotFound,
            _ => GeminiError::KeyringError(e.to_string()),
        })
    }

    /// Validate API key format
    fn validate_key_format(key: &str) -> bool {
        // Google API keys are 39 characters starting with "AIza"; allow some slack
        key.len() >= 30 && !key.chars().any(char::is_whitespace)
    }

    /// Mask an API key for display (show first 6 and last 4 chars)
    pub fn mask_key(key: &str) -> String {
        if key.chars().count() <= 12 || !key.is_ascii() {
            return "*".repeat(key.chars().count());
        }
        let prefix = &key[..6];
        let suffix = &key[key.len() - 4..];
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_keyring() -> Result<String, GeminiError> {
        Err(GeminiError::ApiKeyNotFound)
    }

    #[test]
    fn validate_key_format() {
        assert!(ApiKeyManager::validate_key_format("AIzaSyA-abcdefghijklmnopqrstuvwxyz0123"));
        assert!(!ApiKeyManager::validate_key_format("short"));
        assert!(!ApiKeyManager::validate_key_format("AIzaSyA abcdefghijklmnopqrstuvwxyz0123"));
    }

    #[test]
    fn mask_key() {
        let masked = ApiKeyManager::mask_key("AIzaSyA-abcdefghijklmnopqrstuvwxyz0123");
        assert!(masked.starts_with("AIzaSy"));
        assert!(masked.ends_with("0123"));
        assert!(masked.contains("..."));
        assert_eq!(ApiKeyManager::mask_key("tiny"), "****");
    }

    #[test]
    fn gemini_env_var_wins() {
        let (key, source) = ApiKeyManager::resolve_with(
            |name| match name {
                "GEMINI_API_KEY" => Some("from-gemini".into()),
                "API_KEY" => Some("from-generic".into()),
                _ => None,
            },
            no_keyring,
        )
        .unwrap();
        assert_eq!(key, "from-gemini");
        assert_eq!(source, KeySource::Env("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_env_var_is_skipped() {
        let (key, source) = ApiKeyManager::resolve_with(
            |name| match name {
                "GEMINI_API_KEY" => Some("   ".into()),
                "API_KEY" => Some("generic".into()),
                _ => None,
            },
            no_keyring,
        )
        .unwrap();
        assert_eq!(key, "generic");
        assert_eq!(source, KeySource::Env("API_KEY"));
    }

    #[test]
    fn keyring_is_the_fallback() {
        let (key, source) =
            ApiKeyManager::resolve_with(|_| None, || Ok("stored".to_string())).unwrap();
        assert_eq!(key, "stored");
        assert_eq!(source, KeySource::Keyring);
    }

    #[test]
    fn missing_everywhere_is_not_found() {
        let err = ApiKeyManager::resolve_with(|_| None, || {
            Err(GeminiError::KeyringError("no backend".into()))
        })
        .unwrap_err();
        assert!(matches!(err, GeminiError::ApiKeyNotFound));
    }
}
