//! API key resolution: environment first, then the system keyring

use keyring::Entry;

use super::error::ClaudeError;

const SERVICE_NAME: &str = "textbook-tui";
const API_KEY_ENTRY: &str = "anthropic-api-key";

/// Environment variable consulted before the keyring
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

pub struct ApiKeyManager;

impl ApiKeyManager {
    /// Resolve the API key, preferring `ANTHROPIC_API_KEY`
    pub fn get_api_key() -> Result<String, ClaudeError> {
        if let Some(key) = Self::key_from_env() {
            return Ok(key);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| ClaudeError::KeyringError(e.to_string()))?;

        entry.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => ClaudeError::ApiKeyNotFound,
            _ => ClaudeError::KeyringError(e.to_string()),
        })
    }

    fn key_from_env() -> Option<String> {
        std::env::var(API_KEY_ENV).ok().map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
    }

    /// Store the API key in the system keyring
    pub fn set_api_key(key: &str) -> Result<(), ClaudeError> {
        let key = key.trim();
        if !Self::validate_key_format(key) {
            return Err(ClaudeError::InvalidApiKey);
        }

        let entry = Entry::new(SERVICE_NAME, API_KEY_ENTRY)
            .map_err(|e| ClaudeError::KeyringError(e.to_string()))?;

        entry.set_password(key).map_err(|e| ClaudeError::KeyringError(e.to_string()))
    }

    pub fn has_api_key() -> bool {
        Self::get_api_key().is_ok()
    }

    fn validate_key_format(key: &str) -> bool {
        key.starts_with("sk-ant-") && key.len() > 20
    }

    /// Mask a key for display, keeping the first 8 and last 4 characters
    pub fn mask_key(key: &str) -> String {
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 12 {
            return "*".repeat(chars.len());
        }
        let prefix: String = chars[..8].iter().collect();
        let suffix: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_key_format() {
        assert!(ApiKeyManager::validate_key_format("sk-ant-REDACTED"));
        assert!(!ApiKeyManager::validate_key_format("sk-proj-abcdefghijklmnopqrstu"));
        assert!(!ApiKeyManager::validate_key_format("sk-ant-short"));
    }

    #[test]
    fn mask_key() {
        let masked = ApiKeyManager::mask_key("sk-ant-REDACTED");
        assert_eq!(masked, "sk-ant-a...wxyz");
        assert_eq!(ApiKeyManager::mask_key("short"), "*****");
    }
}
