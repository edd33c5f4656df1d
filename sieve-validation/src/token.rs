// Anti-forgery token collaborator

use crate::config::ValidationConfig;
use crate::validator::Validator;

/// Supplies the input key and expected value of the anti-forgery token
/// checked by [`Validator::passes`].
pub trait TokenProvider: Send + Sync {
    /// Return the input key for the token.
    fn token_key(&self, validator: &Validator) -> String;

    /// Return the expected value for the token.
    fn token_value(&self, validator: &Validator) -> String;
}

/// Token provider over a fixed key and an already-issued token value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTokenProvider {
    key: String,
    value: String,
}

impl StaticTokenProvider {
    /// Create a provider expecting `value` under input key `key`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a provider expecting `value` under the configured token field.
    pub fn from_config(config: &ValidationConfig, value: impl Into<String>) -> Self {
        Self::new(config.token_field.clone(), value)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token_key(&self, _validator: &Validator) -> String {
        self.key.clone()
    }

    fn token_value(&self, _validator: &Validator) -> String {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_static_provider() {
        let validator = Validator::new(json!({}));
        let provider = StaticTokenProvider::new("_token", "abc123");

        assert_eq!(provider.token_key(&validator), "_token");
        assert_eq!(provider.token_value(&validator), "abc123");
    }

    #[test]
    fn test_provider_from_config() {
        let validator = Validator::new(json!({}));
        let config = ValidationConfig::default().with_token_field("csrf_token");
        let provider = StaticTokenProvider::from_config(&config, "abc123");

        assert_eq!(provider.token_key(&validator), "csrf_token");
        assert_eq!(provider.token_value(&validator), "abc123");
    }
}
