// Validation configuration

use crate::error::SieveError;
use crate::resolver::DefaultMessageResolver;
use crate::Result;
use indexmap::IndexMap;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming the token input field
pub const ENV_TOKEN_FIELD: &str = "SIEVE_TOKEN_FIELD";

/// Environment variable pointing at a TOML file of message templates
pub const ENV_MESSAGES_FILE: &str = "SIEVE_MESSAGES_FILE";

/// Validation configuration
///
/// ```toml
/// token_field = "csrf_token"
///
/// [messages]
/// required = "Please fill in the {field}."
/// "max.string" = "The {field} is too long (at most {max} characters)."
///
/// [messages.between]
/// number = "Pick a {field} from {min} to {max}."
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Input field holding the anti-forgery token
    pub token_field: String,

    /// Message templates layered over the built-in catalog
    pub messages: IndexMap<String, String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    token_field: Option<String>,
    #[serde(default)]
    messages: toml::Table,
}

impl ValidationConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self {
            token_field: "token".to_string(),
            messages: IndexMap::new(),
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)?;
        let mut config = Self::new();

        if let Some(token_field) = raw.token_field {
            config.token_field = token_field;
        }
        flatten_templates("", &raw.messages, &mut config.messages)?;

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load a configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load a configuration through a variable lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(token_field) = lookup(ENV_TOKEN_FIELD) {
            config.token_field = token_field;
        }

        if let Some(path) = lookup(ENV_MESSAGES_FILE) {
            let content = fs::read_to_string(&path)?;
            let table: toml::Table = toml::from_str(&content)?;
            flatten_templates("", &table, &mut config.messages)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the token field
    pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
        self.token_field = field.into();
        self
    }

    /// Add a message template
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key.into(), template.into());
        self
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        if self.token_field.trim().is_empty() {
            return Err(SieveError::Config(
                "token_field must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolver over the built-in catalog plus the configured templates.
    pub fn resolver(&self) -> DefaultMessageResolver {
        DefaultMessageResolver::with_overrides(self.messages.clone())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Nested tables become dotted keys, so `[messages.max] string = ".."` and
// `"max.string" = ".."` mean the same thing.
fn flatten_templates(
    prefix: &str,
    table: &toml::Table,
    out: &mut IndexMap<String, String>,
) -> Result<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::String(template) => {
                out.insert(path, template.clone());
            }
            toml::Value::Table(nested) => flatten_templates(&path, nested, out)?,
            other => {
                return Err(SieveError::Config(format!(
                    "message template `{}` must be a string, found {}",
                    path,
                    other.type_str()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageArgs, MessageResolver};

    #[test]
    fn test_config_defaults() {
        let config = ValidationConfig::default();
        assert_eq!(config.token_field, "token");
        assert!(config.messages.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ValidationConfig::default()
            .with_token_field("_csrf")
            .with_message("required", "Fill in {field}.");

        assert_eq!(config.token_field, "_csrf");
        assert_eq!(config.messages.get("required").map(String::as_str), Some("Fill in {field}."));
    }

    #[test]
    fn test_from_toml_flattens_messages() {
        let config = ValidationConfig::from_toml_str(
            r#"
            token_field = "csrf_token"

            [messages]
            required = "Please fill in the {field}."
            "max.string" = "Too long."

            [messages.between]
            number = "Pick from {min} to {max}."
            "#,
        )
        .unwrap();

        assert_eq!(config.token_field, "csrf_token");
        assert_eq!(config.messages.len(), 3);
        assert_eq!(config.messages.get("max.string").map(String::as_str), Some("Too long."));
        assert_eq!(
            config.messages.get("between.number").map(String::as_str),
            Some("Pick from {min} to {max}.")
        );
    }

    #[test]
    fn test_from_toml_defaults_missing_values() {
        let config = ValidationConfig::from_toml_str("").unwrap();
        assert_eq!(config, ValidationConfig::default());
    }

    #[test]
    fn test_rejects_empty_token_field() {
        let result = ValidationConfig::from_toml_str(r#"token_field = "  ""#);
        assert!(matches!(result, Err(SieveError::Config(_))));
    }

    #[test]
    fn test_rejects_non_string_template() {
        let result = ValidationConfig::from_toml_str("[messages]\nrequired = 5\n");
        assert!(matches!(result, Err(SieveError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let result = ValidationConfig::from_toml_str(r#"tokenfield = "x""#);
        assert!(matches!(result, Err(SieveError::Toml(_))));
    }

    #[test]
    fn test_from_lookup() {
        let config = ValidationConfig::from_lookup(|key| match key {
            ENV_TOKEN_FIELD => Some("_token".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.token_field, "_token");
        assert!(config.messages.is_empty());
    }

    #[test]
    fn test_from_lookup_reads_messages_file() {
        let path = std::env::temp_dir().join(format!("sieve-messages-{}.toml", std::process::id()));
        fs::write(&path, "required = \"Need {field}.\"\n").unwrap();

        let file = path.to_string_lossy().into_owned();
        let config = ValidationConfig::from_lookup(|key| match key {
            ENV_MESSAGES_FILE => Some(file.clone()),
            _ => None,
        });
        let _ = fs::remove_file(&path);

        let config = config.unwrap();
        assert_eq!(config.token_field, "token");
        assert_eq!(config.messages.get("required").map(String::as_str), Some("Need {field}."));
    }

    #[test]
    fn test_missing_messages_file_is_io_error() {
        let result = ValidationConfig::from_lookup(|key| match key {
            ENV_MESSAGES_FILE => Some("/nonexistent/sieve/messages.toml".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(SieveError::Io(_))));
    }

    #[test]
    fn test_resolver_uses_configured_templates() {
        let resolver = ValidationConfig::default()
            .with_message("required", "Fill in {field}.")
            .resolver();

        let args = MessageArgs::new();
        assert_eq!(resolver.resolve_message("name", "required", &args), "Fill in name.");
        assert_eq!(resolver.resolve_message("name", "string", &args), "The name must be a string.");
    }
}
