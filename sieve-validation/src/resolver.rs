// Built-in message resolver

use crate::message::{MessageArgs, MessageResolver};
use crate::value::display_value;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

// Default English templates
static DEFAULT_MESSAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("required", "The {field} is required."),
        ("string", "The {field} must be a string."),
        ("integer", "The {field} must be a number."),
        ("float", "The {field} must be a number."),
        ("array", "The {field} has invalid data."),
        ("token", "Invalid token. Please try again."),
        ("between.number", "The {field} must be between {min} and {max}."),
        ("between.array", "The {field} must have between {min} and {max} elements."),
        ("between.string", "The {field} must have between {min} and {max} characters."),
        ("max.number", "The {field} may not be greater than {max}."),
        ("max.string", "The {field} may not have more than {max} characters."),
        ("max.array", "The {field} may not have more than {max} elements."),
        ("min.number", "The {field} must be at least {min}."),
        ("min.string", "The {field} must have at least {min} characters."),
        ("min.array", "The {field} must have at least {min} elements."),
        ("size.number", "The {field} must be {size}."),
        ("size.string", "The {field} must have {size} characters."),
        ("size.array", "The {field} must have {size} elements."),
        ("in", "The {field} must be one of {values}."),
        ("unique", "The {field} has already been taken."),
        ("exists", "The {field} does not exist."),
    ])
});

static DEFAULT_RESOLVER: Lazy<Arc<dyn MessageResolver>> =
    Lazy::new(|| Arc::new(DefaultMessageResolver::new()));

/// Shared handle to the built-in resolver.
pub fn default_resolver() -> Arc<dyn MessageResolver> {
    Arc::clone(&DEFAULT_RESOLVER)
}

/// Substitute `{arg}` placeholders, then `{field}`.
///
/// Args go first, so an explicit `field` arg replaces the field name.
pub(crate) fn substitute(template: &str, field: &str, args: &MessageArgs) -> String {
    let mut message = template.to_string();

    for (name, value) in args {
        let placeholder = format!("{{{}}}", name);
        message = message.replace(&placeholder, &display_value(value));
    }

    message.replace("{field}", field)
}

/// Resolves message keys against the built-in English catalog.
///
/// Unknown keys resolve to the key itself.
#[derive(Debug, Clone, Default)]
pub struct DefaultMessageResolver {
    overrides: IndexMap<String, String>,
}

impl DefaultMessageResolver {
    /// Create a resolver over the built-in catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer templates over the built-in catalog.
    pub fn with_overrides(overrides: IndexMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Add or replace a single template.
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), template.into());
        self
    }

    /// Template for a key, if any.
    pub fn template(&self, key: &str) -> Option<&str> {
        self.overrides
            .get(key)
            .map(String::as_str)
            .or_else(|| DEFAULT_MESSAGES.get(key).copied())
    }
}

impl MessageResolver for DefaultMessageResolver {
    fn resolve_message(&self, field: &str, key: &str, args: &MessageArgs) -> String {
        match self.template(key) {
            Some(template) => substitute(template, field, args),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn resolve(field: &str, key: &str, args: &[(&str, Value)]) -> String {
        let args: MessageArgs = args
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        DefaultMessageResolver::new().resolve_message(field, key, &args)
    }

    #[test]
    fn test_pulls_message() {
        assert_eq!(resolve("foo", "token", &[]), "Invalid token. Please try again.");
    }

    #[test]
    fn test_returns_key_as_fallback() {
        assert_eq!(resolve("foo", "doesnt_exist", &[]), "doesnt_exist");
    }

    #[test]
    fn test_replaces_field_name() {
        assert_eq!(resolve("name", "required", &[]), "The name is required.");
    }

    #[test]
    fn test_replaces_args() {
        assert_eq!(
            resolve("name", "max.string", &[("max", Value::from(5))]),
            "The name may not have more than 5 characters."
        );
        assert_eq!(
            resolve("age", "between.number", &[("min", Value::from(4)), ("max", Value::from(6))]),
            "The age must be between 4 and 6."
        );
    }

    #[test]
    fn test_custom_field_overrides_default() {
        assert_eq!(
            resolve(
                "available_walruses",
                "required",
                &[("field", Value::from("weirdly named field"))]
            ),
            "The weirdly named field is required."
        );
    }

    #[test]
    fn test_overrides_take_precedence() {
        let resolver = DefaultMessageResolver::new()
            .with_message("required", "Please fill in {field}.")
            .with_message("unique", "{field} is taken.");

        let args = MessageArgs::new();
        assert_eq!(
            resolver.resolve_message("email", "required", &args),
            "Please fill in email."
        );
        assert_eq!(resolver.resolve_message("email", "unique", &args), "email is taken.");
        assert_eq!(
            resolver.resolve_message("email", "string", &args),
            "The email must be a string."
        );
    }

    #[test]
    fn test_catalog_covers_rule_keys() {
        let resolver = DefaultMessageResolver::new();
        for rule in ["between", "max", "min", "size"] {
            for kind in ["number", "string", "array"] {
                let key = format!("{rule}.{kind}");
                assert!(resolver.template(&key).is_some(), "missing template for {key}");
            }
        }
        for key in ["required", "string", "integer", "float", "array", "token", "in", "unique", "exists"] {
            assert!(resolver.template(key).is_some(), "missing template for {key}");
        }
    }
}
