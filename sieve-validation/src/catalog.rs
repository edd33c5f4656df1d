//! Message catalogs with per-field overrides
//!
//! A [`CatalogResolver`] looks up templates in a flat [`MessageCatalog`] of
//! dotted keys. For field `email` and key `required` it tries:
//!
//! 1. `form.email.required`
//! 2. `validation.required`
//! 3. the fallback resolver (the built-in catalog by default)
//!
//! Templates also get a `{title}` placeholder: `form.email.title`, then
//! `form.email`, then the raw field name.
//!
//! ```
//! use sieve_validation::{CatalogResolver, MessageArgs, MessageCatalog, MessageResolver};
//!
//! let catalog = MessageCatalog::from_json(r#"{
//!     "form": { "email": { "title": "E-mail address", "required": "Enter your {title}." } },
//!     "validation": { "required": "{title} is missing." }
//! }"#).unwrap();
//!
//! let resolver = CatalogResolver::new(catalog);
//! let args = MessageArgs::new();
//!
//! assert_eq!(resolver.resolve_message("email", "required", &args), "Enter your E-mail address.");
//! assert_eq!(resolver.resolve_message("name", "required", &args), "name is missing.");
//! ```

use crate::message::{MessageArgs, MessageResolver};
use crate::resolver::{default_resolver, substitute};
use crate::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Flat collection of message templates keyed by dotted path.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from JSON. Nested objects flatten into dotted keys; non-string
    /// leaves are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Value = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        catalog.merge_value("", &data);
        Ok(catalog)
    }

    /// Load from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn merge_value(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::String(s) if !prefix.is_empty() => {
                self.messages.insert(prefix.to_string(), s.clone());
            }
            Value::Object(map) => {
                for (key, value) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    self.merge_value(&path, value);
                }
            }
            _ => {}
        }
    }

    /// Add a template.
    pub fn add(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Get a template.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|s| s.as_str())
    }

    /// Check if the catalog has a template.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Resolver backed by a [`MessageCatalog`] with per-field overrides.
#[derive(Clone)]
pub struct CatalogResolver {
    catalog: MessageCatalog,
    fallback: Arc<dyn MessageResolver>,
}

impl CatalogResolver {
    /// Resolve against `catalog`, falling back to the built-in templates.
    pub fn new(catalog: MessageCatalog) -> Self {
        Self {
            catalog,
            fallback: default_resolver(),
        }
    }

    /// Set the resolver used when the catalog has no template.
    pub fn with_fallback(mut self, fallback: Arc<dyn MessageResolver>) -> Self {
        self.fallback = fallback;
        self
    }

    /// The underlying catalog
    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    fn title<'a>(&'a self, field: &'a str) -> &'a str {
        self.catalog
            .get(&format!("form.{}.title", field))
            .or_else(|| self.catalog.get(&format!("form.{}", field)))
            .unwrap_or(field)
    }
}

impl MessageResolver for CatalogResolver {
    fn resolve_message(&self, field: &str, key: &str, args: &MessageArgs) -> String {
        let mut args = args.clone();
        if !args.contains_key("title") {
            args.insert("title".to_string(), Value::from(self.title(field)));
        }

        let template = self
            .catalog
            .get(&format!("form.{}.{}", field, key))
            .or_else(|| self.catalog.get(&format!("validation.{}", key)));

        match template {
            Some(template) => substitute(template, field, &args),
            None => self.fallback.resolve_message(field, key, &args),
        }
    }
}
