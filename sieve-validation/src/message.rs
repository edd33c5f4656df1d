//! Deferred validation messages
//!
//! A [`Message`] remembers *what* went wrong (field, key and args) and turns
//! into text only when it is displayed or serialized. The text comes from the
//! [`MessageResolver`] the message carries, so a resolver can be swapped after
//! messages have been recorded.

use crate::resolver::default_resolver;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Placeholder arguments for a message, in insertion order.
pub type MessageArgs = IndexMap<String, Value>;

/// Turns a message key into human-readable text.
pub trait MessageResolver: Send + Sync {
    /// Create a complete human-readable message.
    fn resolve_message(&self, field: &str, key: &str, args: &MessageArgs) -> String;
}

impl<F> MessageResolver for F
where
    F: Fn(&str, &str, &MessageArgs) -> String + Send + Sync,
{
    fn resolve_message(&self, field: &str, key: &str, args: &MessageArgs) -> String {
        self(field, key, args)
    }
}

/// A field-scoped message, resolved to text on demand.
#[derive(Clone)]
pub struct Message {
    field: String,
    key: String,
    args: MessageArgs,
    resolver: Arc<dyn MessageResolver>,
}

impl Message {
    /// Create a message without args, bound to the built-in resolver.
    pub fn new(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self::with_args(field, key, MessageArgs::new())
    }

    /// Create a message with placeholder args, bound to the built-in resolver.
    pub fn with_args(field: impl Into<String>, key: impl Into<String>, args: MessageArgs) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
            args,
            resolver: default_resolver(),
        }
    }

    /// Bind the message to a different resolver.
    pub fn resolved_by(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub(crate) fn set_resolver(&mut self, resolver: Arc<dyn MessageResolver>) {
        self.resolver = resolver;
    }

    /// Field the message belongs to
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Message key, e.g. `between.number`
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Placeholder args
    pub fn args(&self) -> &MessageArgs {
        &self.args
    }

    /// Resolve the message to text.
    pub fn resolve(&self) -> String {
        self.resolver
            .resolve_message(&self.field, &self.key, &self.args)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("field", &self.field)
            .field("key", &self.key)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.key == other.key && self.args == other.args
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.resolve())
    }
}

/// Values accepted by [`MessageBag::add`](crate::MessageBag::add).
///
/// Raw text becomes a message keyed by that text, bound to the bag's resolver.
/// Ready-made messages keep their own resolver.
pub trait IntoMessage {
    fn into_message(self, field: &str, resolver: &Arc<dyn MessageResolver>) -> Message;
}

impl IntoMessage for Message {
    fn into_message(self, _field: &str, _resolver: &Arc<dyn MessageResolver>) -> Message {
        self
    }
}

impl IntoMessage for &str {
    fn into_message(self, field: &str, resolver: &Arc<dyn MessageResolver>) -> Message {
        Message::new(field, self).resolved_by(Arc::clone(resolver))
    }
}

impl IntoMessage for String {
    fn into_message(self, field: &str, resolver: &Arc<dyn MessageResolver>) -> Message {
        Message::new(field, self).resolved_by(Arc::clone(resolver))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_and_key() -> Arc<dyn MessageResolver> {
        Arc::new(|field: &str, key: &str, _args: &MessageArgs| format!("{field}: {key}"))
    }

    #[test]
    fn test_resolve_message_key() {
        let message = Message::new("foo", "bar").resolved_by(field_and_key());
        assert_eq!(message.resolve(), "foo: bar");
    }

    #[test]
    fn test_display_matches_resolve() {
        let message = Message::new("foo", "bar").resolved_by(field_and_key());
        assert_eq!(message.to_string(), message.resolve());
    }

    #[test]
    fn test_serialize_to_json() {
        let message = Message::new("foo", "bar").resolved_by(field_and_key());
        let json = serde_json::to_string(&message).unwrap();

        assert_eq!(json, serde_json::to_string(&message.resolve()).unwrap());
    }

    #[test]
    fn test_resolution_is_lazy() {
        let mut message = Message::new("name", "required");
        assert_eq!(message.resolve(), "The name is required.");

        message.set_resolver(field_and_key());
        assert_eq!(message.resolve(), "name: required");
    }

    #[test]
    fn test_accessors() {
        let mut args = MessageArgs::new();
        args.insert("max".to_string(), Value::from(5));

        let message = Message::with_args("name", "max.string", args.clone());
        assert_eq!(message.field(), "name");
        assert_eq!(message.key(), "max.string");
        assert_eq!(message.args(), &args);
    }
}
