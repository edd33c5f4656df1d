// Ordered, field-keyed collection of validation messages

use crate::message::{IntoMessage, Message, MessageResolver};
use crate::resolver::default_resolver;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// Messages grouped by field.
///
/// Fields keep the order in which they first received a message, and each
/// field's messages keep the order in which they were added.
#[derive(Clone)]
pub struct MessageBag {
    messages: IndexMap<String, Vec<Message>>,
    resolver: Arc<dyn MessageResolver>,
}

impl MessageBag {
    /// Create an empty bag using the built-in resolver.
    pub fn new() -> Self {
        Self::with_resolver(default_resolver())
    }

    /// Create an empty bag whose text messages resolve through `resolver`.
    pub fn with_resolver(resolver: Arc<dyn MessageResolver>) -> Self {
        Self {
            messages: IndexMap::new(),
            resolver,
        }
    }

    /// Resolver bound to messages created by this bag
    pub fn resolver(&self) -> &Arc<dyn MessageResolver> {
        &self.resolver
    }

    /// Rebind the bag, and every message already in it, to `resolver`.
    pub fn set_resolver(&mut self, resolver: Arc<dyn MessageResolver>) {
        for message in self.messages.values_mut().flatten() {
            message.set_resolver(Arc::clone(&resolver));
        }
        self.resolver = resolver;
    }

    /// Add a message for a field.
    ///
    /// Text is wrapped into a [`Message`] keyed by that text.
    pub fn add(&mut self, field: &str, message: impl IntoMessage) -> &Message {
        let message = message.into_message(field, &self.resolver);
        let messages = self.messages.entry(field.to_string()).or_default();
        messages.push(message);
        &messages[messages.len() - 1]
    }

    /// All messages, grouped by field.
    pub fn all(&self) -> Vec<&Message> {
        self.messages.values().flatten().collect()
    }

    /// All messages except those of the given fields.
    pub fn except<S: AsRef<str>>(&self, fields: &[S]) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|(field, _)| !fields.iter().any(|excluded| excluded.as_ref() == field.as_str()))
            .flat_map(|(_, messages)| messages)
            .collect()
    }

    /// Messages for a field; empty if it has none.
    pub fn get(&self, field: &str) -> &[Message] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for a field
    pub fn get_first(&self, field: &str) -> Option<&Message> {
        self.get(field).first()
    }

    /// Whether a field has any messages.
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Field names in first-insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// Total number of messages across all fields
    pub fn count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Check if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Convert to JSON: field name to resolved message texts.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.messages
                .iter()
                .map(|(field, messages)| {
                    let texts = messages
                        .iter()
                        .map(|message| serde_json::Value::String(message.resolve()))
                        .collect();
                    (field.clone(), serde_json::Value::Array(texts))
                })
                .collect(),
        )
    }
}

impl Default for MessageBag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBag")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for MessageBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, messages) in &self.messages {
            for message in messages {
                writeln!(f, "{}: {}", field, message)?;
            }
        }
        Ok(())
    }
}

impl Serialize for MessageBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.messages.len()))?;
        for (field, messages) in &self.messages {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageArgs;

    fn field_and_key() -> Arc<dyn MessageResolver> {
        Arc::new(|field: &str, key: &str, _args: &MessageArgs| format!("{field}: {key}"))
    }

    fn filled_bag() -> MessageBag {
        let mut bag = MessageBag::with_resolver(field_and_key());
        bag.add("one", "foo");
        bag.add("one", "bar");
        bag.add("two", "baz");
        bag
    }

    fn texts(messages: Vec<&Message>) -> Vec<String> {
        messages.into_iter().map(Message::resolve).collect()
    }

    #[test]
    fn test_add_string_message() {
        let bag = filled_bag();
        assert_eq!(texts(bag.all()), vec!["one: foo", "one: bar", "two: baz"]);
    }

    #[test]
    fn test_add_message_instance() {
        let mut bag = MessageBag::new();
        bag.add("one", Message::new("one", "foo").resolved_by(field_and_key()));
        bag.add("one", Message::new("one", "bar").resolved_by(field_and_key()));
        bag.add("two", Message::new("two", "baz").resolved_by(field_and_key()));

        assert_eq!(texts(bag.all()), vec!["one: foo", "one: bar", "two: baz"]);
    }

    #[test]
    fn test_add_returns_wrapped_message() {
        let mut bag = MessageBag::with_resolver(field_and_key());
        let message = bag.add("name", "required".to_string());

        assert_eq!(message.field(), "name");
        assert_eq!(message.key(), "required");
        assert!(message.args().is_empty());
    }

    #[test]
    fn test_count_all_messages() {
        assert_eq!(MessageBag::new().count(), 0);
        assert_eq!(filled_bag().count(), 3);
    }

    #[test]
    fn test_field_order_follows_first_insertion() {
        let mut bag = MessageBag::with_resolver(field_and_key());
        bag.add("b", "first");
        bag.add("a", "second");
        bag.add("b", "third");

        assert_eq!(bag.fields().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(texts(bag.all()), vec!["b: first", "b: third", "a: second"]);
    }

    #[test]
    fn test_except_excludes_whole_fields() {
        let bag = filled_bag();

        assert_eq!(texts(bag.except(&["one"])), vec!["two: baz"]);
        assert_eq!(texts(bag.except(&["two"])), vec!["one: foo", "one: bar"]);
        assert_eq!(bag.except(&["one", "two"]).len(), 0);
        assert_eq!(bag.except::<&str>(&[]).len(), 3);
    }

    #[test]
    fn test_get_messages_for_field() {
        let bag = filled_bag();

        let messages = bag.get("two");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].resolve(), "two: baz");
        assert!(bag.get("three").is_empty());
    }

    #[test]
    fn test_get_first_message_for_field() {
        let bag = filled_bag();

        assert_eq!(bag.get_first("one").map(Message::resolve).as_deref(), Some("one: foo"));
        assert!(bag.get_first("three").is_none());
        assert!(bag.has("one"));
        assert!(!bag.has("three"));
    }

    #[test]
    fn test_check_if_empty() {
        assert!(MessageBag::new().is_empty());
        assert!(!filled_bag().is_empty());
    }

    #[test]
    fn test_serialize_to_json() {
        let bag = filled_bag();
        let expected = serde_json::json!({
            "one": ["one: foo", "one: bar"],
            "two": ["two: baz"]
        });

        assert_eq!(serde_json::to_value(&bag).unwrap(), expected);
        assert_eq!(bag.to_json(), expected);
        assert_eq!(
            serde_json::to_string(&bag).unwrap(),
            r#"{"one":["one: foo","one: bar"],"two":["two: baz"]}"#
        );
    }

    #[test]
    fn test_set_resolver_rebinds_existing_messages() {
        let mut bag = MessageBag::new();
        bag.add("name", "required");
        assert_eq!(bag.all()[0].resolve(), "The name is required.");

        bag.set_resolver(field_and_key());
        assert_eq!(bag.all()[0].resolve(), "name: required");

        bag.add("age", "integer");
        assert_eq!(bag.get_first("age").map(Message::resolve).as_deref(), Some("age: integer"));
    }

    #[test]
    fn test_display_lists_every_message() {
        let bag = filled_bag();
        assert_eq!(bag.to_string(), "one: one: foo\none: one: bar\ntwo: two: baz\n");
    }
}
