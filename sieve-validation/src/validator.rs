//! Input orchestration
//!
//! A [`Validator`] owns the raw input and the [`MessageBag`] that every
//! [`Variable`] it hands out reports into. Chains run eagerly, so by the time
//! [`Validator::passes`] is called all rule failures are already recorded.
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::Validator;
//!
//! let mut validator = Validator::new(json!({ "name": "Mario", "age": "thirty" }));
//!
//! let name = validator.string("name", None).max(20)?.into_value();
//! let age = validator.integer("age", Some(18)).into_value();
//!
//! assert_eq!(name, json!("Mario"));
//! assert_eq!(age, json!(0));
//! assert!(!validator.passes(false));
//! assert_eq!(validator.errors().get_first("age").unwrap().to_string(), "The age must be a number.");
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```

use crate::bag::MessageBag;
use crate::config::ValidationConfig;
use crate::error::SieveError;
use crate::message::{Message, MessageArgs, MessageResolver};
use crate::token::TokenProvider;
use crate::variable::Variable;
use crate::Result;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Validates one set of input values.
pub struct Validator {
    input: Value,
    errors: MessageBag,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl Validator {
    /// Create a validator over `input` using the built-in messages.
    pub fn new(input: Value) -> Self {
        Self {
            input,
            errors: MessageBag::new(),
            token_provider: None,
        }
    }

    /// Create a validator whose messages follow `config`.
    pub fn from_config(input: Value, config: &ValidationConfig) -> Self {
        Self::new(input).with_resolver(Arc::new(config.resolver()))
    }

    /// Parse a JSON body. The top level must be an object.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        let input: Value = serde_json::from_slice(body)?;
        if !input.is_object() {
            return Err(SieveError::InvalidInput(format!(
                "expected a JSON object, found {}",
                json_type_name(&input)
            )));
        }
        Ok(Self::new(input))
    }

    /// Parse an `application/x-www-form-urlencoded` body. Repeated keys keep
    /// the last value.
    pub fn from_urlencoded(body: &str) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)?;
        let input: Map<String, Value> = pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        Ok(Self::new(Value::Object(input)))
    }

    /// Resolve messages through `resolver`.
    pub fn with_resolver(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.errors.set_resolver(resolver);
        self
    }

    /// Check the anti-forgery token against `provider` in [`passes`](Self::passes).
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    /// Raw input
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Error messages recorded so far
    pub fn errors(&self) -> &MessageBag {
        &self.errors
    }

    /// Mutable access to the error messages, for checks that live outside a
    /// rule chain.
    pub fn errors_mut(&mut self) -> &mut MessageBag {
        &mut self.errors
    }

    /// Look up an input value.
    ///
    /// A key that exists verbatim wins, even if it contains dots. Otherwise a
    /// dotted key walks nested values one segment at a time: objects by key,
    /// arrays by numeric index.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let root = self.input.as_object()?;

        if let Some(value) = root.get(key) {
            return Some(value);
        }

        if !key.contains('.') {
            return None;
        }

        key.split('.').try_fold(&self.input, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
    }

    /// Input value for `key`, or `fallback` if there is none.
    pub fn get_value(&self, key: &str, fallback: Value) -> Value {
        self.lookup(key).cloned().unwrap_or(fallback)
    }

    /// Start a rule chain for `key`.
    ///
    /// Without a default the field is required; with one, a blank value is
    /// replaced by it.
    pub fn retrieve(&mut self, key: &str, default: Option<Value>) -> Variable<'_> {
        self.retrieve_with_args(key, default, MessageArgs::new())
    }

    /// Like [`retrieve`](Self::retrieve), merging `args` into every message
    /// the chain records.
    pub fn retrieve_with_args(
        &mut self,
        key: &str,
        default: Option<Value>,
        args: MessageArgs,
    ) -> Variable<'_> {
        let value = self.get_value(key, Value::Null);
        let variable = Variable::new(&mut self.errors, key, value, args);

        match default {
            None => variable.required(),
            Some(fallback) => variable.default(fallback),
        }
    }

    /// Retrieve `key` as a string.
    pub fn string(&mut self, key: &str, default: Option<&str>) -> Variable<'_> {
        self.string_with_args(key, default, MessageArgs::new())
    }

    /// Like [`string`](Self::string), merging `args` into every message.
    pub fn string_with_args(
        &mut self,
        key: &str,
        default: Option<&str>,
        args: MessageArgs,
    ) -> Variable<'_> {
        self.retrieve_with_args(key, default.map(Value::from), args)
            .string()
    }

    /// Retrieve `key` as an integer.
    pub fn integer(&mut self, key: &str, default: Option<i64>) -> Variable<'_> {
        self.integer_with_args(key, default, MessageArgs::new())
    }

    /// Like [`integer`](Self::integer), merging `args` into every message.
    pub fn integer_with_args(
        &mut self,
        key: &str,
        default: Option<i64>,
        args: MessageArgs,
    ) -> Variable<'_> {
        self.retrieve_with_args(key, default.map(Value::from), args)
            .integer()
    }

    /// Retrieve `key` as a float.
    pub fn float(&mut self, key: &str, default: Option<f64>) -> Variable<'_> {
        self.float_with_args(key, default, MessageArgs::new())
    }

    /// Like [`float`](Self::float), merging `args` into every message.
    pub fn float_with_args(
        &mut self,
        key: &str,
        default: Option<f64>,
        args: MessageArgs,
    ) -> Variable<'_> {
        self.retrieve_with_args(key, default.map(Value::from), args)
            .float()
    }

    /// Retrieve `key` as a boolean.
    pub fn boolean(&mut self, key: &str, default: Option<bool>) -> Variable<'_> {
        self.boolean_with_args(key, default, MessageArgs::new())
    }

    /// Like [`boolean`](Self::boolean), merging `args` into every message.
    pub fn boolean_with_args(
        &mut self,
        key: &str,
        default: Option<bool>,
        args: MessageArgs,
    ) -> Variable<'_> {
        self.retrieve_with_args(key, default.map(Value::from), args)
            .boolean()
    }

    /// Retrieve `key` as an array or object.
    pub fn array(&mut self, key: &str, default: Option<Value>) -> Variable<'_> {
        self.array_with_args(key, default, MessageArgs::new())
    }

    /// Like [`array`](Self::array), merging `args` into every message.
    pub fn array_with_args(
        &mut self,
        key: &str,
        default: Option<Value>,
        args: MessageArgs,
    ) -> Variable<'_> {
        self.retrieve_with_args(key, default, args).array()
    }

    /// Whether no errors have been recorded.
    ///
    /// With `expect_token`, the input's token must also equal the one the
    /// token provider expects; a mismatch records a `token` message. Each call
    /// checks again, so a failing token is recorded once per call.
    pub fn passes(&mut self, expect_token: bool) -> bool {
        if expect_token {
            self.check_token();
        }
        self.errors.is_empty()
    }

    fn check_token(&mut self) {
        let Some(provider) = self.token_provider.clone() else {
            debug!("no token provider configured, skipping token check");
            return;
        };

        let key = provider.token_key(self);
        let expected = provider.token_value(self);

        let matches = matches!(self.lookup(&key), Some(Value::String(actual)) if *actual == expected);
        if !matches {
            warn!(field = %key, "token mismatch");
            let message =
                Message::new("token", "token").resolved_by(Arc::clone(self.errors.resolver()));
            self.errors.add(&key, message);
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("input", &self.input)
            .field("errors", &self.errors)
            .field("token_provider", &self.token_provider.is_some())
            .finish()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
