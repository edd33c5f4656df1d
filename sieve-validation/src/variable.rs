//! Per-field rule chains
//!
//! A [`Variable`] holds one input value and runs rules against it in call
//! order. Rules coerce the value, and failures are recorded as messages in
//! the owning validator's [`MessageBag`]; they are never returned as errors.
//!
//! The chain is governed by a [`RuleState`]:
//!
//! - `Process`: every rule runs.
//! - `Bail`: armed by [`Variable::bail`]; the next failure switches to `Ignore`.
//! - `Ignore`: every later rule is a no-op. Entered directly when `required`
//!   or a type assertion fails.
//!
//! Size and membership rules need a known type. Calling them before a type
//! assertion returns [`SieveError::AmbiguousType`], which signals a bug in the
//! calling code rather than bad input.

use crate::bag::MessageBag;
use crate::error::SieveError;
use crate::message::{Message, MessageArgs};
use crate::value::{self, ValueType};
use crate::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Rule-chain state of a [`Variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    /// Run every rule
    Process,
    /// Stop after the next failure
    Bail,
    /// Skip every remaining rule
    Ignore,
}

/// One input field being validated.
#[derive(Debug)]
pub struct Variable<'a> {
    errors: &'a mut MessageBag,
    name: String,
    value: Value,
    args: MessageArgs,
    ambiguous: bool,
    state: RuleState,
}

impl<'a> Variable<'a> {
    /// Create a variable reporting into `errors`.
    pub fn new(
        errors: &'a mut MessageBag,
        name: impl Into<String>,
        value: Value,
        args: MessageArgs,
    ) -> Self {
        Self {
            errors,
            name: name.into(),
            value,
            args,
            ambiguous: true,
            state: RuleState::Process,
        }
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current, possibly coerced, value
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the variable and return its value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Current rule-chain state
    pub fn state(&self) -> RuleState {
        self.state
    }

    /// Whether no type assertion has fixed the value's type yet
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// Args merged into every message this variable records
    pub fn args(&self) -> &MessageArgs {
        &self.args
    }

    /// Generic type of the current value.
    pub fn value_type(&self) -> ValueType {
        ValueType::of(&self.value)
    }

    /// Size of the current value: the number itself, the element count of a
    /// container, or the character count of a string.
    pub fn current_size(&self) -> Result<f64> {
        self.ensure_typed("size")?;
        Ok(value::measure(&self.value))
    }

    /// The value must not be blank.
    pub fn required(mut self) -> Self {
        if value::is_blank(&self.value) {
            self.state = RuleState::Ignore;
            self.fail("required", MessageArgs::new());
        }
        self
    }

    /// Replace a blank value with `fallback`.
    pub fn default(mut self, fallback: impl Into<Value>) -> Self {
        if value::is_blank(&self.value) {
            self.value = fallback.into();
        }
        self
    }

    /// The value is a string. Scalars are stringified.
    pub fn string(mut self) -> Self {
        if self.state == RuleState::Ignore {
            return self;
        }

        if self.value.is_null() {
            self.ambiguous = false;
            return self;
        }

        match value::stringify(&self.value) {
            Some(s) => {
                self.value = Value::String(s);
                self.ambiguous = false;
            }
            None => self.reject_type("string", Value::String(String::new())),
        }
        self
    }

    /// The value is an integer. Floats and numeric strings are truncated.
    pub fn integer(mut self) -> Self {
        if self.state == RuleState::Ignore {
            return self;
        }

        if self.value.is_null() {
            self.ambiguous = false;
            return self;
        }

        match value::numeric(&self.value) {
            Some(n) => {
                self.value = Value::from(n.to_i64());
                self.ambiguous = false;
            }
            None => self.reject_type("integer", Value::from(0)),
        }
        self
    }

    /// The value is a float. Integers and numeric strings are converted.
    pub fn float(mut self) -> Self {
        if self.state == RuleState::Ignore {
            return self;
        }

        if self.value.is_null() {
            self.ambiguous = false;
            return self;
        }

        match value::numeric(&self.value) {
            Some(n) => {
                self.value = Value::from(n.to_f64());
                self.ambiguous = false;
            }
            None => self.reject_type("float", Value::from(0.0)),
        }
        self
    }

    /// The value is a boolean: `true` only for the literal truthy tokens
    /// `"yes"`, `"on"`, `"1"`, `1`, `true` and `"true"`. Never fails.
    pub fn boolean(mut self) -> Self {
        self.value = Value::Bool(value::is_truthy_token(&self.value));
        self.ambiguous = false;
        self
    }

    /// The value is a sequence or a mapping.
    pub fn array(mut self) -> Self {
        if self.state == RuleState::Ignore {
            return self;
        }

        match self.value {
            Value::Null | Value::Array(_) | Value::Object(_) => self.ambiguous = false,
            _ => self.reject_type("array", Value::Array(Vec::new())),
        }
        self
    }

    /// Stop validating after the next failure.
    pub fn bail(mut self) -> Self {
        if self.state != RuleState::Ignore {
            self.state = RuleState::Bail;
        }
        self
    }

    /// The value's size must be within `[min, max]`.
    pub fn between(self, min: i64, max: i64) -> Result<Self> {
        self.check_size(
            "between",
            |size| size < min as f64 || size > max as f64,
            [("min", min), ("max", max)],
        )
    }

    /// The value's size must be at most `max`.
    pub fn max(self, max: i64) -> Result<Self> {
        self.check_size("max", |size| size > max as f64, [("max", max)])
    }

    /// The value's size must be at least `min`.
    pub fn min(self, min: i64) -> Result<Self> {
        self.check_size("min", |size| size < min as f64, [("min", min)])
    }

    /// The value's size must be exactly `size`.
    pub fn size(self, size: i64) -> Result<Self> {
        self.check_size("size", |actual| actual != size as f64, [("size", size)])
    }

    /// The value must strictly equal one of `values`.
    pub fn one_of<I, V>(self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.check_membership(values, true)
    }

    /// The value must loosely equal one of `values`; `"1"` matches `1`.
    pub fn one_of_loose<I, V>(self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.check_membership(values, false)
    }

    fn check_size<const N: usize>(
        mut self,
        rule: &'static str,
        violated: impl FnOnce(f64) -> bool,
        bounds: [(&str, i64); N],
    ) -> Result<Self> {
        if self.state == RuleState::Ignore {
            return Ok(self);
        }

        self.ensure_typed(rule)?;

        if violated(value::measure(&self.value)) {
            let key = format!("{}.{}", rule, self.value_type());
            let args = bounds
                .into_iter()
                .map(|(name, bound)| (name.to_string(), Value::from(bound)))
                .collect();
            self.fail(key, args);
        }

        Ok(self)
    }

    fn check_membership<I, V>(mut self, values: I, strict: bool) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.state == RuleState::Ignore {
            return Ok(self);
        }

        self.ensure_typed("in")?;

        let candidates: Vec<Value> = values.into_iter().map(Into::into).collect();
        let found = candidates.iter().any(|candidate| {
            if strict {
                value::strict_eq(&self.value, candidate)
            } else {
                value::loose_eq(&self.value, candidate)
            }
        });

        if !found {
            let joined = candidates
                .iter()
                .map(value::display_value)
                .collect::<Vec<_>>()
                .join(", ");

            let mut args = MessageArgs::new();
            args.insert("values".to_string(), Value::String(joined));
            self.fail("in", args);
        }

        Ok(self)
    }

    fn ensure_typed(&self, rule: &'static str) -> Result<()> {
        if self.ambiguous {
            warn!(field = %self.name, rule, "rule applied to a variable of ambiguous type");
            return Err(SieveError::AmbiguousType {
                field: self.name.clone(),
                rule,
            });
        }
        Ok(())
    }

    fn reject_type(&mut self, key: &str, reset: Value) {
        self.value = reset;
        self.state = RuleState::Ignore;
        self.fail(key, MessageArgs::new());
    }

    // Every failure goes through here so that an armed bail always fires.
    fn fail(&mut self, key: impl Into<String>, extra: MessageArgs) {
        if self.state == RuleState::Bail {
            self.state = RuleState::Ignore;
        }

        let key = key.into();
        debug!(field = %self.name, key = %key, state = ?self.state, "validation rule failed");

        let mut args = self.args.clone();
        args.extend(extra);

        let message = Message::with_args(self.name.clone(), key, args)
            .resolved_by(Arc::clone(self.errors.resolver()));
        self.errors.add(&self.name, message);
    }
}
