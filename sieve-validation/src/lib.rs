//! Coerce-or-reject validation for untyped form input
//!
//! Each field is retrieved from the input as a [`Variable`] and run through a
//! chain of rules. Type rules coerce the value in place; every failure is
//! recorded in the validator's [`MessageBag`] as a lazily resolved
//! [`Message`], and the chain decides for itself whether to keep going.
//!
//! # Examples
//!
//! ## Validating a form
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::Validator;
//!
//! let mut validator = Validator::new(json!({
//!     "username": "toad",
//!     "age": "27",
//!     "role": "moderator",
//! }));
//!
//! let username = validator.string("username", None).between(3, 20)?.into_value();
//! let age = validator.integer("age", None).min(13)?.into_value();
//! let role = validator.string("role", Some("user")).one_of(["user", "admin"])?.into_value();
//! let remember = validator.boolean("remember", Some(false)).into_value();
//!
//! assert_eq!(username, json!("toad"));
//! assert_eq!(age, json!(27));
//! assert_eq!(role, json!("moderator"));
//! assert_eq!(remember, json!(false));
//!
//! assert!(!validator.passes(false));
//! assert_eq!(
//!     validator.errors().get_first("role").unwrap().to_string(),
//!     "The role must be one of user, admin."
//! );
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```
//!
//! ## Stopping at the first failure
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::Validator;
//!
//! let mut validator = Validator::new(json!({ "code": "far too long" }));
//!
//! validator.string("code", None).bail().size(4)?.one_of(["ABCD", "WXYZ"])?;
//!
//! assert_eq!(validator.errors().count(), 1);
//! assert_eq!(validator.errors().all()[0].key(), "size.string");
//! # Ok::<(), sieve_validation::SieveError>(())
//! ```
//!
//! ## Custom messages
//!
//! ```
//! use serde_json::json;
//! use sieve_validation::{ValidationConfig, Validator};
//!
//! let config = ValidationConfig::default().with_message("required", "Please enter your {field}.");
//! let mut validator = Validator::from_config(json!({}), &config);
//!
//! validator.string("email", None);
//!
//! assert_eq!(validator.errors().to_json(), json!({ "email": ["Please enter your email."] }));
//! ```

mod bag;
mod catalog;
mod config;
mod error;
mod message;
mod resolver;
mod token;
mod validator;
mod value;
mod variable;

pub use bag::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use message::*;
pub use resolver::{DefaultMessageResolver, default_resolver};
pub use token::*;
pub use validator::*;
pub use value::{ValueType, display_value, is_blank, stringify};
pub use variable::*;

/// Result type for sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;
