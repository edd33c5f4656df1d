// Sieve - coerce-or-reject validation for untrusted form input
//
// This library re-exports the validation engine and offers a prelude with the
// types most handlers need.

// Re-export the validation engine
pub use sieve_validation::*;

/// Prelude for common imports.
///
/// ```
/// use sieve::prelude::*;
///
/// let mut validator = Validator::new(json!({ "page": "3" }));
/// let page = validator.integer("page", Some(1)).min(1)?.into_value();
///
/// assert_eq!(page, json!(3));
/// assert!(validator.passes(false));
/// # Ok::<(), SieveError>(())
/// ```
pub mod prelude {
    pub use crate::{
        CatalogResolver, DefaultMessageResolver, Message, MessageArgs, MessageBag,
        MessageCatalog, MessageResolver, RuleState, SieveError, StaticTokenProvider,
        TokenProvider, ValidationConfig, Validator, Variable,
    };

    pub use serde_json::{Value, json};
}
