//! Form field validation for the User Admin Console.
//!
//! A [`ValidationEngine`] owns a form's values together with two pieces of
//! per-field bookkeeping:
//!
//! - **errors**: the message of the first failing rule, absent when the field
//!   is valid or was never validated
//! - **touched**: whether the user interacted with the field, tracked
//!   independently of validity so the UI can hold back errors until then
//!
//! Rules are declared up front in a [`Schema`]: an ordered chain of pure
//! [`Rule`]s per field. Evaluation stops at the first failing rule, so each
//! field reports at most one message.
//!
//! # Example
//!
//! ```ignore
//! use uac_validate::{Schema, ValidationEngine, email, required};
//!
//! let schema = Schema::new()
//!     .field("full_name", vec![required()])
//!     .field("email", vec![required(), email()]);
//! let mut form = ValidationEngine::new(initial_values, schema);
//!
//! form.set_field("email", "ann@".to_string());
//! form.touch_field(&"email");
//! if !form.validate_all() {
//!     println!("{:?}", form.visible_error(&"email"));
//! }
//! ```

mod engine;
mod rule;
mod rules;

pub use engine::ValidationEngine;
pub use rule::{FieldValue, Rule, Schema, Values};
pub use rules::{
    DEFAULT_EMAIL_MESSAGE, DEFAULT_REQUIRED_MESSAGE, email, email_message, required,
    required_message,
};
