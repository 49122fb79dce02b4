//! # rusty-forms
//!
//! Declarative record validation with server-side strategies and
//! client-side mirrors.
//!
//! ## Quick Start
//!
//! ```rust
//! use rusty_forms::employee::{self, Employee};
//! use rusty_forms::{Config, Strategy, Validator};
//!
//! let config = Config::default();
//! let catalog = employee::catalog(&config.employee).expect("valid rule configuration");
//! let validator = Validator::new(&catalog);
//!
//! let record = Employee::sample();
//! assert!(!validator.try_validate_model(&record));
//!
//! let errors = validator.run(&record, &Strategy::Object);
//! assert_eq!(errors.label(), "Invalid Employee Model");
//! for message in &errors {
//!     println!("{}", message);
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`rule`** - Rule descriptors: parameters, message templates, evaluation
//! - **`catalog`** - Ordered rules per field plus record-scope rules, checked at registration
//! - **`context`** - The record abstraction and per-call validation context
//! - **`executor`** - The model, object and property strategies
//! - **`errors`** - The uniform labelled error list
//! - **`client`** - Attribute tokens for client-side evaluators
//!
//! The whitelist tokens emitted by [`client`] are consumed by the
//! `rusty-forms-wasm` crate, which re-implements the membership check on its
//! own so the browser never needs this crate.

pub mod catalog;
pub mod client;
pub mod config;
pub mod context;
pub mod employee;
pub mod errors;
pub mod executor;
pub mod message;
pub mod rule;
pub mod value;

// Re-export core types
pub use catalog::{FieldEntry, RegistrationError, RuleCatalog, RuleCatalogBuilder, RECORD_KEY};
pub use client::{client_mirrors, ClientMirror, FieldAttrs};
pub use config::Config;
pub use context::{DisplayNames, Record, ValidationContext};
pub use errors::{ValidationErrors, ValidationErrorsBuilder, Violation};
pub use executor::{Strategy, StrategyKind, UnknownStrategy, Validator};
pub use rule::{
    AllowedValues, DeclaredEnum, EnumType, Outcome, Rule, RuleSpec, Scope, ALLOWED_DELIMITER,
};
pub use value::Value;
