//! Restore configuration: types, YAML parsing, and validation.

pub mod parser;
pub mod types;
pub mod validator;

pub use types::RestoreConfig;
