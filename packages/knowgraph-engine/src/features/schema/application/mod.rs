//! Schema application services

mod validator;

pub use validator::SchemaValidator;
