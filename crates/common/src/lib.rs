//! Common types, wire protocol definitions, and errors shared across `token-svc` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
