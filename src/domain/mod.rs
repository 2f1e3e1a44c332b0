//! Domain layer - Pure business abstractions
//!
//! Repository contracts, request payloads with their validation rules,
//! closed vocabularies and the domain error type.

pub mod errors;
pub mod inputs;
pub mod repositories;
pub mod types;
pub mod validation;

pub use errors::DomainError;
pub use repositories::*;
pub use types::*;
