//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on store boundary traits.

pub mod error;
pub mod error_ext;
pub mod hash;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use hash::roster_fingerprint;
