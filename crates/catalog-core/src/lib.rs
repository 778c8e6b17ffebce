//! # Catalog Core
//!
//! Core types, errors and validation for the catalog API.
//! Every other crate in the workspace builds on the abstractions here.

pub mod domain;
pub mod error;
pub mod id;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
