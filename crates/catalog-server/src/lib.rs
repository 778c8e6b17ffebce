//! # Catalog Server Library
//!
//! Wiring for the catalog API binary: the Shaku module, the application
//! lifecycle and the ordered shutdown of pools and exporters.

pub mod app;
pub mod di;
pub mod shutdown;
pub mod startup;
