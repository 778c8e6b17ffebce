//! HTTP middleware.

mod auth;
mod cors;
mod logging;
mod timeout;
mod trace;

pub use auth::*;
pub use cors::*;
pub use logging::*;
pub use timeout::*;
pub use trace::*;
