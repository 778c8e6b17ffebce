//! Typed ID wrappers for domain entities.
//!
//! Both resources use database-assigned `BIGINT` keys. A valid ID is always
//! strictly positive; `parse` rejects anything else so handlers can answer
//! with a 400 before touching the service layer.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A strongly-typed wrapper for product IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl ProductId {
    /// Creates a product ID from a raw key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parses a product ID from a path segment.
    ///
    /// Returns `None` for non-numeric input and for values `<= 0`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        parse_positive(s).map(Self)
    }

    /// Returns the inner key.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

/// A strongly-typed wrapper for category IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl CategoryId {
    /// Creates a category ID from a raw key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parses a category ID from a path segment.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        parse_positive(s).map(Self)
    }

    /// Returns the inner key.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<CategoryId> for i64 {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

fn parse_positive(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
