//! Price range selection and the server's global price bounds.
//!
//! A selected bound of `None` means "at the default bound". The server only
//! needs a bound when it narrows the catalog, and the "active" badge only
//! lights up when a bound sits inside the global range.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Global price bounds reported by the metadata endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceBounds {
    /// Cheapest published product.
    #[serde(default)]
    pub min: Decimal,
    /// Most expensive published product.
    #[serde(default)]
    pub max: Decimal,
}

impl PriceBounds {
    /// Create new bounds.
    #[must_use]
    pub const fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// Whether the server reported any bounds at all.
    ///
    /// An empty catalog reports `0..0`, which must not be used to clamp
    /// selections.
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.max > Decimal::ZERO
    }
}

/// The user's selected price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    /// Lower bound, `None` when unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    /// Upper bound, `None` when unrestricted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl PriceRange {
    /// Create a range from optional bounds.
    #[must_use]
    pub const fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether the range narrows the catalog relative to `bounds`.
    ///
    /// The lower bound is active when it is above zero; the upper bound is
    /// active when it is below the global maximum. Without known bounds an
    /// upper bound can never be judged active.
    #[must_use]
    pub fn is_active(&self, bounds: &PriceBounds) -> bool {
        let min_active = self.min.is_some_and(|min| min > Decimal::ZERO);
        let max_active = bounds.is_known() && self.max.is_some_and(|max| max < bounds.max);
        min_active || max_active
    }

    /// Drop bounds that do not narrow the catalog.
    ///
    /// A lower bound at or below zero (or at or below the global minimum) and
    /// an upper bound at or above the global maximum carry no information.
    #[must_use]
    pub fn normalized(self, bounds: &PriceBounds) -> Self {
        let min = self
            .min
            .filter(|min| *min > Decimal::ZERO && (!bounds.is_known() || *min > bounds.min));
        let max = self
            .max
            .filter(|max| !bounds.is_known() || *max < bounds.max);
        Self { min, max }
    }

    /// The bounds to show in the price inputs: selection first, then the
    /// global bounds.
    #[must_use]
    pub fn effective(&self, bounds: &PriceBounds) -> (Decimal, Decimal) {
        (
            self.min.unwrap_or(bounds.min),
            self.max.unwrap_or(bounds.max),
        )
    }
}
