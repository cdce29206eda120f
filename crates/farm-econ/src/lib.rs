#![deny(warnings)]

//! Economic model of a cherry farm.
//!
//! This crate provides the pure calculations shared by season settlement and
//! client-side previews:
//! - [`modifiers`]: lookup tables for soil, pH, water, tree age and machinery
//! - [`yields`]: per-parcel harvest projection
//! - [`costs`]: seasonal running costs
//! - [`pricing`]: unit prices for wholesale and retail sales
//! - [`stability`]: cash runway until the next harvest

use thiserror::Error;

pub mod costs;
pub mod modifiers;
pub mod pricing;
pub mod stability;
pub mod yields;

pub use costs::{estimate_season_costs, CostBreakdown, ParcelCosts};
pub use pricing::{quote, refresh_market, unit_price, PriceQuote, PricingContext, QualityTier, SaleChannel};
pub use stability::{check_stability, StabilityReport};
pub use yields::{compute_yield, is_harvest_ready, YieldBreakdown};

/// Errors produced when economic values leave the finite domain.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Numeric conversion to money failed.
    #[error("non-finite numeric conversion")]
    NonFinite,
}
