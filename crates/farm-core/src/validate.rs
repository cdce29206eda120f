//! Boundary validation. Economic code downstream assumes validated input.

use rust_decimal::Decimal;
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{Farm, Infrastructure, MarketPrice, Parcel, ParcelId, Region};
use crate::rules::GameRules;

/// Validation errors for domain invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Numeric field must be finite.
    #[error("non-finite numeric value encountered")]
    NonFinite,
    /// Fractions live in [0, 1].
    #[error("fraction {0} is outside [0,1]")]
    FractionOutOfRange(f64),
    /// pH outside the physical scale.
    #[error("pH {0} is outside [0,14]")]
    PhOutOfRange(f64),
    /// Quality score above 100.
    #[error("quality {0} exceeds 100")]
    QualityOutOfRange(u8),
    /// Area must be strictly positive.
    #[error("parcel {0} has non-positive area")]
    NonPositiveArea(ParcelId),
    /// Labor cost multiplier must be strictly positive.
    #[error("labor cost multiplier must be > 0")]
    NonPositiveLaborMultiplier,
    /// Price or cost must be non-negative.
    #[error("negative monetary value is invalid")]
    NegativeMoney,
    /// Infrastructure levels start at 1.
    #[error("infrastructure level must be >= 1")]
    ZeroLevel,
    /// Certified parcels must also be flagged organic.
    #[error("parcel {0} is certified organic but not organic")]
    CertifiedNotOrganic(ParcelId),
    /// Tree age and tree count must both be zero or both non-zero.
    #[error("parcel {0} has inconsistent tree age and planted tree count")]
    TreeAgeMismatch(ParcelId),
    /// Parcel ids are unique within a farm.
    #[error("duplicate parcel id: {0}")]
    DuplicateParcel(ParcelId),
    /// Inventory lot refers to a parcel the farm does not own.
    #[error("inventory references unknown parcel: {0}")]
    UnknownParcel(ParcelId),
    /// Game rules are inconsistent.
    #[error("invalid rules: {0}")]
    InvalidRules(&'static str),
}

/// Validate a region.
pub fn validate_region(r: &Region) -> Result<(), ValidationError> {
    if !r.market_size.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if r.market_size < 0.0 {
        return Err(ValidationError::NegativeMoney);
    }
    if r.labor_cost_multiplier <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveLaborMultiplier);
    }
    Ok(())
}

/// Validate a parcel.
pub fn validate_parcel(p: &Parcel) -> Result<(), ValidationError> {
    validate_region(&p.region)?;
    if !p.ph.is_finite() {
        return Err(ValidationError::NonFinite);
    }
    if !(0.0..=14.0).contains(&p.ph) {
        return Err(ValidationError::PhOutOfRange(p.ph));
    }
    if p.area_ha <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveArea(p.id.clone()));
    }
    if p.quality > 100 {
        return Err(ValidationError::QualityOutOfRange(p.quality));
    }
    if p.organic_certified && !p.is_organic {
        return Err(ValidationError::CertifiedNotOrganic(p.id.clone()));
    }
    if (p.tree_age == 0) != (p.planted_trees == 0) {
        return Err(ValidationError::TreeAgeMismatch(p.id.clone()));
    }
    Ok(())
}

/// Validate an infrastructure item.
pub fn validate_infrastructure(i: &Infrastructure) -> Result<(), ValidationError> {
    if i.level == 0 {
        return Err(ValidationError::ZeroLevel);
    }
    if i.maintenance_cost < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Validate a market snapshot.
pub fn validate_market(m: &MarketPrice) -> Result<(), ValidationError> {
    let fields = [
        m.wholesale_base_price,
        m.retail_base_price,
        m.demand_multiplier,
        m.season_multiplier,
        m.organic_premium,
        m.quality_bonus,
    ];
    if fields.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite);
    }
    if fields.iter().any(|v| *v < 0.0) {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Validate game rules.
pub fn validate_rules(r: &GameRules) -> Result<(), ValidationError> {
    let floats = [
        r.wholesale_base_price,
        r.retail_base_price,
        r.organic_premium,
        r.quality_bonus,
        r.demand_noise,
        r.water_action_gain,
        r.fertilize_action_gain,
        r.seasonal_water_loss,
    ];
    if floats.iter().any(|v| !v.is_finite()) {
        return Err(ValidationError::NonFinite);
    }
    if r.wholesale_base_price <= 0.0 || r.retail_base_price <= 0.0 {
        return Err(ValidationError::InvalidRules("base prices must be > 0"));
    }
    if !(0.0..1.0).contains(&r.demand_noise) {
        return Err(ValidationError::InvalidRules("demand noise must be in [0,1)"));
    }
    if r.organic_premium < 0.0 {
        return Err(ValidationError::InvalidRules("organic premium must be >= 0"));
    }
    if r.water_action_gain < 0.0
        || r.fertilize_action_gain < 0.0
        || r.seasonal_water_loss < 0.0
    {
        return Err(ValidationError::InvalidRules(
            "action gains and seasonal water loss must be >= 0",
        ));
    }
    if r.water_action_cost < Decimal::ZERO
        || r.fertilize_action_cost < Decimal::ZERO
        || r.tree_planting_cost < Decimal::ZERO
    {
        return Err(ValidationError::NegativeMoney);
    }
    Ok(())
}

/// Validate a whole farm, including cross-references from inventory lots.
pub fn validate_farm(farm: &Farm) -> Result<(), ValidationError> {
    if farm.cash < Decimal::ZERO {
        return Err(ValidationError::NegativeMoney);
    }
    let mut ids: BTreeSet<&ParcelId> = BTreeSet::new();
    for p in &farm.parcels {
        validate_parcel(p)?;
        if !ids.insert(&p.id) {
            return Err(ValidationError::DuplicateParcel(p.id.clone()));
        }
    }
    for i in &farm.infrastructure {
        validate_infrastructure(i)?;
    }
    for lot in &farm.inventory.lots {
        if !ids.contains(&lot.parcel_id) {
            return Err(ValidationError::UnknownParcel(lot.parcel_id.clone()));
        }
        if lot.quality > 100 {
            return Err(ValidationError::QualityOutOfRange(lot.quality));
        }
    }
    Ok(())
}
