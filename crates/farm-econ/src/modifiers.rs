//! Lookup tables turning physical parcel state and owned infrastructure into
//! dimensionless multipliers.
//!
//! All functions are total: out-of-range inputs fall into the nearest
//! bucket instead of failing.

use farm_core::{Infrastructure, InfrastructureKind, SoilType};
use rust_decimal::Decimal;

/// Oldest productive tree age in seasons; older trees are senescent.
pub const MAX_PRODUCTIVE_TREE_AGE: u32 = 40;

/// Labor can never be fully automated away.
pub const LABOR_EFFICIENCY_FLOOR: Decimal = Decimal::from_parts(2, 0, 0, false, 1);

/// Yield share by tree age: young trees ramp up over two seasons.
pub fn age_modifier(age: u32) -> f64 {
    match age {
        0 => 0.0,
        1 => 0.33,
        2 => 0.66,
        3..=MAX_PRODUCTIVE_TREE_AGE => 1.0,
        _ => 0.0,
    }
}

pub fn soil_modifier(soil: SoilType) -> f64 {
    match soil {
        SoilType::SandyClay => 1.0,
        SoilType::Clay => 0.9,
        SoilType::Sandy => 0.85,
        SoilType::Waterlogged => 0.6,
    }
}

/// Cherries prefer neutral soil; NaN falls into the worst bucket.
pub fn ph_modifier(ph: f64) -> f64 {
    if (6.0..=7.0).contains(&ph) {
        1.0
    } else if (5.5..6.0).contains(&ph) || (ph > 7.0 && ph <= 7.5) {
        0.9
    } else {
        0.7
    }
}

/// Drought below 0.3, waterlogging above 0.8.
pub fn water_modifier(level: f64) -> f64 {
    if level < 0.3 {
        0.7
    } else if level > 0.8 {
        0.85
    } else {
        1.0
    }
}

pub fn organic_yield_modifier(is_organic: bool) -> f64 {
    if is_organic {
        0.8
    } else {
        1.0
    }
}

/// Additive machinery bonus, unbounded above.
pub fn infrastructure_yield_modifier(infra: &[Infrastructure]) -> f64 {
    infra.iter().fold(1.0, |acc, i| {
        let level = f64::from(i.level);
        let per_level = match i.kind {
            InfrastructureKind::Tractor => 0.05,
            InfrastructureKind::Shaker => 0.08,
            InfrastructureKind::Sprayer => 0.03,
            InfrastructureKind::ColdStorage => 0.02,
            InfrastructureKind::Warehouse
            | InfrastructureKind::ProcessingFacility
            | InfrastructureKind::SocialFacilities => 0.0,
        };
        acc + per_level * level
    })
}

/// Share of baseline labor still needed given owned machinery, in [0.2, 1].
///
/// Kept in `Decimal` because it multiplies money directly.
pub fn labor_efficiency(infra: &[Infrastructure]) -> Decimal {
    let mut efficiency = Decimal::ONE;
    for i in infra {
        let per_level = match i.kind {
            InfrastructureKind::Tractor => Decimal::new(15, 2),
            InfrastructureKind::Shaker => Decimal::new(30, 2),
            InfrastructureKind::SocialFacilities => Decimal::new(5, 2),
            _ => continue,
        };
        efficiency -= per_level * Decimal::from(i.level);
    }
    efficiency.max(LABOR_EFFICIENCY_FLOOR)
}
