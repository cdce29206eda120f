//! Seasonal running-cost estimation.
//!
//! The same functions back both the season-end settlement and the on-demand
//! "next season cost" preview, so the two can never drift apart.

use farm_core::{Farm, Infrastructure, Parcel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::modifiers::labor_efficiency;

/// Fertilizer, PLN/ha per season.
pub const FERTILIZER_PER_HA: i64 = 1_500;
pub const ORGANIC_FERTILIZER_PER_HA: i64 = 3_000;
/// Plant protection, PLN/ha per season.
pub const PROTECTION_PER_HA: i64 = 1_000;
pub const ORGANIC_PROTECTION_PER_HA: i64 = 2_000;
/// Fuel, PLN/ha per season.
pub const FUEL_PER_HA: i64 = 500;
/// Baseline labor, PLN/ha per season before the regional multiplier.
pub const LABOR_PER_HA: i64 = 8_000;

/// Itemized running costs of one season, in PLN.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub maintenance: Decimal,
    pub fertilizer: Decimal,
    pub protection: Decimal,
    pub fuel: Decimal,
    pub labor: Decimal,
    pub certification: Decimal,
    /// fertilizer + protection + fuel + labor + certification
    pub operational_subtotal: Decimal,
    /// maintenance + operational_subtotal
    pub total: Decimal,
}

/// Variable costs attributable to a single parcel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ParcelCosts {
    pub fertilizer: Decimal,
    pub protection: Decimal,
    pub fuel: Decimal,
    /// Labor after the farm-wide efficiency discount.
    pub labor: Decimal,
}

impl ParcelCosts {
    /// Fertilizer, protection and fuel.
    pub fn inputs(&self) -> Decimal {
        self.fertilizer + self.protection + self.fuel
    }
}

/// Variable costs of one parcel given the farm's labor efficiency.
pub fn parcel_costs(parcel: &Parcel, labor_efficiency: Decimal) -> ParcelCosts {
    let area = parcel.area_ha;
    let (fertilizer, protection) = if parcel.is_organic {
        (ORGANIC_FERTILIZER_PER_HA, ORGANIC_PROTECTION_PER_HA)
    } else {
        (FERTILIZER_PER_HA, PROTECTION_PER_HA)
    };
    let labor_base = area * Decimal::from(LABOR_PER_HA) * parcel.region.labor_cost_multiplier;
    ParcelCosts {
        fertilizer: area * Decimal::from(fertilizer),
        protection: area * Decimal::from(protection),
        fuel: area * Decimal::from(FUEL_PER_HA),
        labor: labor_base * labor_efficiency,
    }
}

/// Flat organic certification fee, tiered by total organic area in hectares.
pub fn certification_fee(organic_area_ha: Decimal) -> Decimal {
    let fee = if organic_area_ha < Decimal::from(5) {
        1_500
    } else if organic_area_ha < Decimal::from(20) {
        1_800
    } else if organic_area_ha < Decimal::from(50) {
        2_090
    } else {
        2_500
    };
    Decimal::from(fee)
}

/// Certification fee owed this season: charged once per farm while any parcel is organic.
pub fn season_certification(parcels: &[Parcel]) -> Decimal {
    let organic_area: Decimal = parcels
        .iter()
        .filter(|p| p.is_organic)
        .map(|p| p.area_ha)
        .sum();
    if parcels.iter().any(|p| p.is_organic) {
        certification_fee(organic_area)
    } else {
        Decimal::ZERO
    }
}

pub fn maintenance(infra: &[Infrastructure]) -> Decimal {
    infra.iter().map(|i| i.maintenance_cost).sum()
}

/// Running costs of a season for the given parcels and infrastructure.
pub fn estimate_costs(parcels: &[Parcel], infra: &[Infrastructure]) -> CostBreakdown {
    let efficiency = labor_efficiency(infra);
    let mut out = CostBreakdown {
        maintenance: maintenance(infra),
        certification: season_certification(parcels),
        ..CostBreakdown::default()
    };
    for p in parcels {
        let c = parcel_costs(p, efficiency);
        out.fertilizer += c.fertilizer;
        out.protection += c.protection;
        out.fuel += c.fuel;
        out.labor += c.labor;
    }
    out.operational_subtotal =
        out.fertilizer + out.protection + out.fuel + out.labor + out.certification;
    out.total = out.maintenance + out.operational_subtotal;
    out
}

/// Running costs of the farm's coming season settlement.
pub fn estimate_season_costs(farm: &Farm) -> CostBreakdown {
    estimate_costs(&farm.parcels, &farm.infrastructure)
}
