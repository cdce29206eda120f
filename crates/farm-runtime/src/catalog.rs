//! Land and infrastructure price list.

use farm_core::InfrastructureKind;
use rust_decimal::Decimal;

/// Base land price, PLN per hectare.
pub const LAND_PRICE_PER_HA: i64 = 60_000;

pub fn land_price(area_ha: Decimal) -> Decimal {
    area_ha * Decimal::from(LAND_PRICE_PER_HA)
}

/// Price of one level of `kind`, PLN.
pub fn purchase_price(kind: InfrastructureKind) -> Decimal {
    let pln = match kind {
        InfrastructureKind::Sprayer => 12_000,
        InfrastructureKind::Shaker => 60_000,
        InfrastructureKind::Tractor => 30_000,
        InfrastructureKind::Warehouse => 25_000,
        InfrastructureKind::ColdStorage => 40_000,
        InfrastructureKind::ProcessingFacility => 100_000,
        InfrastructureKind::SocialFacilities => 15_000,
    };
    Decimal::from(pln)
}

/// Upkeep per season at `level`: 2% of the purchase price per level.
pub fn maintenance_cost(kind: InfrastructureKind, level: u32) -> Decimal {
    purchase_price(kind) * Decimal::from(level) / Decimal::from(50)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upkeep_scales_with_level() {
        assert_eq!(
            maintenance_cost(InfrastructureKind::Tractor, 1),
            Decimal::from(600)
        );
        assert_eq!(
            maintenance_cost(InfrastructureKind::Shaker, 2),
            Decimal::from(2_400)
        );
        assert_eq!(
            maintenance_cost(InfrastructureKind::Sprayer, 1),
            Decimal::from(240)
        );
    }

    #[test]
    fn land_is_priced_per_hectare() {
        assert_eq!(land_price(Decimal::ONE), Decimal::from(60_000));
        assert_eq!(land_price(Decimal::new(25, 1)), Decimal::from(150_000));
    }
}
