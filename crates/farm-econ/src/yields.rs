//! Parcel yield projection.

use farm_core::{Infrastructure, Parcel, Season};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::modifiers::{
    age_modifier, infrastructure_yield_modifier, organic_yield_modifier, ph_modifier,
    soil_modifier, water_modifier, MAX_PRODUCTIVE_TREE_AGE,
};

/// Yield of a mature orchard on ideal land, kg per hectare per season.
pub const BASE_YIELD_KG_PER_HA: f64 = 25_000.0;

/// Itemized yield of one parcel, as shown in tooltips and used by the harvest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YieldBreakdown {
    pub base_yield: f64,
    pub soil_mod: f64,
    pub ph_mod: f64,
    pub fertility_mod: f64,
    pub water_mod: f64,
    pub organic_mod: f64,
    pub infra_mod: f64,
    pub age_mod: f64,
    /// kg per hectare.
    pub total_yield_per_ha: f64,
    /// kg for the whole parcel.
    pub parcel_yield_kg: f64,
}

impl YieldBreakdown {
    /// Whole kilograms actually picked.
    pub fn harvestable_kg(&self) -> u64 {
        if self.parcel_yield_kg.is_finite() && self.parcel_yield_kg > 0.0 {
            self.parcel_yield_kg.floor() as u64
        } else {
            0
        }
    }
}

/// Project the season's yield of `parcel` given the farm's infrastructure.
///
/// per_ha = base × soil × pH × fertility × infra × water × organic × age
pub fn compute_yield(parcel: &Parcel, infra: &[Infrastructure]) -> YieldBreakdown {
    let soil_mod = soil_modifier(parcel.soil_type);
    let ph_mod = ph_modifier(parcel.ph);
    let fertility_mod = parcel.fertility.value();
    let infra_mod = infrastructure_yield_modifier(infra);
    let water_mod = water_modifier(parcel.water_level.value());
    let organic_mod = organic_yield_modifier(parcel.is_organic);
    let age_mod = age_modifier(parcel.tree_age);

    let total_yield_per_ha = BASE_YIELD_KG_PER_HA
        * soil_mod
        * ph_mod
        * fertility_mod
        * infra_mod
        * water_mod
        * organic_mod
        * age_mod;
    let area = parcel.area_ha.to_f64().unwrap_or(0.0);

    YieldBreakdown {
        base_yield: BASE_YIELD_KG_PER_HA,
        soil_mod,
        ph_mod,
        fertility_mod,
        water_mod,
        organic_mod,
        infra_mod,
        age_mod,
        total_yield_per_ha,
        parcel_yield_kg: total_yield_per_ha * area,
    }
}

/// Whether trees on `parcel` are old enough, still productive, and it is Summer.
pub fn is_harvest_ready(parcel: &Parcel, season: Season, min_tree_age: u32) -> bool {
    season == Season::Summer && tree_age_harvestable(parcel.planted_trees, parcel.tree_age, min_tree_age)
}

/// Age test shared with the stability projection, which looks ahead in time.
pub(crate) fn tree_age_harvestable(planted_trees: u32, tree_age: u32, min_tree_age: u32) -> bool {
    planted_trees > 0 && tree_age > min_tree_age && tree_age <= MAX_PRODUCTIVE_TREE_AGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{infra, parcel};
    use farm_core::{Fraction, InfrastructureKind};
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn mature_conventional_parcel_on_ideal_land() {
        let p = parcel("p1");
        let y = compute_yield(&p, &[]);
        assert!(close(y.total_yield_per_ha, 25_000.0));
        assert!(close(y.parcel_yield_kg, 50_000.0));
        assert_eq!(y.harvestable_kg(), 50_000);
    }

    #[test]
    fn young_organic_parcel() {
        let mut p = parcel("p1");
        p.is_organic = true;
        p.tree_age = 1;
        let y = compute_yield(&p, &[]);
        assert_eq!(y.organic_mod, 0.8);
        assert_eq!(y.age_mod, 0.33);
        assert!(close(y.parcel_yield_kg, 13_200.0));
    }

    #[test]
    fn unplanted_parcel_yields_nothing() {
        let mut p = parcel("p1");
        p.planted_trees = 0;
        p.tree_age = 0;
        let y = compute_yield(&p, &[infra(InfrastructureKind::Shaker, 2)]);
        assert_eq!(y.parcel_yield_kg, 0.0);
        assert_eq!(y.harvestable_kg(), 0);
    }

    #[test]
    fn machinery_raises_yield() {
        let p = parcel("p1");
        let y = compute_yield(&p, &[infra(InfrastructureKind::Shaker, 1)]);
        assert!(close(y.parcel_yield_kg, 54_000.0));
    }

    #[test]
    fn harvest_needs_summer_and_old_enough_trees() {
        let mut p = parcel("p1");
        assert!(!is_harvest_ready(&p, Season::Summer, 5));
        p.tree_age = 6;
        assert!(is_harvest_ready(&p, Season::Summer, 5));
        assert!(!is_harvest_ready(&p, Season::Autumn, 5));
        p.tree_age = 41;
        assert!(!is_harvest_ready(&p, Season::Summer, 5));
    }

    proptest! {
        #[test]
        fn yield_monotone_in_fertility(a in 0.0f64..=1.0, b in 0.0f64..=1.0, age in 0u32..50, water in 0.0f64..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mut p = parcel("p1");
            p.tree_age = age;
            p.planted_trees = if age == 0 { 0 } else { 400 };
            p.water_level = Fraction::new(water).unwrap();
            p.fertility = Fraction::new(lo).unwrap();
            let y_lo = compute_yield(&p, &[]).parcel_yield_kg;
            p.fertility = Fraction::new(hi).unwrap();
            let y_hi = compute_yield(&p, &[]).parcel_yield_kg;
            prop_assert!(y_hi >= y_lo);
            prop_assert!(y_lo >= 0.0);
        }
    }
}
