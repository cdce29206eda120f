//! Cash runway check: can the farm pay its bills until the next harvest?

use farm_core::{Farm, GameRules, Season};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::costs::estimate_season_costs;
use crate::yields::tree_age_harvestable;

/// Runway assumed when no parcel will reach a harvest: one year of settlements.
pub const NO_HARVEST_HORIZON: u32 = 4;

/// Advisory result; a risky farm is warned, never blocked, by this crate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StabilityReport {
    /// Projected running costs until the next harvest.
    pub estimated_cost: Decimal,
    /// Season settlements due before the next harvest (>= 1).
    pub seasons_to_harvest: u32,
    /// Cash the projection was checked against.
    pub cash: Decimal,
    pub is_risky: bool,
}

/// Number of season settlements due before some parcel can next be harvested.
pub fn seasons_to_harvest(farm: &Farm, min_tree_age: u32) -> u32 {
    let lookahead = min_tree_age.saturating_add(4);
    for k in 0..=lookahead {
        if farm.season.advance(k) != Season::Summer {
            continue;
        }
        let ready = farm.parcels.iter().any(|p| {
            let picked_now = k == 0 && p.last_harvest == Some(farm.season_number);
            !picked_now
                && tree_age_harvestable(p.planted_trees, p.tree_age.saturating_add(k), min_tree_age)
        });
        if ready {
            // the current season's bill is always due
            return k.max(1);
        }
    }
    NO_HARVEST_HORIZON
}

/// Project running costs to the next harvest and compare with cash.
pub fn check_stability(farm: &Farm, rules: &GameRules) -> StabilityReport {
    check_stability_after_spend(farm, rules, Decimal::ZERO)
}

/// Same as [`check_stability`], as if `spend` PLN had already left the account.
pub fn check_stability_after_spend(
    farm: &Farm,
    rules: &GameRules,
    spend: Decimal,
) -> StabilityReport {
    let seasons = seasons_to_harvest(farm, rules.harvest_min_tree_age);
    let per_season = estimate_season_costs(farm).total;
    let estimated_cost = per_season * Decimal::from(seasons);
    let cash = farm.cash - spend;
    StabilityReport {
        estimated_cost,
        seasons_to_harvest: seasons,
        cash,
        is_risky: cash < estimated_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{farm, parcel};

    #[test]
    fn spring_with_mature_trees_needs_one_settlement() {
        let mut p = parcel("p1");
        p.tree_age = 8;
        let mut f = farm(vec![p], vec![]);
        f.season = Season::Spring;
        assert_eq!(seasons_to_harvest(&f, 5), 1);
    }

    #[test]
    fn autumn_waits_for_next_summer() {
        let mut p = parcel("p1");
        p.tree_age = 8;
        let mut f = farm(vec![p], vec![]);
        f.season = Season::Autumn;
        assert_eq!(seasons_to_harvest(&f, 5), 3);
    }

    #[test]
    fn young_trees_push_the_horizon_out() {
        // age 2 in Spring: Summer one year on is age 7, the first harvestable Summer
        let mut p = parcel("p1");
        p.tree_age = 2;
        let mut f = farm(vec![p], vec![]);
        f.season = Season::Spring;
        assert_eq!(seasons_to_harvest(&f, 5), 5);
    }

    #[test]
    fn already_harvested_this_summer_looks_a_year_ahead() {
        let mut p = parcel("p1");
        p.tree_age = 8;
        p.last_harvest = Some(1);
        let mut f = farm(vec![p], vec![]);
        f.season = Season::Summer;
        f.season_number = 1;
        assert_eq!(seasons_to_harvest(&f, 5), 4);
    }

    #[test]
    fn bare_land_uses_one_year() {
        let mut p = parcel("p1");
        p.planted_trees = 0;
        p.tree_age = 0;
        let f = farm(vec![p], vec![]);
        assert_eq!(seasons_to_harvest(&f, 5), NO_HARVEST_HORIZON);
    }

    #[test]
    fn risky_when_cash_below_projection() {
        let mut p = parcel("p1");
        p.tree_age = 8;
        let mut f = farm(vec![p], vec![]);
        f.season = Season::Autumn;
        // 22 000 PLN per season, three settlements
        f.cash = Decimal::from(65_999);
        let r = check_stability(&f, &GameRules::default());
        assert_eq!(r.estimated_cost, Decimal::from(66_000));
        assert!(r.is_risky);
        f.cash = Decimal::from(66_000);
        assert!(!check_stability(&f, &GameRules::default()).is_risky);
        assert!(check_stability_after_spend(&f, &GameRules::default(), Decimal::ONE).is_risky);
    }
}
