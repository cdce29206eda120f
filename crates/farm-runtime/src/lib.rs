#![deny(warnings)]

//! Runtime driver for a single cherry farm.
//!
//! [`FarmSession`] owns the farm state, the rules, the season's market
//! snapshot and the statistics history. Player actions validate their
//! preconditions and book their costs immediately; `advance_season` settles
//! running costs, closes the season report and opens the next season.

use farm_core::{ParcelId, Season, ValidationError};
use farm_econ::EconError;
use farm_stats::StatsError;
use rust_decimal::Decimal;
use thiserror::Error;

pub mod catalog;
mod session;

pub use session::{FarmSession, SaleOutcome, SeasonOutcome};

/// Reasons a player action is refused.
#[derive(Debug, Error, PartialEq)]
pub enum ActionError {
    /// Farm or rules failed boundary validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Money conversion failed.
    #[error(transparent)]
    Econ(#[from] EconError),
    /// Report history rejected the season close.
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("unknown parcel: {0}")]
    UnknownParcel(ParcelId),
    /// Action is only allowed in another season.
    #[error("action requires {expected}, current season is {actual}")]
    WrongSeason { expected: Season, actual: Season },
    #[error("trees on parcel {0} are too young or too old to harvest")]
    TreesNotReady(ParcelId),
    #[error("parcel {0} was already harvested this season")]
    AlreadyHarvested(ParcelId),
    #[error("parcel {0} is already planted")]
    AlreadyPlanted(ParcelId),
    #[error("parcel {0} is already organic")]
    AlreadyOrganic(ParcelId),
    /// Parcel has no trees, or a planting of zero trees was requested.
    #[error("no trees on parcel {0}")]
    NoTrees(ParcelId),
    #[error("insufficient cash: need {needed} PLN, have {available} PLN")]
    InsufficientCash { needed: Decimal, available: Decimal },
    #[error("insufficient inventory: requested {requested} kg, have {available} kg")]
    InsufficientInventory { requested: u64, available: u64 },
    #[error("sale volume must be > 0")]
    EmptySale,
}

#[cfg(test)]
pub(crate) mod testutil {
    use farm_core::*;
    use rust_decimal::Decimal;

    /// 2 ha of mature conventional trees on ideal land in Opole.
    pub fn parcel(id: &str) -> Parcel {
        Parcel {
            id: ParcelId::new(id),
            region: Region {
                province: Province::Opolskie,
                county: "opolski".to_string(),
                commune: "Prószków".to_string(),
                commune_type: CommuneType::Rural,
                population: 9_000,
                market_size: 1.0,
                labor_cost_multiplier: Decimal::ONE,
            },
            soil_type: SoilType::SandyClay,
            ph: 6.5,
            fertility: Fraction::ONE,
            water_level: Fraction::saturating(0.6),
            humidity: Fraction::saturating(0.5),
            permeability: Fraction::saturating(0.5),
            area_ha: Decimal::new(20, 1),
            planted_trees: 800,
            tree_age: 8,
            is_organic: false,
            organic_certified: false,
            organic_conversion_season: None,
            quality: 70,
            last_harvest: None,
            last_fertilized: None,
        }
    }

    pub fn farm(parcels: Vec<Parcel>) -> Farm {
        Farm {
            name: "Wiśniowy Sad".to_string(),
            cash: Decimal::from(200_000),
            season: Season::Spring,
            season_number: 0,
            parcels,
            infrastructure: vec![],
            inventory: Inventory::default(),
        }
    }
}
