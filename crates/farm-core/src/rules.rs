//! Tunable game rules loaded from scenario files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Simulation parameters. Every field has a default, so scenario files only
/// list what they override.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Wholesale base price, PLN/kg.
    pub wholesale_base_price: f64,
    /// Retail base price, PLN/kg.
    pub retail_base_price: f64,
    /// Retail multiplier for certified organic farms.
    pub organic_premium: f64,
    /// Advertised top-tier quality uplift (informational).
    pub quality_bonus: f64,
    /// Half-width of the seasonal demand noise, in [0, 1).
    pub demand_noise: f64,
    /// Seed for the deterministic market RNG.
    pub rng_seed: u64,
    /// Trees must be strictly older than this (in seasons) to be harvested.
    pub harvest_min_tree_age: u32,
    /// Completed seasons between starting conversion and certification.
    pub organic_conversion_seasons: u32,
    /// Cost of one watering action, PLN.
    pub water_action_cost: Decimal,
    /// Water level gained per watering.
    pub water_action_gain: f64,
    /// Cost of one fertilizing action, PLN.
    pub fertilize_action_cost: Decimal,
    /// Fertility gained per fertilizing.
    pub fertilize_action_gain: f64,
    /// Cost per planted tree, PLN.
    pub tree_planting_cost: Decimal,
    /// Water level lost at every season end.
    pub seasonal_water_loss: f64,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            wholesale_base_price: 6.0,
            retail_base_price: 12.0,
            organic_premium: 1.4,
            quality_bonus: 1.5,
            demand_noise: 0.1,
            rng_seed: 42,
            harvest_min_tree_age: 5,
            organic_conversion_seasons: 2,
            water_action_cost: Decimal::new(200, 0),
            water_action_gain: 0.3,
            fertilize_action_cost: Decimal::new(350, 0),
            fertilize_action_gain: 0.2,
            // 60 000 PLN/ha at 400 trees/ha
            tree_planting_cost: Decimal::new(150, 0),
            seasonal_water_loss: 0.15,
        }
    }
}
