//! Market pricing for cherry sales.
//!
//! A unit price is the channel's base price scaled by season, local
//! population (retail only), transaction volume, current demand and the
//! organic premium (retail only), floored at 1 PLN/kg.

use farm_core::{Farm, GameRules, MarketPrice, Season};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EconError;

/// Lowest unit price any sale can realize, PLN/kg.
pub const PRICE_FLOOR: f64 = 1.0;
/// Volume at which the wholesale volume penalty reaches 1/1.2.
pub const WHOLESALE_SATURATION_KG: f64 = 5_000.0;
/// Volume at which the retail volume penalty reaches 1/1.2.
pub const RETAIL_SATURATION_KG: f64 = 500.0;
/// Population above which retail demand stops growing.
pub const POPULATION_CAP: u64 = 200_000;

/// Sale channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleChannel {
    Wholesale,
    Retail,
}

impl SaleChannel {
    pub fn saturation_kg(self) -> f64 {
        match self {
            SaleChannel::Wholesale => WHOLESALE_SATURATION_KG,
            SaleChannel::Retail => RETAIL_SATURATION_KG,
        }
    }

    pub fn base_price(self, market: &MarketPrice) -> f64 {
        match self {
            SaleChannel::Wholesale => market.wholesale_base_price,
            SaleChannel::Retail => market.retail_base_price,
        }
    }
}

/// Quality grade of sold cherries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    Common,
    Good,
    Excellent,
    /// Certified organic produce only.
    Premium,
}

impl QualityTier {
    pub fn classify(quality: u8, organic_certified: bool) -> Self {
        if organic_certified {
            QualityTier::Premium
        } else if quality >= 85 {
            QualityTier::Excellent
        } else if quality >= 70 {
            QualityTier::Good
        } else {
            QualityTier::Common
        }
    }
}

/// Farm facts the pricing engine needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Population of the farm's home region.
    pub population: u64,
    pub has_certified_organic: bool,
}

impl PricingContext {
    pub fn from_farm(farm: &Farm) -> Self {
        Self {
            population: farm.home_region().map_or(0, |r| r.population),
            has_certified_organic: farm.has_certified_organic(),
        }
    }
}

/// Itemized unit price of a proposed sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub channel: SaleChannel,
    pub amount_kg: u64,
    pub base_price: f64,
    pub season_mod: f64,
    pub population_mod: f64,
    pub volume_penalty: f64,
    pub demand_multiplier: f64,
    pub organic_premium_mod: f64,
    /// PLN/kg, never below [`PRICE_FLOOR`].
    pub unit_price: f64,
}

/// Scarcity in winter and spring, glut in summer.
pub fn season_modifier(season: Season) -> f64 {
    match season {
        Season::Winter => 1.4,
        Season::Spring => 1.2,
        Season::Summer => 0.9,
        Season::Autumn => 1.0,
    }
}

/// Retail reach of the local population, in [0.8, 1.5].
pub fn population_modifier(population: u64) -> f64 {
    let capped = population.min(POPULATION_CAP) as f64;
    0.8 + capped / POPULATION_CAP as f64 * 0.7
}

/// Saturation curve: bigger single transactions realize lower unit prices.
pub fn volume_penalty(channel: SaleChannel, amount_kg: u64) -> f64 {
    1.0 / (1.0 + (amount_kg as f64 / channel.saturation_kg()) * 0.2)
}

/// Price a sale of `amount_kg` through `channel`.
pub fn quote(
    channel: SaleChannel,
    amount_kg: u64,
    ctx: &PricingContext,
    market: &MarketPrice,
) -> PriceQuote {
    let base_price = channel.base_price(market);
    let season_mod = market.season_multiplier;
    let population_mod = match channel {
        SaleChannel::Retail => population_modifier(ctx.population),
        SaleChannel::Wholesale => 1.0,
    };
    let volume_penalty = volume_penalty(channel, amount_kg);
    let demand_multiplier = market.demand_multiplier;
    let organic_premium_mod = match channel {
        SaleChannel::Retail if ctx.has_certified_organic => market.organic_premium,
        _ => 1.0,
    };
    let raw = base_price
        * season_mod
        * population_mod
        * volume_penalty
        * demand_multiplier
        * organic_premium_mod;
    PriceQuote {
        channel,
        amount_kg,
        base_price,
        season_mod,
        population_mod,
        volume_penalty,
        demand_multiplier,
        organic_premium_mod,
        // f64::max discards a NaN operand, so the floor always holds
        unit_price: raw.max(PRICE_FLOOR),
    }
}

/// Unit price in PLN/kg for a sale of `amount_kg` through `channel`.
pub fn unit_price(
    channel: SaleChannel,
    amount_kg: u64,
    ctx: &PricingContext,
    market: &MarketPrice,
) -> f64 {
    quote(channel, amount_kg, ctx, market).unit_price
}

/// Realized revenue of `kg` sold at `unit_price`, floored to whole PLN.
pub fn sale_revenue(unit_price: f64, kg: u64) -> Result<Decimal, EconError> {
    let gross = unit_price * kg as f64;
    if !gross.is_finite() || gross < 0.0 {
        return Err(EconError::NonFinite);
    }
    Decimal::from_f64(gross.floor()).ok_or(EconError::NonFinite)
}

/// Market snapshot for a new season.
///
/// Demand varies by ±`rules.demand_noise`, seeded by the rules seed and the
/// season number so replays see the same prices.
pub fn refresh_market(season: Season, season_number: u32, rules: &GameRules) -> MarketPrice {
    let demand_multiplier = if rules.demand_noise > 0.0 {
        let mut rng =
            ChaCha8Rng::seed_from_u64(rules.rng_seed.wrapping_add(u64::from(season_number)));
        1.0 + rng.gen_range(-rules.demand_noise..=rules.demand_noise)
    } else {
        1.0
    };
    MarketPrice {
        wholesale_base_price: rules.wholesale_base_price,
        retail_base_price: rules.retail_base_price,
        demand_multiplier,
        season_multiplier: season_modifier(season),
        organic_premium: rules.organic_premium,
        quality_bonus: rules.quality_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calm_rules() -> GameRules {
        GameRules {
            demand_noise: 0.0,
            ..GameRules::default()
        }
    }

    fn ctx(population: u64, organic: bool) -> PricingContext {
        PricingContext {
            population,
            has_certified_organic: organic,
        }
    }

    #[test]
    fn wholesale_ignores_population_and_organic() {
        let m = refresh_market(Season::Autumn, 3, &calm_rules());
        let q = quote(SaleChannel::Wholesale, 0, &ctx(0, true), &m);
        assert_eq!(q.population_mod, 1.0);
        assert_eq!(q.organic_premium_mod, 1.0);
        assert_eq!(q.volume_penalty, 1.0);
        assert!((q.unit_price - 6.0).abs() < 1e-12);
    }

    #[test]
    fn retail_in_winter_for_organic_city_farm() {
        let m = refresh_market(Season::Winter, 4, &calm_rules());
        let q = quote(SaleChannel::Retail, 500, &ctx(400_000, true), &m);
        assert_eq!(q.season_mod, 1.4);
        assert!((q.population_mod - 1.5).abs() < 1e-12);
        assert!((q.volume_penalty - 1.0 / 1.2).abs() < 1e-12);
        assert_eq!(q.organic_premium_mod, 1.4);
        let expected = 12.0 * 1.4 * 1.5 / 1.2 * 1.4;
        assert!((q.unit_price - expected).abs() < 1e-9);
    }

    #[test]
    fn wholesale_tolerates_more_volume() {
        assert!(
            volume_penalty(SaleChannel::Wholesale, 2_000)
                > volume_penalty(SaleChannel::Retail, 2_000)
        );
    }

    #[test]
    fn population_modifier_range() {
        assert!((population_modifier(0) - 0.8).abs() < 1e-12);
        assert!((population_modifier(100_000) - 1.15).abs() < 1e-12);
        assert!((population_modifier(u64::MAX) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn market_refresh_is_seeded() {
        let rules = GameRules::default();
        let a = refresh_market(Season::Spring, 7, &rules);
        let b = refresh_market(Season::Spring, 7, &rules);
        assert_eq!(a, b);
        assert!((0.9..=1.1).contains(&a.demand_multiplier));
        assert_eq!(a.season_multiplier, 1.2);
    }

    #[test]
    fn revenue_is_floored_to_whole_pln() {
        assert_eq!(sale_revenue(5.55, 3).unwrap(), Decimal::from(16));
        assert_eq!(sale_revenue(f64::INFINITY, 3), Err(EconError::NonFinite));
    }

    #[test]
    fn quality_tiers() {
        assert_eq!(QualityTier::classify(10, true), QualityTier::Premium);
        assert_eq!(QualityTier::classify(90, false), QualityTier::Excellent);
        assert_eq!(QualityTier::classify(70, false), QualityTier::Good);
        assert_eq!(QualityTier::classify(69, false), QualityTier::Common);
    }

    proptest! {
        #[test]
        fn price_never_below_floor(
            amount in 0u64..u64::MAX / 2,
            population in 0u64..1_000_000,
            demand in 0.0f64..3.0,
            organic in any::<bool>(),
            retail in any::<bool>(),
        ) {
            let mut m = refresh_market(Season::Summer, 1, &calm_rules());
            m.demand_multiplier = demand;
            let channel = if retail { SaleChannel::Retail } else { SaleChannel::Wholesale };
            let p = unit_price(channel, amount, &ctx(population, organic), &m);
            prop_assert!(p >= PRICE_FLOOR);
        }

        #[test]
        fn larger_sales_never_raise_unit_price(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let m = refresh_market(Season::Spring, 2, &calm_rules());
            let c = ctx(50_000, false);
            prop_assert!(
                unit_price(SaleChannel::Retail, hi, &c, &m) <= unit_price(SaleChannel::Retail, lo, &c, &m)
            );
        }
    }
}
