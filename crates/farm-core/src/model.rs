//! Farm domain model: parcels, regions, infrastructure, seasons and market snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validate::ValidationError;

/// Stable identifier of a parcel, e.g. "opole-01".
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParcelId(pub String);

impl ParcelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Soil classes found on orchard parcels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    /// Sandy clay (best for cherries).
    SandyClay,
    Clay,
    Sandy,
    /// Waterlogged soil, heavily penalised.
    Waterlogged,
}

/// Polish provinces (voivodeships).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Province {
    Dolnoslaskie,
    KujawskoPomorskie,
    Lubelskie,
    Lubuskie,
    Lodzkie,
    Malopolskie,
    Mazowieckie,
    Opolskie,
    Podkarpackie,
    Podlaskie,
    Pomorskie,
    Slaskie,
    Swietokrzyskie,
    WarminskoMazurskie,
    Wielkopolskie,
    Zachodniopomorskie,
}

impl Province {
    pub const ALL: [Province; 16] = [
        Province::Dolnoslaskie,
        Province::KujawskoPomorskie,
        Province::Lubelskie,
        Province::Lubuskie,
        Province::Lodzkie,
        Province::Malopolskie,
        Province::Mazowieckie,
        Province::Opolskie,
        Province::Podkarpackie,
        Province::Podlaskie,
        Province::Pomorskie,
        Province::Slaskie,
        Province::Swietokrzyskie,
        Province::WarminskoMazurskie,
        Province::Wielkopolskie,
        Province::Zachodniopomorskie,
    ];
}

/// Settlement character of a commune.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommuneType {
    Urban,
    Rural,
    Mixed,
}

/// Administrative region a parcel belongs to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub province: Province,
    pub county: String,
    pub commune: String,
    pub commune_type: CommuneType,
    /// Inhabitants of the commune (drives retail demand).
    pub population: u64,
    /// Relative market size (dimensionless, >= 0).
    pub market_size: f64,
    /// Multiplier on the baseline labor cost (> 0).
    pub labor_cost_multiplier: Decimal,
}

/// A value in the closed interval [0, 1].
///
/// Only the checked constructor can build one, so parcels can never carry an
/// out-of-range fertility or water level.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fraction(f64);

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const ONE: Fraction = Fraction(1.0);

    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::FractionOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Builds a fraction, clamping into [0, 1]. NaN maps to 0.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Adds `delta` (which may be negative), clamping the result.
    pub fn shifted(self, delta: f64) -> Self {
        Self::saturating(self.0 + delta)
    }
}

impl TryFrom<f64> for Fraction {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Fraction::new(value)
    }
}

impl From<Fraction> for f64 {
    fn from(f: Fraction) -> Self {
        f.0
    }
}

/// A farmable parcel of land with planted cherry trees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: ParcelId,
    pub region: Region,
    pub soil_type: SoilType,
    /// Soil pH, typically 4.5..8.5.
    pub ph: f64,
    pub fertility: Fraction,
    pub water_level: Fraction,
    /// Cosmetic for yield.
    pub humidity: Fraction,
    /// Cosmetic for yield.
    pub permeability: Fraction,
    /// Area in hectares (> 0).
    pub area_ha: Decimal,
    pub planted_trees: u32,
    /// Tree age in seasons; zero exactly when nothing is planted.
    pub tree_age: u32,
    pub is_organic: bool,
    pub organic_certified: bool,
    /// Season number in which organic conversion started.
    #[serde(default)]
    pub organic_conversion_season: Option<u32>,
    /// Quality score in 0..=100.
    pub quality: u8,
    #[serde(default)]
    pub last_harvest: Option<u32>,
    #[serde(default)]
    pub last_fertilized: Option<u32>,
}

impl Parcel {
    pub fn is_planted(&self) -> bool {
        self.planted_trees > 0
    }
}

/// Kinds of farm infrastructure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfrastructureKind {
    Sprayer,
    Shaker,
    Tractor,
    Warehouse,
    ColdStorage,
    ProcessingFacility,
    SocialFacilities,
}

/// A piece of infrastructure owned by the farm (not tied to a parcel).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Infrastructure {
    pub kind: InfrastructureKind,
    /// Upgrade level (>= 1); effects stack linearly with level.
    pub level: u32,
    /// Maintenance in PLN charged every season.
    pub maintenance_cost: Decimal,
    pub purchased_season: u32,
}

/// The four production seasons of a year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn next(self) -> Season {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// The season `n` steps after this one.
    pub fn advance(self, n: u32) -> Season {
        (0..n % 4).fold(self, |s, _| s.next())
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        };
        f.write_str(name)
    }
}

/// Market snapshot for one season. Refreshed at season start, read-only within it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    /// Wholesale base price, PLN/kg.
    pub wholesale_base_price: f64,
    /// Retail base price, PLN/kg.
    pub retail_base_price: f64,
    pub demand_multiplier: f64,
    pub season_multiplier: f64,
    /// Retail multiplier for farms holding certified organic parcels.
    pub organic_premium: f64,
    /// Advertised uplift for top-quality produce. Shown next to quotes and not
    /// applied to the unit price.
    pub quality_bonus: f64,
}

/// Cherries from one harvest, waiting to be sold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HarvestLot {
    pub parcel_id: ParcelId,
    pub province: Province,
    pub season_number: u32,
    pub kg: u64,
    pub organic_certified: bool,
    pub quality: u8,
}

/// Harvested stock, oldest lot first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub lots: Vec<HarvestLot>,
}

impl Inventory {
    pub fn total_kg(&self) -> u64 {
        self.lots.iter().map(|l| l.kg).sum()
    }
}

/// Complete state of one player's farm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub name: String,
    /// Cash in PLN. May go negative after a season settlement.
    pub cash: Decimal,
    pub season: Season,
    /// Completed seasons since the farm was created.
    pub season_number: u32,
    pub parcels: Vec<Parcel>,
    #[serde(default)]
    pub infrastructure: Vec<Infrastructure>,
    #[serde(default)]
    pub inventory: Inventory,
}

impl Farm {
    pub fn parcel(&self, id: &ParcelId) -> Option<&Parcel> {
        self.parcels.iter().find(|p| &p.id == id)
    }

    pub fn parcel_mut(&mut self, id: &ParcelId) -> Option<&mut Parcel> {
        self.parcels.iter_mut().find(|p| &p.id == id)
    }

    /// Region of the first parcel, used as the farm's home market.
    pub fn home_region(&self) -> Option<&Region> {
        self.parcels.first().map(|p| &p.region)
    }

    pub fn has_certified_organic(&self) -> bool {
        self.parcels.iter().any(|p| p.organic_certified)
    }

    pub fn total_area(&self) -> Decimal {
        self.parcels.iter().map(|p| p.area_ha).sum()
    }
}
