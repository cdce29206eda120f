//! Immutable season and year financial reports.

use farm_core::{ParcelId, Province, Season};
use farm_econ::{QualityTier, SaleChannel};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::StatsError;

/// Economics of one parcel over a reporting period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParcelEconomics {
    pub parcel_id: ParcelId,
    pub province: Province,
    pub yield_kg: u64,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub net_profit: Decimal,
}

impl ParcelEconomics {
    pub fn empty(parcel_id: ParcelId, province: Province) -> Self {
        Self {
            parcel_id,
            province,
            yield_kg: 0,
            revenue: Decimal::ZERO,
            costs: Decimal::ZERO,
            net_profit: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, other: &ParcelEconomics) {
        self.yield_kg += other.yield_kg;
        self.revenue += other.revenue;
        self.costs += other.costs;
        self.net_profit += other.net_profit;
    }
}

/// One executed sale, attributed to the parcel the cherries came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub parcel_id: ParcelId,
    pub channel: SaleChannel,
    pub kg: u64,
    /// PLN/kg.
    pub unit_price: f64,
    /// Whole PLN.
    pub revenue: Decimal,
    pub tier: QualityTier,
}

/// Financial summary of one completed season. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    /// Ordinal of the season since farm creation, starting at 1.
    pub season_number: u32,
    pub season: Season,
    pub retail_revenue: Decimal,
    pub wholesale_revenue: Decimal,
    pub other_revenue: Decimal,
    pub maintenance_costs: Decimal,
    pub operational_costs: Decimal,
    pub labor_costs: Decimal,
    pub certification_costs: Decimal,
    pub investment_costs: Decimal,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    pub harvested_kg: u64,
    pub sold_kg: u64,
    pub parcels: Vec<ParcelEconomics>,
    pub sales: Vec<SaleRecord>,
}

impl SeasonReport {
    /// Kilograms sold per quality tier.
    pub fn volume_by_tier(&self) -> BTreeMap<QualityTier, u64> {
        let mut out = BTreeMap::new();
        for s in &self.sales {
            *out.entry(s.tier).or_insert(0) += s.kg;
        }
        out
    }

    pub fn parcel(&self, id: &ParcelId) -> Option<&ParcelEconomics> {
        self.parcels.iter().find(|p| &p.parcel_id == id)
    }
}

/// Financial summary of four consecutive seasons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearlyReport {
    /// Year index starting at 1.
    pub year: u32,
    pub retail_revenue: Decimal,
    pub wholesale_revenue: Decimal,
    pub other_revenue: Decimal,
    pub maintenance_costs: Decimal,
    pub operational_costs: Decimal,
    pub labor_costs: Decimal,
    pub certification_costs: Decimal,
    pub investment_costs: Decimal,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub net_profit: Decimal,
    pub harvested_kg: u64,
    pub sold_kg: u64,
    /// Per-parcel sums over the year, ordered by parcel id.
    pub parcels: Vec<ParcelEconomics>,
    pub best_parcel: Option<ParcelId>,
    pub best_province: Option<Province>,
    pub seasons: Vec<SeasonReport>,
}

/// Fold four consecutive season reports into year `year`.
///
/// Every numeric field is the exact sum of the seasonal fields.
pub fn fold_year(year: u32, seasons: &[SeasonReport]) -> Result<YearlyReport, StatsError> {
    if seasons.len() != 4 {
        return Err(StatsError::WrongSeasonCount(seasons.len()));
    }
    for pair in seasons.windows(2) {
        if pair[1].season_number != pair[0].season_number + 1 {
            return Err(StatsError::SeasonGap {
                expected: pair[0].season_number + 1,
                got: pair[1].season_number,
            });
        }
    }

    let mut parcels: BTreeMap<ParcelId, ParcelEconomics> = BTreeMap::new();
    for pe in seasons.iter().flat_map(|s| &s.parcels) {
        parcels
            .entry(pe.parcel_id.clone())
            .or_insert_with(|| ParcelEconomics::empty(pe.parcel_id.clone(), pe.province))
            .absorb(pe);
    }

    // strict comparison keeps the lowest id on ties
    let mut best_parcel: Option<&ParcelEconomics> = None;
    let mut by_province: BTreeMap<Province, Decimal> = BTreeMap::new();
    for pe in parcels.values() {
        if best_parcel.map_or(true, |b| pe.net_profit > b.net_profit) {
            best_parcel = Some(pe);
        }
        *by_province.entry(pe.province).or_insert(Decimal::ZERO) += pe.net_profit;
    }
    let best_parcel = best_parcel.map(|p| p.parcel_id.clone());
    let mut best_province: Option<(Province, Decimal)> = None;
    for (province, net) in by_province {
        if best_province.map_or(true, |(_, b)| net > b) {
            best_province = Some((province, net));
        }
    }
    let sum = |f: &dyn Fn(&SeasonReport) -> Decimal| seasons.iter().map(f).sum::<Decimal>();

    Ok(YearlyReport {
        year,
        retail_revenue: sum(&|s| s.retail_revenue),
        wholesale_revenue: sum(&|s| s.wholesale_revenue),
        other_revenue: sum(&|s| s.other_revenue),
        maintenance_costs: sum(&|s| s.maintenance_costs),
        operational_costs: sum(&|s| s.operational_costs),
        labor_costs: sum(&|s| s.labor_costs),
        certification_costs: sum(&|s| s.certification_costs),
        investment_costs: sum(&|s| s.investment_costs),
        total_revenue: sum(&|s| s.total_revenue),
        total_costs: sum(&|s| s.total_costs),
        net_profit: sum(&|s| s.net_profit),
        harvested_kg: seasons.iter().map(|s| s.harvested_kg).sum(),
        sold_kg: seasons.iter().map(|s| s.sold_kg).sum(),
        best_parcel,
        best_province: best_province.map(|(p, _)| p),
        parcels: parcels.into_values().collect(),
        seasons: seasons.to_vec(),
    })
}

/// Lifetime figures across all closed seasons.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmStatistics {
    pub seasons_played: u32,
    pub total_harvested: u64,
    pub total_sold: u64,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub best_season_profit: Option<Decimal>,
    /// Realized sales revenue per kilogram sold.
    pub average_price: Option<Decimal>,
}

impl FarmStatistics {
    pub fn from_reports(reports: &[SeasonReport]) -> Self {
        let mut stats = FarmStatistics::default();
        let mut sales_revenue = Decimal::ZERO;
        for r in reports {
            stats.seasons_played += 1;
            stats.total_harvested += r.harvested_kg;
            stats.total_sold += r.sold_kg;
            stats.total_revenue += r.total_revenue;
            stats.total_costs += r.total_costs;
            sales_revenue += r.retail_revenue + r.wholesale_revenue;
            stats.best_season_profit = Some(match stats.best_season_profit {
                Some(best) => best.max(r.net_profit),
                None => r.net_profit,
            });
        }
        if stats.total_sold > 0 {
            stats.average_price = Some(sales_revenue / Decimal::from(stats.total_sold));
        }
        stats
    }
}
