//! Owning service for one farm: player actions and season settlement.

use farm_core::{
    validate_farm, validate_parcel, validate_rules, Farm, Fraction, GameRules, HarvestLot,
    Infrastructure, InfrastructureKind, MarketPrice, Parcel, ParcelId, Province, Region, Season,
    SoilType, ValidationError,
};
use farm_econ::costs::parcel_costs;
use farm_econ::modifiers::labor_efficiency;
use farm_econ::pricing::sale_revenue;
use farm_econ::stability::check_stability_after_spend;
use farm_econ::{
    check_stability, compute_yield, estimate_season_costs, is_harvest_ready, quote,
    refresh_market, CostBreakdown, PriceQuote, PricingContext, QualityTier, SaleChannel,
    StabilityReport,
};
use farm_stats::{CostCategory, SaleRecord, SeasonReport, StatisticsAggregator, YearlyReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog;
use crate::ActionError;

/// Result of one sale transaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaleOutcome {
    /// Single quote covering the whole transaction.
    pub quote: PriceQuote,
    pub sold_kg: u64,
    /// Whole PLN credited to cash.
    pub revenue: Decimal,
    /// One record per inventory lot touched, oldest first.
    pub sales: Vec<SaleRecord>,
}

/// Everything a season close produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonOutcome {
    /// Running costs deducted from cash at settlement.
    pub settled_costs: Decimal,
    pub report: SeasonReport,
    pub yearly: Option<YearlyReport>,
    /// Advisory for the season that just opened.
    pub stability: StabilityReport,
}

/// A farm together with its rules, current market and report history.
///
/// All mutation goes through `&mut self`, so one session serializes the
/// actions of its farm.
#[derive(Clone, Debug)]
pub struct FarmSession {
    farm: Farm,
    rules: GameRules,
    market: MarketPrice,
    stats: StatisticsAggregator,
}

impl FarmSession {
    pub fn new(farm: Farm, rules: GameRules) -> Result<Self, ActionError> {
        validate_rules(&rules)?;
        validate_farm(&farm)?;
        let market = refresh_market(farm.season, farm.season_number, &rules);
        info!(
            farm = %farm.name,
            parcels = farm.parcels.len(),
            cash = %farm.cash,
            season = %farm.season,
            "session opened"
        );
        Ok(Self {
            farm,
            rules,
            market,
            stats: StatisticsAggregator::new(),
        })
    }

    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn market(&self) -> &MarketPrice {
        &self.market
    }

    pub fn stats(&self) -> &StatisticsAggregator {
        &self.stats
    }

    pub fn into_farm(self) -> Farm {
        self.farm
    }

    fn parcel(&self, id: &ParcelId) -> Result<&Parcel, ActionError> {
        self.farm
            .parcel(id)
            .ok_or_else(|| ActionError::UnknownParcel(id.clone()))
    }

    fn charge(&mut self, amount: Decimal) -> Result<(), ActionError> {
        if self.farm.cash < amount {
            return Err(ActionError::InsufficientCash {
                needed: amount,
                available: self.farm.cash,
            });
        }
        self.farm.cash -= amount;
        Ok(())
    }

    /// Pay for an action on a parcel and book it against that parcel.
    fn charge_parcel(
        &mut self,
        id: &ParcelId,
        category: CostCategory,
        amount: Decimal,
    ) -> Result<&mut Parcel, ActionError> {
        let province: Province = self.parcel(id)?.region.province;
        self.charge(amount)?;
        self.stats
            .ledger_mut()
            .record_parcel_cost(id, province, category, amount);
        self.farm
            .parcel_mut(id)
            .ok_or_else(|| ActionError::UnknownParcel(id.clone()))
    }

    /// Plant `count` trees on bare land. Returns the amount paid.
    pub fn plant_trees(&mut self, id: &ParcelId, count: u32) -> Result<Decimal, ActionError> {
        if self.parcel(id)?.is_planted() {
            return Err(ActionError::AlreadyPlanted(id.clone()));
        }
        if count == 0 {
            return Err(ActionError::NoTrees(id.clone()));
        }
        let cost = self.rules.tree_planting_cost * Decimal::from(count);
        let p = self.charge_parcel(id, CostCategory::Investment, cost)?;
        p.planted_trees = count;
        p.tree_age = 1;
        debug!(parcel = %id, count, %cost, "trees planted");
        Ok(cost)
    }

    pub fn water_parcel(&mut self, id: &ParcelId) -> Result<(), ActionError> {
        let cost = self.rules.water_action_cost;
        let gain = self.rules.water_action_gain;
        let p = self.charge_parcel(id, CostCategory::Operational, cost)?;
        p.water_level = p.water_level.shifted(gain);
        debug!(parcel = %id, water = p.water_level.value(), "parcel watered");
        Ok(())
    }

    pub fn fertilize_parcel(&mut self, id: &ParcelId) -> Result<(), ActionError> {
        let cost = self.rules.fertilize_action_cost;
        let gain = self.rules.fertilize_action_gain;
        let season_number = self.farm.season_number;
        let p = self.charge_parcel(id, CostCategory::Operational, cost)?;
        p.fertility = p.fertility.shifted(gain);
        p.last_fertilized = Some(season_number);
        debug!(parcel = %id, fertility = p.fertility.value(), "parcel fertilized");
        Ok(())
    }

    /// Pick a ready parcel and move the cherries into inventory. Returns kg picked.
    pub fn harvest(&mut self, id: &ParcelId) -> Result<u64, ActionError> {
        let season = self.farm.season;
        let season_number = self.farm.season_number;
        let parcel = self.parcel(id)?;
        if season != Season::Summer {
            return Err(ActionError::WrongSeason {
                expected: Season::Summer,
                actual: season,
            });
        }
        if !parcel.is_planted() {
            return Err(ActionError::NoTrees(id.clone()));
        }
        if parcel.last_harvest == Some(season_number) {
            return Err(ActionError::AlreadyHarvested(id.clone()));
        }
        if !is_harvest_ready(parcel, season, self.rules.harvest_min_tree_age) {
            return Err(ActionError::TreesNotReady(id.clone()));
        }

        let kg = compute_yield(parcel, &self.farm.infrastructure).harvestable_kg();
        let lot = HarvestLot {
            parcel_id: id.clone(),
            province: parcel.region.province,
            season_number,
            kg,
            organic_certified: parcel.organic_certified,
            quality: parcel.quality,
        };
        self.stats.ledger_mut().record_harvest(id, lot.province, kg);
        if kg > 0 {
            self.farm.inventory.lots.push(lot);
        }
        if let Some(p) = self.farm.parcel_mut(id) {
            p.last_harvest = Some(season_number);
        }
        info!(parcel = %id, kg, "harvested");
        Ok(kg)
    }

    /// Quote a sale without executing it.
    pub fn price_quote(&self, channel: SaleChannel, kg: u64) -> PriceQuote {
        quote(channel, kg, &PricingContext::from_farm(&self.farm), &self.market)
    }

    /// Sell `kg` from inventory, oldest lots first, at one unit price.
    pub fn sell(&mut self, channel: SaleChannel, kg: u64) -> Result<SaleOutcome, ActionError> {
        if kg == 0 {
            return Err(ActionError::EmptySale);
        }
        let available = self.farm.inventory.total_kg();
        if kg > available {
            return Err(ActionError::InsufficientInventory {
                requested: kg,
                available,
            });
        }
        let quote = self.price_quote(channel, kg);

        // one floor for the whole transaction, split across lots pro rata
        let revenue = sale_revenue(quote.unit_price, kg)?;
        let total_kg = Decimal::from(kg);
        let mut slices = Vec::new();
        let mut remaining = kg;
        for lot in &self.farm.inventory.lots {
            if remaining == 0 {
                break;
            }
            let take = remaining.min(lot.kg);
            if take == 0 {
                continue;
            }
            let record = SaleRecord {
                parcel_id: lot.parcel_id.clone(),
                channel,
                kg: take,
                unit_price: quote.unit_price,
                revenue: (revenue * Decimal::from(take) / total_kg).floor(),
                tier: QualityTier::classify(lot.quality, lot.organic_certified),
            };
            slices.push((lot.province, record));
            remaining -= take;
        }
        let split: Decimal = slices.iter().map(|(_, r)| r.revenue).sum();
        if let Some((_, last)) = slices.last_mut() {
            last.revenue += revenue - split;
        }

        let mut remaining = kg;
        for lot in self.farm.inventory.lots.iter_mut() {
            let take = remaining.min(lot.kg);
            lot.kg -= take;
            remaining -= take;
        }
        self.farm.inventory.lots.retain(|l| l.kg > 0);

        self.farm.cash += revenue;
        let ledger = self.stats.ledger_mut();
        for (province, record) in &slices {
            ledger.record_sale(*province, record.clone());
        }
        info!(?channel, kg, unit_price = quote.unit_price, %revenue, "cherries sold");
        Ok(SaleOutcome {
            quote,
            sold_kg: kg,
            revenue,
            sales: slices.into_iter().map(|(_, r)| r).collect(),
        })
    }

    /// Begin organic conversion; certification follows after the configured
    /// number of completed seasons.
    pub fn start_organic_conversion(&mut self, id: &ParcelId) -> Result<(), ActionError> {
        let season_number = self.farm.season_number;
        let immediate = self.rules.organic_conversion_seasons == 0;
        let p = self
            .farm
            .parcel_mut(id)
            .ok_or_else(|| ActionError::UnknownParcel(id.clone()))?;
        if p.is_organic {
            return Err(ActionError::AlreadyOrganic(id.clone()));
        }
        p.is_organic = true;
        p.organic_certified = immediate;
        p.organic_conversion_season = Some(season_number);
        info!(parcel = %id, season_number, "organic conversion started");
        Ok(())
    }

    /// Buy level 1 of `kind`, or upgrade the owned item by one level.
    pub fn purchase_infrastructure(
        &mut self,
        kind: InfrastructureKind,
    ) -> Result<Infrastructure, ActionError> {
        let price = catalog::purchase_price(kind);
        self.charge(price)?;
        self.stats
            .ledger_mut()
            .record_cost(CostCategory::Investment, price);
        let season_number = self.farm.season_number;
        let item = match self.farm.infrastructure.iter_mut().find(|i| i.kind == kind) {
            Some(owned) => {
                owned.level += 1;
                owned.maintenance_cost = catalog::maintenance_cost(kind, owned.level);
                owned.clone()
            }
            None => {
                let fresh = Infrastructure {
                    kind,
                    level: 1,
                    maintenance_cost: catalog::maintenance_cost(kind, 1),
                    purchased_season: season_number,
                };
                self.farm.infrastructure.push(fresh.clone());
                fresh
            }
        };
        info!(?kind, level = item.level, %price, "infrastructure purchased");
        Ok(item)
    }

    /// Buy bare land at the catalog price per hectare. Returns the amount paid.
    ///
    /// The parcel starts unplanted with neutral soil; planting is a separate action.
    pub fn purchase_parcel(
        &mut self,
        id: ParcelId,
        region: Region,
        soil_type: SoilType,
        area_ha: Decimal,
    ) -> Result<Decimal, ActionError> {
        if self.farm.parcel(&id).is_some() {
            return Err(ValidationError::DuplicateParcel(id).into());
        }
        let parcel = Parcel {
            id,
            region,
            soil_type,
            ph: 6.5,
            fertility: Fraction::saturating(0.5),
            water_level: Fraction::saturating(0.5),
            humidity: Fraction::saturating(0.5),
            permeability: Fraction::saturating(0.5),
            area_ha,
            planted_trees: 0,
            tree_age: 0,
            is_organic: false,
            organic_certified: false,
            organic_conversion_season: None,
            quality: 50,
            last_harvest: None,
            last_fertilized: None,
        };
        validate_parcel(&parcel)?;
        let price = catalog::land_price(area_ha);
        self.charge(price)?;
        self.stats.ledger_mut().record_parcel_cost(
            &parcel.id,
            parcel.region.province,
            CostCategory::Investment,
            price,
        );
        info!(
            parcel = %parcel.id,
            province = ?parcel.region.province,
            %area_ha,
            %price,
            "land purchased"
        );
        self.farm.parcels.push(parcel);
        Ok(price)
    }

    /// Running costs the next settlement will book.
    pub fn cost_projection(&self) -> CostBreakdown {
        estimate_season_costs(&self.farm)
    }

    pub fn stability(&self) -> StabilityReport {
        check_stability(&self.farm, &self.rules)
    }

    pub fn stability_after_spend(&self, amount: Decimal) -> StabilityReport {
        check_stability_after_spend(&self.farm, &self.rules, amount)
    }

    /// Book running costs of the open season and deduct them from cash.
    ///
    /// Books exactly `cost_projection()`; the per-parcel split only attributes
    /// the same amounts to parcels.
    fn settle(&mut self) -> Decimal {
        let costs = estimate_season_costs(&self.farm);
        let efficiency = labor_efficiency(&self.farm.infrastructure);
        let ledger = self.stats.ledger_mut();
        for p in &self.farm.parcels {
            let c = parcel_costs(p, efficiency);
            let province = p.region.province;
            ledger.record_parcel_cost(&p.id, province, CostCategory::Operational, c.inputs());
            ledger.record_parcel_cost(&p.id, province, CostCategory::Labor, c.labor);
        }
        ledger.record_cost(CostCategory::Maintenance, costs.maintenance);
        ledger.record_cost(CostCategory::Certification, costs.certification);
        self.farm.cash -= costs.total;
        debug!(total = %costs.total, labor = %costs.labor, "running costs settled");
        costs.total
    }

    /// Age trees, dry soil, grant finished certifications and open the next season.
    fn tick(&mut self, closed: u32) {
        let water_loss = self.rules.seasonal_water_loss;
        let conversion = self.rules.organic_conversion_seasons;
        for p in &mut self.farm.parcels {
            if p.is_planted() {
                p.tree_age = p.tree_age.saturating_add(1);
            }
            p.water_level = p.water_level.shifted(-water_loss);
            if let Some(start) = p.organic_conversion_season {
                if p.is_organic && !p.organic_certified && closed.saturating_sub(start) >= conversion
                {
                    p.organic_certified = true;
                    info!(parcel = %p.id, "organic certification granted");
                }
            }
        }
        self.farm.season_number = closed;
        self.farm.season = self.farm.season.next();
        self.market = refresh_market(self.farm.season, self.farm.season_number, &self.rules);
    }

    /// Settle the open season, close its report and move to the next season.
    pub fn advance_season(&mut self) -> Result<SeasonOutcome, ActionError> {
        let closing = self.farm.season_number.saturating_add(1);
        let season = self.farm.season;
        let settled_costs = self.settle();
        let closed = self.stats.close_season(season, closing)?;
        self.tick(closing);

        let stability = self.stability();
        if stability.is_risky {
            warn!(
                cash = %stability.cash,
                estimated_cost = %stability.estimated_cost,
                seasons_to_harvest = stability.seasons_to_harvest,
                "cash will not cover costs until the next harvest"
            );
        }
        if self.farm.cash < Decimal::ZERO {
            warn!(cash = %self.farm.cash, "farm is overdrawn");
        }
        Ok(SeasonOutcome {
            settled_costs,
            report: closed.report,
            yearly: closed.yearly,
            stability,
        })
    }
}
