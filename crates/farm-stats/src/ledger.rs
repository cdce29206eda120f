//! In-season accumulation of economic events.

use farm_core::{ParcelId, Province, Season};
use farm_econ::SaleChannel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::report::{ParcelEconomics, SaleRecord, SeasonReport};

/// Cost buckets of a season report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostCategory {
    /// Infrastructure upkeep.
    Maintenance,
    /// Fertilizer, protection, fuel and field actions.
    Operational,
    Labor,
    /// Organic certification fee.
    Certification,
    /// Trees and infrastructure purchases.
    Investment,
}

/// Running totals of the current season. Closing it yields a [`SeasonReport`]
/// and resets the ledger.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonLedger {
    retail_revenue: Decimal,
    wholesale_revenue: Decimal,
    other_revenue: Decimal,
    maintenance: Decimal,
    operational: Decimal,
    labor: Decimal,
    certification: Decimal,
    investment: Decimal,
    harvested_kg: u64,
    sold_kg: u64,
    parcels: BTreeMap<ParcelId, ParcelEconomics>,
    sales: Vec<SaleRecord>,
}

impl SeasonLedger {
    fn parcel_entry(&mut self, id: &ParcelId, province: Province) -> &mut ParcelEconomics {
        self.parcels
            .entry(id.clone())
            .or_insert_with(|| ParcelEconomics::empty(id.clone(), province))
    }

    pub fn record_harvest(&mut self, id: &ParcelId, province: Province, kg: u64) {
        self.harvested_kg += kg;
        self.parcel_entry(id, province).yield_kg += kg;
    }

    /// Book a sale; revenue is credited to the channel and to the source parcel.
    pub fn record_sale(&mut self, province: Province, sale: SaleRecord) {
        match sale.channel {
            SaleChannel::Retail => self.retail_revenue += sale.revenue,
            SaleChannel::Wholesale => self.wholesale_revenue += sale.revenue,
        }
        self.sold_kg += sale.kg;
        let revenue = sale.revenue;
        let id = sale.parcel_id.clone();
        self.parcel_entry(&id, province).revenue += revenue;
        self.sales.push(sale);
    }

    pub fn record_other_revenue(&mut self, amount: Decimal) {
        self.other_revenue += amount;
    }

    /// Book a farm-level cost that belongs to no single parcel.
    pub fn record_cost(&mut self, category: CostCategory, amount: Decimal) {
        let bucket = match category {
            CostCategory::Maintenance => &mut self.maintenance,
            CostCategory::Operational => &mut self.operational,
            CostCategory::Labor => &mut self.labor,
            CostCategory::Certification => &mut self.certification,
            CostCategory::Investment => &mut self.investment,
        };
        *bucket += amount;
    }

    /// Book a cost and attribute it to a parcel.
    pub fn record_parcel_cost(
        &mut self,
        id: &ParcelId,
        province: Province,
        category: CostCategory,
        amount: Decimal,
    ) {
        self.record_cost(category, amount);
        self.parcel_entry(id, province).costs += amount;
    }

    pub fn harvested_kg(&self) -> u64 {
        self.harvested_kg
    }

    pub fn sold_kg(&self) -> u64 {
        self.sold_kg
    }

    /// Costs booked so far this season.
    pub fn total_costs(&self) -> Decimal {
        self.maintenance + self.operational + self.labor + self.certification + self.investment
    }

    /// Freeze the season into a report and start an empty ledger.
    pub fn close(&mut self, season: Season, season_number: u32) -> SeasonReport {
        let l = std::mem::take(self);
        let total_revenue = l.retail_revenue + l.wholesale_revenue + l.other_revenue;
        let total_costs = l.maintenance + l.operational + l.labor + l.certification + l.investment;
        let parcels = l
            .parcels
            .into_values()
            .map(|mut p| {
                p.net_profit = p.revenue - p.costs;
                p
            })
            .collect();
        SeasonReport {
            season_number,
            season,
            retail_revenue: l.retail_revenue,
            wholesale_revenue: l.wholesale_revenue,
            other_revenue: l.other_revenue,
            maintenance_costs: l.maintenance,
            operational_costs: l.operational,
            labor_costs: l.labor,
            certification_costs: l.certification,
            investment_costs: l.investment,
            total_revenue,
            total_costs,
            net_profit: total_revenue - total_costs,
            harvested_kg: l.harvested_kg,
            sold_kg: l.sold_kg,
            parcels,
            sales: l.sales,
        }
    }
}
