#![deny(warnings)]

//! Headless CLI: plays a farm scenario for a number of years with a simple
//! strategy and prints season KPIs and yearly summaries.

mod scenario;

use anyhow::Result;
use farm_core::{ParcelId, Season};
use farm_econ::SaleChannel;
use farm_runtime::{ActionError, FarmSession};
use farm_stats::{FarmStatistics, SeasonReport, YearlyReport};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use scenario::Scenario;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Trees planted per hectare of bare land.
const TREES_PER_HA: i64 = 400;
/// Share of a harvest sold at the farm gate in summer.
const RETAIL_SHARE: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

struct Args {
    scenario: Option<PathBuf>,
    years: u32,
    json: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        scenario: None,
        years: 1,
        json: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = it.next().map(PathBuf::from),
            "--years" => {
                if let Some(y) = it.next().and_then(|s| s.parse().ok()) {
                    args.years = y;
                }
            }
            "--json" => args.json = true,
            _ => {}
        }
    }
    args
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    scenario: &'a str,
    seasons: &'a [SeasonReport],
    years: &'a [YearlyReport],
    lifetime: FarmStatistics,
}

/// Spring field work, only while the farm can still afford the next harvest.
fn spring_work(s: &mut FarmSession) {
    let ids: Vec<ParcelId> = s.farm().parcels.iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        let Some(p) = s.farm().parcel(id) else { continue };
        let bare = !p.is_planted();
        let thirsty = p.water_level.value() < 0.5;
        let depleted = p.fertility.value() < 0.8;
        let trees = (p.area_ha * Decimal::from(TREES_PER_HA))
            .floor()
            .to_u32()
            .unwrap_or(0);

        if bare && trees > 0 {
            let cost = s.rules().tree_planting_cost * Decimal::from(trees);
            if !s.stability_after_spend(cost).is_risky {
                if let Err(e) = s.plant_trees(id, trees) {
                    warn!(parcel = %id, error = %e, "planting skipped");
                }
            }
        }
        if thirsty && !s.stability_after_spend(s.rules().water_action_cost).is_risky {
            if let Err(e) = s.water_parcel(id) {
                warn!(parcel = %id, error = %e, "watering skipped");
            }
        }
        if depleted && !s.stability_after_spend(s.rules().fertilize_action_cost).is_risky {
            if let Err(e) = s.fertilize_parcel(id) {
                warn!(parcel = %id, error = %e, "fertilizing skipped");
            }
        }
    }
}

fn summer_harvest(s: &mut FarmSession) -> Result<()> {
    let ids: Vec<ParcelId> = s.farm().parcels.iter().map(|p| p.id.clone()).collect();
    for id in &ids {
        match s.harvest(id) {
            // young, bare or already picked parcels are simply skipped
            Ok(_)
            | Err(
                ActionError::TreesNotReady(_)
                | ActionError::NoTrees(_)
                | ActionError::AlreadyHarvested(_),
            ) => {}
            Err(e) => warn!(parcel = %id, error = %e, "harvest skipped"),
        }
    }
    let stock = Decimal::from(s.farm().inventory.total_kg());
    let retail = (stock * RETAIL_SHARE).floor().to_u64().unwrap_or(0);
    if retail > 0 {
        s.sell(SaleChannel::Retail, retail)?;
    }
    Ok(())
}

fn sell_remaining(s: &mut FarmSession) -> Result<()> {
    let stock = s.farm().inventory.total_kg();
    if stock > 0 {
        s.sell(SaleChannel::Wholesale, stock)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logging setup
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .init();

    let args = parse_args();
    info!(
        scenario = ?args.scenario,
        years = args.years,
        git_sha = env!("GIT_SHA"),
        build_date = env!("BUILD_DATE"),
        "starting CLI"
    );

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::from_yaml(scenario::STARTER)?,
    };
    let mut session = FarmSession::new(scenario.farm, scenario.rules)?;

    for _ in 0..args.years.saturating_mul(4) {
        match session.farm().season {
            Season::Spring => spring_work(&mut session),
            Season::Summer => summer_harvest(&mut session)?,
            Season::Autumn => sell_remaining(&mut session)?,
            Season::Winter => {}
        }
        let out = session.advance_season()?;
        if !args.json {
            let r = &out.report;
            println!(
                "Season {:>3} {:<6} | revenue: {} PLN | costs: {} PLN | net: {} PLN | harvested: {} kg | sold: {} kg | cash: {} PLN{}",
                r.season_number,
                r.season.to_string(),
                r.total_revenue,
                r.total_costs,
                r.net_profit,
                r.harvested_kg,
                r.sold_kg,
                session.farm().cash,
                if out.stability.is_risky { " | RISKY" } else { "" }
            );
            if let Some(y) = &out.yearly {
                println!(
                    "Year {} | revenue: {} PLN | costs: {} PLN | net: {} PLN | best parcel: {} | best province: {}",
                    y.year,
                    y.total_revenue,
                    y.total_costs,
                    y.net_profit,
                    y.best_parcel.as_ref().map_or("-".to_string(), |p| p.to_string()),
                    y.best_province.map_or("-".to_string(), |p| format!("{p:?}")),
                );
            }
        }
    }

    let stats = session.stats();
    if args.json {
        let out = JsonOutput {
            scenario: &scenario.name,
            seasons: stats.season_reports(),
            years: stats.yearly_reports(),
            lifetime: stats.lifetime(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let life = stats.lifetime();
        println!(
            "KPI | {} | seasons: {} | harvested: {} kg | sold: {} kg | revenue: {} PLN | costs: {} PLN | avg price: {} PLN/kg",
            scenario.name,
            life.seasons_played,
            life.total_harvested,
            life.total_sold,
            life.total_revenue,
            life.total_costs,
            life.average_price.map_or("-".to_string(), |p| p.round_dp(2).to_string()),
        );
    }
    Ok(())
}
