#![deny(warnings)]

//! Season and year financial statistics.
//!
//! A [`SeasonLedger`] collects harvests, sales and costs while a season is
//! running. [`StatisticsAggregator::close_season`] freezes it into an
//! immutable [`SeasonReport`] and, at every fourth season, folds the year
//! into a [`YearlyReport`]. History is append-only.

use thiserror::Error;
use tracing::info;

pub mod ledger;
pub mod report;

pub use ledger::{CostCategory, SeasonLedger};
pub use report::{
    fold_year, FarmStatistics, ParcelEconomics, SaleRecord, SeasonReport, YearlyReport,
};

use farm_core::Season;

/// Errors raised while building the report history.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// Season numbers must follow each other without gaps.
    #[error("season {got} closed out of order, expected {expected}")]
    SeasonGap { expected: u32, got: u32 },
    /// A year is exactly four seasons.
    #[error("a year needs 4 seasons, got {0}")]
    WrongSeasonCount(usize),
    /// Season numbers start at 1.
    #[error("season number 0 is not a valid closed season")]
    ZeroSeason,
}

/// Reports produced by closing one season.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonClose {
    pub report: SeasonReport,
    /// Present when the season completed a year.
    pub yearly: Option<YearlyReport>,
}

/// Owns the running ledger and the report history of one farm.
#[derive(Clone, Debug, Default)]
pub struct StatisticsAggregator {
    ledger: SeasonLedger,
    seasons: Vec<SeasonReport>,
    years: Vec<YearlyReport>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &SeasonLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut SeasonLedger {
        &mut self.ledger
    }

    /// Freeze the running ledger as season `season_number` (1-based).
    ///
    /// On a failed ordering check the ledger is left untouched.
    pub fn close_season(
        &mut self,
        season: Season,
        season_number: u32,
    ) -> Result<SeasonClose, StatsError> {
        if season_number == 0 {
            return Err(StatsError::ZeroSeason);
        }
        if let Some(last) = self.seasons.last() {
            let expected = last.season_number + 1;
            if season_number != expected {
                return Err(StatsError::SeasonGap {
                    expected,
                    got: season_number,
                });
            }
        }

        let report = self.ledger.close(season, season_number);
        info!(
            season_number,
            %season,
            revenue = %report.total_revenue,
            costs = %report.total_costs,
            net = %report.net_profit,
            "season closed"
        );
        self.seasons.push(report.clone());

        let mut yearly = None;
        if season_number % 4 == 0 && self.seasons.len() >= 4 {
            let year = season_number / 4;
            let y = fold_year(year, &self.seasons[self.seasons.len() - 4..])?;
            info!(year, net = %y.net_profit, best_parcel = ?y.best_parcel, "year closed");
            self.years.push(y.clone());
            yearly = Some(y);
        }
        Ok(SeasonClose { report, yearly })
    }

    pub fn season_reports(&self) -> &[SeasonReport] {
        &self.seasons
    }

    pub fn yearly_reports(&self) -> &[YearlyReport] {
        &self.years
    }

    pub fn latest_season(&self) -> Option<&SeasonReport> {
        self.seasons.last()
    }

    pub fn lifetime(&self) -> FarmStatistics {
        FarmStatistics::from_reports(&self.seasons)
    }
}
