//! YAML scenario files: a farm plus optional rule overrides.

use anyhow::{Context, Result};
use farm_core::{validate_farm, validate_rules, Farm, GameRules};
use serde::Deserialize;
use std::path::Path;

/// Bundled starter scenario, used when no `--scenario` is given.
pub const STARTER: &str = include_str!("../scenarios/opole_starter.yaml");

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub rules: GameRules,
    pub farm: Farm,
}

impl Scenario {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text).context("parsing scenario YAML")?;
        validate_rules(&scenario.rules).context("scenario rules")?;
        validate_farm(&scenario.farm).context("scenario farm")?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_yaml(&text)
    }
}
