use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{SplitError, SplitResult};
use crate::types::DEFAULT_TOLERANCE;

/// Engine settings, read from `expense_split.toml` and `EXPENSE_SPLIT_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    /// Balances closer to zero than this are treated as settled. Must be positive.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
    /// Decimal places used when amounts are written out.
    #[serde(default = "default_display_scale")]
    pub display_scale: u32,
}

fn default_tolerance() -> Decimal {
    DEFAULT_TOLERANCE
}

fn default_display_scale() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            display_scale: default_display_scale(),
        }
    }
}

impl EngineConfig {
    pub fn load() -> SplitResult<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("expense_split").required(false))
            .add_source(config::Environment::with_prefix("EXPENSE_SPLIT"))
            .build()?;

        Self::from_config(config)
    }

    pub fn from_config(config: config::Config) -> SplitResult<Self> {
        let engine: EngineConfig = config.try_deserialize()?;
        engine.validate()
    }

    fn validate(self) -> SplitResult<Self> {
        if self.tolerance <= Decimal::ZERO {
            return Err(SplitError::InvalidTolerance(self.tolerance));
        }
        Ok(self)
    }
}
