use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::paytable::SymbolTable;

pub const ROWS: usize = 3;
pub const COLS: usize = 3;
pub const MAX_LINES: usize = 3;
pub const MIN_BET: u64 = 1;
pub const MAX_BET: u64 = 100;

/// Grid shape, betting limits and symbol economics for one game.
/// Fields missing from a config file fall back to the reference game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub max_lines: usize,
    pub min_bet: u64,
    pub max_bet: u64,
    pub table: SymbolTable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            max_lines: MAX_LINES,
            min_bet: MIN_BET,
            max_bet: MAX_BET,
            table: SymbolTable::reference(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigurationError::ZeroDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.max_lines == 0 {
            return Err(ConfigurationError::ZeroLines);
        }
        if self.max_lines > self.rows {
            return Err(ConfigurationError::LinesExceedRows {
                lines: self.max_lines,
                rows: self.rows,
            });
        }
        if self.min_bet == 0 || self.min_bet > self.max_bet {
            return Err(ConfigurationError::InvalidBetBounds {
                min_bet: self.min_bet,
                max_bet: self.max_bet,
            });
        }
        self.table.validate()?;
        let total_weight = self.table.total_weight();
        if self.rows as u64 > total_weight {
            return Err(ConfigurationError::InsufficientPool {
                rows: self.rows,
                total_weight,
            });
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigurationError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&raw)
    }
}
