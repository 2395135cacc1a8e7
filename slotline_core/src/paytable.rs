use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::symbols::Symbol;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolEntry {
    pub symbol: Symbol,
    /// Copies of the symbol in each column pool.
    pub weight: u32,
    pub multiplier: u64,
}

/// Ordered symbol economics: pool abundance and line payout per symbol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolTable(pub Vec<SymbolEntry>);

impl SymbolTable {
    /// Rarer symbols pay more.
    pub fn reference() -> Self {
        Self(vec![
            SymbolEntry {
                symbol: Symbol::A,
                weight: 2,
                multiplier: 5,
            },
            SymbolEntry {
                symbol: Symbol::B,
                weight: 4,
                multiplier: 4,
            },
            SymbolEntry {
                symbol: Symbol::C,
                weight: 6,
                multiplier: 3,
            },
            SymbolEntry {
                symbol: Symbol::D,
                weight: 8,
                multiplier: 2,
            },
        ])
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, symbol: Symbol) -> Option<&SymbolEntry> {
        self.0.iter().find(|e| e.symbol == symbol)
    }

    pub fn multiplier(&self, symbol: Symbol) -> Option<u64> {
        self.get(symbol).map(|e| e.multiplier)
    }

    pub fn weight(&self, symbol: Symbol) -> Option<u32> {
        self.get(symbol).map(|e| e.weight)
    }

    pub fn total_weight(&self) -> u64 {
        self.0.iter().map(|e| u64::from(e.weight)).sum()
    }

    /// Checks what the spin generator relies on: a non-empty table with
    /// positive weights and at most one entry per symbol.
    pub fn validate_weights(&self) -> Result<(), ConfigurationError> {
        if self.0.is_empty() {
            return Err(ConfigurationError::EmptyTable);
        }
        if let Some(e) = self.0.iter().find(|e| e.weight == 0) {
            return Err(ConfigurationError::NonPositiveWeight(e.symbol));
        }
        let mut seen = HashSet::new();
        for e in &self.0 {
            if !seen.insert(e.symbol) {
                return Err(ConfigurationError::DuplicateSymbol(e.symbol));
            }
        }
        Ok(())
    }

    /// Full check used when loading a game config.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.validate_weights()?;
        if let Some(e) = self.0.iter().find(|e| e.multiplier == 0) {
            return Err(ConfigurationError::NonPositiveMultiplier(e.symbol));
        }
        Ok(())
    }

    /// Column pool: each symbol repeated `weight` times, in table order.
    pub fn pool(&self) -> Vec<Symbol> {
        let mut pool = Vec::with_capacity(self.total_weight() as usize);
        for e in &self.0 {
            pool.extend(std::iter::repeat(e.symbol).take(e.weight as usize));
        }
        pool
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::reference()
    }
}
