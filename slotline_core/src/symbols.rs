use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    A,
    B,
    C,
    D,
}

impl Symbol {
    pub const ALL: [Symbol; 4] = [Symbol::A, Symbol::B, Symbol::C, Symbol::D];

    pub fn from_index(i: u8) -> Option<Self> {
        Self::ALL.get(i as usize).copied()
    }

    pub fn to_index(self) -> u8 {
        match self {
            Symbol::A => 0,
            Symbol::B => 1,
            Symbol::C => 2,
            Symbol::D => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::A => "A",
            Symbol::B => "B",
            Symbol::C => "C",
            Symbol::D => "D",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Symbol::A),
            "B" | "b" => Ok(Symbol::B),
            "C" | "c" => Ok(Symbol::C),
            "D" | "d" => Ok(Symbol::D),
            other => Err(ConfigurationError::UnparsableSymbol(other.to_string())),
        }
    }
}

/// A spun window, stored column-major: `columns[c][r]` is the symbol shown
/// at row `r` of reel `c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: Vec<Vec<Symbol>>,
}

impl Grid {
    pub fn new(columns: Vec<Vec<Symbol>>) -> Self {
        Self { columns }
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    /// Rows present in every column. A ragged grid only exposes its shortest column.
    pub fn rows(&self) -> usize {
        self.columns.iter().map(Vec::len).min().unwrap_or(0)
    }

    pub fn symbol_at(&self, col: usize, row: usize) -> Option<Symbol> {
        self.columns.get(col).and_then(|c| c.get(row)).copied()
    }

    /// Symbols across all columns at `row`, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Symbol> + '_ {
        self.columns.iter().filter_map(move |c| c.get(row).copied())
    }

    pub fn to_indices(&self) -> Vec<Vec<u8>> {
        self.columns
            .iter()
            .map(|col| col.iter().map(|s| s.to_index()).collect())
            .collect()
    }

    /// Parses `"A,B,C/D,D,D/..."`: columns separated by `/`, rows by `,`.
    pub fn parse_columns(s: &str) -> Result<Self, ConfigurationError> {
        let columns = s
            .split('/')
            .map(|col| col.split(',').map(Symbol::from_str).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<Vec<Symbol>>, _>>()?;
        Ok(Self { columns })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            let line: Vec<&str> = self.row(r).map(Symbol::as_str).collect();
            writeln!(f, "{}", line.join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for s in Symbol::ALL {
            assert_eq!(Symbol::from_index(s.to_index()), Some(s));
        }
        assert_eq!(Symbol::from_index(4), None);
    }

    #[test]
    fn test_grid_display_is_row_major() {
        let grid = Grid::new(vec![
            vec![Symbol::A, Symbol::B],
            vec![Symbol::C, Symbol::D],
        ]);
        assert_eq!(grid.to_string(), "A | C\nB | D\n");
    }

    #[test]
    fn test_parse_columns() {
        let grid = Grid::parse_columns("A,B,C/d,d,d").unwrap();
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.symbol_at(1, 2), Some(Symbol::D));
        assert!(matches!(
            Grid::parse_columns("A,X"),
            Err(ConfigurationError::UnparsableSymbol(s)) if s == "X"
        ));
    }

    #[test]
    fn test_ragged_grid_rows() {
        let grid = Grid::new(vec![vec![Symbol::A; 3], vec![Symbol::A; 2]]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(Grid::new(vec![]).rows(), 0);
    }
}
