use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    config::GameConfig,
    error::ConfigurationError,
    paytable::SymbolTable,
    rng::ProvablyFairRng,
    symbols::Grid,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutResult {
    pub winnings: u64,
    /// 1-indexed, ascending.
    pub winning_lines: Vec<usize>,
}

impl PayoutResult {
    pub fn is_win(&self) -> bool {
        !self.winning_lines.is_empty()
    }
}

/// Draws `rows` symbols per column without replacement from a pool holding
/// each symbol `weight` times. Every column starts from a fresh pool.
pub fn generate<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    table: &SymbolTable,
    rng: &mut R,
) -> Result<Grid, ConfigurationError> {
    table.validate_weights()?;
    if rows == 0 || cols == 0 {
        return Err(ConfigurationError::ZeroDimension { rows, cols });
    }
    let total_weight = table.total_weight();
    if rows as u64 > total_weight {
        return Err(ConfigurationError::InsufficientPool { rows, total_weight });
    }

    let all_symbols = table.pool();
    let mut columns = Vec::with_capacity(cols);
    for col in 0..cols {
        let mut pool = all_symbols.clone();
        let mut column = Vec::with_capacity(rows);
        for _ in 0..rows {
            // pool order does not matter to a uniform draw
            let idx = rng.gen_range(0..pool.len());
            column.push(pool.swap_remove(idx));
        }
        trace!(col, ?column, "column drawn");
        columns.push(column);
    }
    Ok(Grid::new(columns))
}

/// Pays every one of the first `lines` rows whose symbol is the same in
/// all columns, at `multiplier × bet`.
pub fn evaluate(
    grid: &Grid,
    lines: usize,
    bet: u64,
    table: &SymbolTable,
) -> Result<PayoutResult, ConfigurationError> {
    if grid.cols() == 0 {
        return Err(ConfigurationError::EmptyGrid);
    }
    if lines == 0 {
        return Err(ConfigurationError::ZeroLines);
    }
    let rows = grid.rows();
    if lines > rows {
        return Err(ConfigurationError::LinesExceedRows { lines, rows });
    }

    let mut result = PayoutResult::default();
    for line in 0..lines {
        let mut row = grid.row(line);
        let Some(symbol) = row.next() else {
            continue;
        };
        if !row.all(|s| s == symbol) {
            continue;
        }
        let multiplier = table
            .multiplier(symbol)
            .ok_or(ConfigurationError::UnknownSymbol(symbol))?;
        let line_win = multiplier
            .checked_mul(bet)
            .ok_or(ConfigurationError::PayoutOverflow)?;
        result.winnings = result
            .winnings
            .checked_add(line_win)
            .ok_or(ConfigurationError::PayoutOverflow)?;
        result.winning_lines.push(line + 1);
    }
    debug!(
        lines,
        bet,
        winnings = result.winnings,
        winning_lines = ?result.winning_lines,
        "evaluated grid"
    );
    Ok(result)
}

/// Draws a grid for `config` from the provably-fair stream of the given seeds.
pub fn spin_with_seeds(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    config: &GameConfig,
) -> Result<Grid, ConfigurationError> {
    let mut rng = ProvablyFairRng::new(server_seed, client_seed, nonce);
    generate(config.rows, config.cols, &config.table, &mut rng)
}

/// Verify that a reported grid matches what the seeds would produce.
pub fn verify_grid(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    config: &GameConfig,
    expected: &Grid,
) -> Result<bool, ConfigurationError> {
    let actual = spin_with_seeds(server_seed, client_seed, nonce, config)?;
    Ok(&actual == expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::SymbolEntry;
    use crate::symbols::Symbol::{self, A, B, C, D};
    use rand::{rngs::StdRng, SeedableRng};

    fn grid(columns: &[&[Symbol]]) -> Grid {
        Grid::new(columns.iter().map(|c| c.to_vec()).collect())
    }

    #[test]
    fn test_generate_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let table = SymbolTable::reference();
        let grid = generate(3, 5, &table, &mut rng).unwrap();
        assert_eq!(grid.cols(), 5);
        assert!(grid.columns.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn test_generate_exhausts_pool_exactly() {
        // rows == total weight: every column is a permutation of the pool
        let table = SymbolTable(vec![
            SymbolEntry {
                symbol: A,
                weight: 1,
                multiplier: 5,
            },
            SymbolEntry {
                symbol: B,
                weight: 2,
                multiplier: 4,
            },
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let grid = generate(3, 4, &table, &mut rng).unwrap();
        for column in &grid.columns {
            let mut sorted = column.clone();
            sorted.sort();
            assert_eq!(sorted, vec![A, B, B]);
        }
    }

    #[test]
    fn test_generate_errors() {
        let mut rng = StdRng::seed_from_u64(0);
        let single = SymbolTable(vec![SymbolEntry {
            symbol: A,
            weight: 2,
            multiplier: 5,
        }]);
        assert_eq!(
            generate(3, 3, &single, &mut rng),
            Err(ConfigurationError::InsufficientPool {
                rows: 3,
                total_weight: 2
            })
        );
        assert_eq!(
            generate(3, 3, &SymbolTable(vec![]), &mut rng),
            Err(ConfigurationError::EmptyTable)
        );
        let zero = SymbolTable(vec![SymbolEntry {
            symbol: C,
            weight: 0,
            multiplier: 3,
        }]);
        assert_eq!(
            generate(1, 1, &zero, &mut rng),
            Err(ConfigurationError::NonPositiveWeight(C))
        );
        assert_eq!(
            generate(3, 0, &SymbolTable::reference(), &mut rng),
            Err(ConfigurationError::ZeroDimension { rows: 3, cols: 0 })
        );
    }

    #[test]
    fn test_generate_rejects_duplicate_symbol() {
        let mut rng = StdRng::seed_from_u64(5);
        let table = SymbolTable(vec![
            SymbolEntry {
                symbol: A,
                weight: 1,
                multiplier: 5,
            },
            SymbolEntry {
                symbol: A,
                weight: 1,
                multiplier: 1,
            },
            SymbolEntry {
                symbol: B,
                weight: 1,
                multiplier: 4,
            },
        ]);
        let mut untouched = StdRng::seed_from_u64(5);
        assert_eq!(
            generate(2, 3, &table, &mut rng),
            Err(ConfigurationError::DuplicateSymbol(A))
        );
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_generate_failure_consumes_no_randomness() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut untouched = StdRng::seed_from_u64(11);
        let _ = generate(30, 3, &SymbolTable::reference(), &mut rng);
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_evaluate_all_lines_win() {
        let g = grid(&[&[A, A, A], &[A, A, A]]);
        let out = evaluate(&g, 3, 10, &SymbolTable::reference()).unwrap();
        assert_eq!(out.winnings, 150);
        assert_eq!(out.winning_lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_evaluate_first_line_only() {
        let g = grid(&[&[A, B, C], &[A, C, B]]);
        let out = evaluate(&g, 3, 10, &SymbolTable::reference()).unwrap();
        assert_eq!(out.winnings, 50);
        assert_eq!(out.winning_lines, vec![1]);
    }

    #[test]
    fn test_evaluate_respects_line_count() {
        let g = grid(&[&[D, B, C], &[A, B, C], &[A, B, C]]);
        let table = SymbolTable::reference();
        let one = evaluate(&g, 1, 5, &table).unwrap();
        assert!(!one.is_win());
        assert_eq!(one.winnings, 0);
        let two = evaluate(&g, 2, 5, &table).unwrap();
        assert_eq!(two.winning_lines, vec![2]);
        assert_eq!(two.winnings, 20);
        let three = evaluate(&g, 3, 5, &table).unwrap();
        assert_eq!(three.winning_lines, vec![2, 3]);
        assert_eq!(three.winnings, 20 + 15);
    }

    #[test]
    fn test_evaluate_single_column_always_matches() {
        let g = grid(&[&[B, D]]);
        let out = evaluate(&g, 2, 1, &SymbolTable::reference()).unwrap();
        assert_eq!(out.winning_lines, vec![1, 2]);
        assert_eq!(out.winnings, 6);
    }

    #[test]
    fn test_evaluate_errors() {
        let table = SymbolTable::reference();
        let g = grid(&[&[A, B, C], &[A, B, C]]);
        assert_eq!(evaluate(&g, 0, 10, &table), Err(ConfigurationError::ZeroLines));
        assert_eq!(
            evaluate(&g, 4, 10, &table),
            Err(ConfigurationError::LinesExceedRows { lines: 4, rows: 3 })
        );
        assert_eq!(
            evaluate(&Grid::new(vec![]), 1, 10, &table),
            Err(ConfigurationError::EmptyGrid)
        );
        let only_a = SymbolTable(vec![SymbolEntry {
            symbol: A,
            weight: 2,
            multiplier: 5,
        }]);
        assert_eq!(
            evaluate(&grid(&[&[D], &[D]]), 1, 1, &only_a),
            Err(ConfigurationError::UnknownSymbol(D))
        );
        assert_eq!(
            evaluate(&grid(&[&[A], &[A]]), 1, u64::MAX, &table),
            Err(ConfigurationError::PayoutOverflow)
        );
    }

    #[test]
    fn test_spin_with_seeds_deterministic() {
        let config = GameConfig::default();
        let g1 = spin_with_seeds("server", "client", 1, &config).unwrap();
        let g2 = spin_with_seeds("server", "client", 1, &config).unwrap();
        assert_eq!(g1, g2);
        assert!(verify_grid("server", "client", 1, &config, &g1).unwrap());
    }
}
