//! Monte-Carlo return estimate for a game config.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::GameConfig,
    engine::{evaluate, generate},
    error::ConfigurationError,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub spins: u64,
    pub total_bet: u64,
    pub total_won: u64,
    pub winning_spins: u64,
    /// Per-line hit counts, index 0 = line 1.
    pub line_hits: Vec<u64>,
}

impl SimulationSummary {
    pub fn return_to_player(&self) -> f64 {
        if self.total_bet == 0 {
            0.0
        } else {
            self.total_won as f64 / self.total_bet as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        if self.spins == 0 {
            0.0
        } else {
            self.winning_spins as f64 / self.spins as f64
        }
    }
}

/// Plays `spins` rounds of `lines × bet` with no balance limit.
pub fn simulate<R: Rng + ?Sized>(
    config: &GameConfig,
    lines: usize,
    bet: u64,
    spins: u64,
    rng: &mut R,
) -> Result<SimulationSummary, ConfigurationError> {
    config.validate()?;
    if lines == 0 {
        return Err(ConfigurationError::ZeroLines);
    }
    if lines > config.max_lines {
        return Err(ConfigurationError::LinesExceedMax {
            lines,
            max_lines: config.max_lines,
        });
    }
    let total_bet_per_spin = bet
        .checked_mul(lines as u64)
        .ok_or(ConfigurationError::PayoutOverflow)?;

    let mut summary = SimulationSummary {
        line_hits: vec![0; lines],
        ..Default::default()
    };
    for _ in 0..spins {
        let grid = generate(config.rows, config.cols, &config.table, rng)?;
        let payout = evaluate(&grid, lines, bet, &config.table)?;
        summary.spins += 1;
        summary.total_bet = summary.total_bet.saturating_add(total_bet_per_spin);
        summary.total_won = summary.total_won.saturating_add(payout.winnings);
        if payout.is_win() {
            summary.winning_spins += 1;
        }
        for line in &payout.winning_lines {
            summary.line_hits[line - 1] += 1;
        }
    }
    info!(
        spins,
        rtp = summary.return_to_player(),
        hit_rate = summary.hit_rate(),
        "simulation finished"
    );
    Ok(summary)
}
