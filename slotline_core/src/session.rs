use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    engine::{evaluate, generate, PayoutResult},
    error::SessionError,
    symbols::Grid,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinReport {
    pub grid: Grid,
    pub payout: PayoutResult,
    pub total_bet: u64,
    /// Balance after the bet was taken and winnings credited.
    pub balance: u64,
}

/// One player's balance over a game. The engine functions never see the
/// balance; all debiting and crediting happens here.
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    balance: u64,
    nonce: u64,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            balance: 0,
            nonce: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Completed spins so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn deposit(&mut self, amount: u64) -> Result<u64, SessionError> {
        if amount == 0 {
            return Err(SessionError::InvalidDeposit);
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(SessionError::BalanceOverflow)?;
        info!(amount, balance = self.balance, "deposit");
        Ok(self.balance)
    }

    /// Checks lines, bet and funds without touching the balance.
    pub fn total_bet(&self, lines: usize, bet: u64) -> Result<u64, SessionError> {
        let max_lines = self.config.max_lines;
        if lines == 0 || lines > max_lines {
            return Err(SessionError::LinesOutOfRange { lines, max_lines });
        }
        let (min_bet, max_bet) = (self.config.min_bet, self.config.max_bet);
        if bet < min_bet || bet > max_bet {
            return Err(SessionError::BetOutOfRange {
                bet,
                min_bet,
                max_bet,
            });
        }
        let total_bet = bet
            .checked_mul(lines as u64)
            .ok_or(SessionError::BalanceOverflow)?;
        if total_bet > self.balance {
            return Err(SessionError::InsufficientFunds {
                balance: self.balance,
                total_bet,
            });
        }
        Ok(total_bet)
    }

    pub fn spin<R: Rng + ?Sized>(
        &mut self,
        lines: usize,
        bet: u64,
        rng: &mut R,
    ) -> Result<SpinReport, SessionError> {
        let total_bet = self.total_bet(lines, bet)?;
        let grid = generate(self.config.rows, self.config.cols, &self.config.table, rng)?;
        let payout = evaluate(&grid, lines, bet, &self.config.table)?;

        self.balance = (self.balance - total_bet)
            .checked_add(payout.winnings)
            .ok_or(SessionError::BalanceOverflow)?;
        self.nonce += 1;
        debug!(
            nonce = self.nonce,
            total_bet,
            winnings = payout.winnings,
            balance = self.balance,
            "spin settled"
        );
        Ok(SpinReport {
            grid,
            payout,
            total_bet,
            balance: self.balance,
        })
    }
}
