use crate::symbols::Symbol;

/// Rejected inputs to the spin generator, the payout evaluator or a game config.
/// Raised before any randomness is consumed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("symbol table is empty")]
    EmptyTable,
    #[error("symbol {0} has a non-positive pool weight")]
    NonPositiveWeight(Symbol),
    #[error("symbol {0} has a non-positive payout multiplier")]
    NonPositiveMultiplier(Symbol),
    #[error("symbol {0} appears more than once in the table")]
    DuplicateSymbol(Symbol),
    #[error("symbol {0} is not in the table")]
    UnknownSymbol(Symbol),
    #[error("unparsable symbol {0:?}")]
    UnparsableSymbol(String),
    #[error("grid needs at least one row and one column (got {rows}x{cols})")]
    ZeroDimension { rows: usize, cols: usize },
    #[error("column pool of {total_weight} symbols cannot fill {rows} rows")]
    InsufficientPool { rows: usize, total_weight: u64 },
    #[error("grid has no columns")]
    EmptyGrid,
    #[error("at least one line must be played")]
    ZeroLines,
    #[error("{lines} lines requested but the grid has {rows} rows")]
    LinesExceedRows { lines: usize, rows: usize },
    #[error("{lines} lines requested but at most {max_lines} may be played")]
    LinesExceedMax { lines: usize, max_lines: usize },
    #[error("invalid bet bounds: min {min_bet}, max {max_bet}")]
    InvalidBetBounds { min_bet: u64, max_bet: u64 },
    #[error("payout overflows")]
    PayoutOverflow,
    #[error("invalid config: {0}")]
    Parse(String),
}

/// Caller-side failures when driving a [`crate::session::Session`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("deposit amount must be greater than 0")]
    InvalidDeposit,
    #[error("not enough to bet ${total_bet}, your current balance is: ${balance}")]
    InsufficientFunds { balance: u64, total_bet: u64 },
    #[error("lines must be between 1 and {max_lines} (got {lines})")]
    LinesOutOfRange { lines: usize, max_lines: usize },
    #[error("bet must be between ${min_bet} and ${max_bet} (got ${bet})")]
    BetOutOfRange { bet: u64, min_bet: u64, max_bet: u64 },
    #[error("balance overflows")]
    BalanceOverflow,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
