pub mod config;
pub mod engine;
pub mod error;
pub mod paytable;
pub mod rng;
pub mod session;
pub mod simulation;
pub mod symbols;

pub use crate::config::GameConfig;
pub use crate::engine::{evaluate, generate, spin_with_seeds, verify_grid, PayoutResult};
pub use crate::error::{ConfigurationError, SessionError};
pub use crate::paytable::{SymbolEntry, SymbolTable};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng};
pub use crate::session::{Session, SpinReport};
pub use crate::simulation::{simulate, SimulationSummary};
pub use crate::symbols::{Grid, Symbol};
