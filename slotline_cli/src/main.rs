use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::{Parser, Subcommand};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use slotline_core::{
    evaluate, generate, simulate, verify_grid, GameConfig, Grid, PayoutResult, ProvablyFairRng,
    Session, SessionError, SpinReport,
};

#[derive(Parser)]
#[command(name = "slotline", about = "Three-reel slot machine in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Game config JSON; defaults to the reference 3x3 game
    #[arg(long, value_parser, env = "SLOTLINE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session: deposit, pick lines and bet, spin
    Play {
        /// Use the provably-fair generator with this server seed
        #[arg(long)]
        server_seed: Option<String>,
        #[arg(long, default_value = "player")]
        client_seed: String,
    },
    /// Spin once and print the grid and payout
    Spin {
        #[arg(long, default_value_t = 1)]
        lines: usize,
        #[arg(long, default_value_t = 1)]
        bet: u64,
        /// Random if omitted
        #[arg(long)]
        server_seed: Option<String>,
        #[arg(long, default_value = "player")]
        client_seed: String,
        #[arg(long, default_value_t = 0)]
        nonce: u64,
        #[arg(long)]
        json: bool,
    },
    /// Check a reported grid against revealed seeds
    Verify {
        #[arg(long)]
        server_seed: String,
        #[arg(long)]
        client_seed: String,
        #[arg(long)]
        nonce: u64,
        /// Columns separated by '/', rows by ',', e.g. "A,B,C/D,D,D/B,C,A"
        #[arg(long)]
        grid: String,
    },
    /// Estimate return-to-player over many spins
    Simulate {
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long, default_value_t = 1)]
        lines: usize,
        #[arg(long, default_value_t = 1)]
        bet: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct SpinOutput<'a> {
    server_seed_hash: String,
    client_seed: &'a str,
    nonce: u64,
    grid: &'a Grid,
    #[serde(flatten)]
    payout: &'a PayoutResult,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Validates lines and bet against the config and returns `bet × lines`.
fn spin_total_bet(config: &GameConfig, lines: usize, bet: u64) -> anyhow::Result<u64> {
    ensure!(
        (1..=config.max_lines).contains(&lines),
        "lines must be between 1 and {}",
        config.max_lines
    );
    ensure!(
        (config.min_bet..=config.max_bet).contains(&bet),
        "bet must be between {} and {}",
        config.min_bet,
        config.max_bet
    );
    bet.checked_mul(lines as u64).context("total bet overflows")
}

fn random_seed() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

fn print_outcome(grid: &Grid, payout: &PayoutResult) {
    print!("{grid}");
    if payout.is_win() {
        let lines: Vec<String> = payout
            .winning_lines
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "Congratulations! You won ${} on lines: {}",
            payout.winnings,
            lines.join(", ")
        );
    } else {
        println!("Better luck next time. You didn't win anything.");
    }
}

/// Randomness behind an interactive session.
enum SpinSource {
    Entropy(StdRng),
    ProvablyFair {
        server_seed: String,
        client_seed: String,
    },
}

impl SpinSource {
    fn spin(
        &mut self,
        session: &mut Session,
        lines: usize,
        bet: u64,
    ) -> Result<SpinReport, SessionError> {
        match self {
            SpinSource::Entropy(rng) => session.spin(lines, bet, rng),
            SpinSource::ProvablyFair {
                server_seed,
                client_seed,
            } => {
                let mut rng = ProvablyFairRng::new(
                    server_seed.as_str(),
                    client_seed.as_str(),
                    session.nonce(),
                );
                session.spin(lines, bet, &mut rng)
            }
        }
    }
}

const HELP: &str =
    "commands: deposit <amount> | lines <n> | bet <amount> | spin | balance | help | quit";

fn play(
    config: GameConfig,
    server_seed: Option<String>,
    client_seed: String,
) -> anyhow::Result<()> {
    let mut session = Session::new(config)?;
    let mut source = match server_seed {
        Some(server_seed) => {
            let hash = slotline_core::derive_hash_hex(server_seed.as_bytes());
            println!("Server seed hash: {hash} (client seed {client_seed})");
            SpinSource::ProvablyFair {
                server_seed,
                client_seed,
            }
        }
        None => SpinSource::Entropy(StdRng::from_entropy()),
    };
    let mut lines = 1usize;
    let mut bet = session.config().min_bet;

    println!("{HELP}");
    println!("Balance: ${} | Lines: {lines} | Bet: ${bet}", session.balance());
    let stdin = io::stdin();
    let mut out = io::stdout();
    for input in stdin.lock().lines() {
        let input = input?;
        let mut words = input.split_whitespace();
        let Some(command) = words.next() else {
            continue;
        };
        let arg = words.next().map(str::parse::<u64>);
        match (command, arg) {
            ("deposit", Some(Ok(amount))) => match session.deposit(amount) {
                Ok(balance) => println!("Balance: ${balance}"),
                Err(e) => println!("Invalid deposit: {e}"),
            },
            ("lines", Some(Ok(n))) => {
                let max_lines = session.config().max_lines;
                if n == 0 || n as usize > max_lines {
                    println!("Lines must be between 1 and {max_lines}");
                } else {
                    lines = n as usize;
                    println!("Lines: {lines}");
                }
            }
            ("bet", Some(Ok(amount))) => {
                let (min_bet, max_bet) = (session.config().min_bet, session.config().max_bet);
                if (min_bet..=max_bet).contains(&amount) {
                    bet = amount;
                    println!("Bet: ${bet}");
                } else {
                    println!("Bet must be between ${min_bet} and ${max_bet}");
                }
            }
            ("spin", None) => match source.spin(&mut session, lines, bet) {
                Ok(report) => {
                    print_outcome(&report.grid, &report.payout);
                    println!("Balance: ${}", report.balance);
                }
                Err(SessionError::Configuration(e)) => return Err(e.into()),
                Err(e) => println!("{e}"),
            },
            ("balance", None) => {
                println!("Balance: ${} | Lines: {lines} | Bet: ${bet}", session.balance())
            }
            ("help", None) => println!("{HELP}"),
            ("quit" | "exit", None) => break,
            (_, Some(Err(e))) => println!("Not a number: {e}"),
            _ => println!("{HELP}"),
        }
        out.flush()?;
    }

    if let SpinSource::ProvablyFair {
        server_seed,
        client_seed,
    } = &source
    {
        println!(
            "Revealed server seed: {server_seed} (client seed {client_seed}, {} spins)",
            session.nonce()
        );
    }
    println!("Cashing out ${}", session.balance());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    let config = load_config(cli.config)?;
    debug!(?config, "loaded game config");

    match cli.command {
        Commands::Play {
            server_seed,
            client_seed,
        } => play(config, server_seed, client_seed)?,
        Commands::Spin {
            lines,
            bet,
            server_seed,
            client_seed,
            nonce,
            json,
        } => {
            let total_bet = spin_total_bet(&config, lines, bet)?;
            let server_seed = server_seed.unwrap_or_else(random_seed);
            let mut rng = ProvablyFairRng::new(server_seed.as_str(), client_seed.as_str(), nonce);
            let grid = generate(config.rows, config.cols, &config.table, &mut rng)?;
            let payout = evaluate(&grid, lines, bet, &config.table)?;
            if json {
                let out = SpinOutput {
                    server_seed_hash: rng.server_seed_hash_hex(),
                    client_seed: &client_seed,
                    nonce,
                    grid: &grid,
                    payout: &payout,
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "server_seed_hash={} nonce={nonce} total_bet=${total_bet}",
                    rng.server_seed_hash_hex()
                );
                print_outcome(&grid, &payout);
            }
        }
        Commands::Verify {
            server_seed,
            client_seed,
            nonce,
            grid,
        } => {
            let expected = Grid::parse_columns(&grid)?;
            if verify_grid(&server_seed, &client_seed, nonce, &config, &expected)? {
                println!("OK: grid matches seeds");
            } else {
                warn!(nonce, "grid does not match seeds");
                println!("MISMATCH: grid was not produced by these seeds");
                std::process::exit(1);
            }
        }
        Commands::Simulate {
            spins,
            lines,
            bet,
            seed,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let summary = simulate(&config, lines, bet, spins, &mut rng)?;
            println!(
                "spins={} total_bet=${} total_won=${} rtp={:.4} hit_rate={:.4}",
                summary.spins,
                summary.total_bet,
                summary.total_won,
                summary.return_to_player(),
                summary.hit_rate()
            );
            for (i, hits) in summary.line_hits.iter().enumerate() {
                println!("line {}: {hits} hits", i + 1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spin_args() {
        let cli = Cli::try_parse_from([
            "slotline", "spin", "--lines", "3", "--bet", "10", "--server-seed", "s", "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Spin {
                lines,
                bet,
                server_seed,
                json,
                ..
            } => {
                assert_eq!((lines, bet), (3, 10));
                assert_eq!(server_seed.as_deref(), Some("s"));
                assert!(json);
            }
            _ => panic!("expected spin"),
        }
    }

    #[test]
    fn test_provably_fair_source_is_repeatable() {
        let play_round = || {
            let mut session = Session::new(GameConfig::default()).unwrap();
            session.deposit(100).unwrap();
            let mut source = SpinSource::ProvablyFair {
                server_seed: "server".into(),
                client_seed: "client".into(),
            };
            let first = source.spin(&mut session, 3, 1).unwrap();
            let second = source.spin(&mut session, 3, 1).unwrap();
            (first, second)
        };
        let (a1, a2) = play_round();
        let (b1, b2) = play_round();
        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
        // nonce advances between spins
        let config = GameConfig::default();
        let expected = |nonce| {
            slotline_core::spin_with_seeds("server", "client", nonce, &config).unwrap()
        };
        assert_eq!(a1.grid, expected(0));
        assert_eq!(a2.grid, expected(1));
    }

    #[test]
    fn test_spin_total_bet_overflow_is_an_error() {
        let config = GameConfig {
            max_bet: u64::MAX / 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
        let err = spin_total_bet(&config, 3, u64::MAX / 2).unwrap_err();
        assert!(err.to_string().contains("total bet overflows"));
        assert_eq!(spin_total_bet(&config, 3, 10).unwrap(), 30);
        assert!(spin_total_bet(&config, 4, 10).is_err());
        assert!(spin_total_bet(&config, 1, 0).is_err());
    }
}
