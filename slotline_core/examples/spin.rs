use slotline_core::{evaluate, generate, GameConfig, ProvablyFairRng};

fn main() -> Result<(), slotline_core::ConfigurationError> {
    // Example end-to-end spin on the reference game
    let config = GameConfig::default();
    let mut rng = ProvablyFairRng::new("example-server-seed", "example-client-seed", 1);
    let grid = generate(config.rows, config.cols, &config.table, &mut rng)?;
    let payout = evaluate(&grid, config.max_lines, 10, &config.table)?;
    println!(
        "server_seed_hash={} winnings={} lines={:?}\n{}",
        rng.server_seed_hash_hex(),
        payout.winnings,
        payout.winning_lines,
        grid
    );
    Ok(())
}
