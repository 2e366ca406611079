//! Example: simulate a drive on a Manhattan grid and match it back to roads.
//!
//! Run with:
//! `cargo run --example map_matching`

use grid_hmm::metrics::score_path;
use grid_hmm::{simulate, MatcherBuilder, SimConfig};

fn main() -> grid_hmm::Result<()> {
    // Same defaults as the interactive demo: 12x12 grid, 220 steps,
    // σ = 0.18, 10 parked steps at the end.
    let config = SimConfig::default();
    let trajectory = simulate(&config)?;

    let matcher = MatcherBuilder::new(config.grid_size)
        .noise_sigma(config.noise_sigma)
        .build()?;
    let result = matcher.decode_both(&trajectory.observations);

    println!(
        "grid {n}x{n}, {t} steps, sigma {s}, seed {seed}",
        n = config.grid_size,
        t = trajectory.len(),
        s = config.noise_sigma,
        seed = config.seed
    );
    for (label, decoded) in [
        ("position-only", &result.position_only),
        ("position+velocity", &result.position_velocity),
    ] {
        let score = score_path(matcher.grid(), &decoded.cells, &trajectory)?;
        println!(
            "  {label:<18} match {:5.1}%  mean error {:.3}  log p {:.1}",
            score.match_rate * 100.0,
            score.mean_error,
            decoded.log_prob.0
        );
    }

    let tail = trajectory.len().saturating_sub(config.park_steps);
    println!("parked tail (true cell {}):", trajectory.true_cells[tail.saturating_sub(1)]);
    println!("  position-only     {:?}", &result.position_only.cells[tail..]);
    println!("  position+velocity {:?}", &result.position_velocity.cells[tail..]);
    Ok(())
}
