#![cfg(feature = "parallel")]

use grid_hmm::emission::{EmissionTable, GaussianEmission};
use grid_hmm::grid::{Grid, Point};
use grid_hmm::{simulate, MapMatcher, SimConfig, ViterbiEngine};
use proptest::prelude::*;

/// Single-threaded emission table, for comparison with the rayon build.
fn serial_emissions(grid: &Grid, sigma: f64, obs: &[Point]) -> Vec<f64> {
    let model = GaussianEmission::new(sigma).unwrap();
    obs.iter()
        .flat_map(|o| {
            (0..grid.num_cells())
                .map(|c| model.log_likelihood(&grid.center(c), o))
                .collect::<Vec<_>>()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn parallel_tables_equal_serial(n in 1usize..12, seed in any::<u32>(), sigma in 0.05f64..0.4) {
        let cfg = SimConfig::default()
            .with_grid_size(n)
            .with_total_steps(40)
            .with_park_steps(4)
            .with_seed(seed)
            .with_noise_sigma(sigma);
        let traj = simulate(&cfg).unwrap();
        let grid = Grid::new(n).unwrap();
        let table = EmissionTable::build(&grid, &GaussianEmission::new(sigma).unwrap(), &traj.observations);
        let serial = serial_emissions(&grid, sigma, &traj.observations);
        for t in 0..table.steps() {
            prop_assert_eq!(table.row(t), &serial[t * grid.num_cells()..(t + 1) * grid.num_cells()]);
        }
    }

    #[test]
    fn parallel_decode_is_repeatable(n in 2usize..10, seed in any::<u32>()) {
        let cfg = SimConfig::default().with_grid_size(n).with_total_steps(60).with_seed(seed);
        let traj = simulate(&cfg).unwrap();
        let matcher = MapMatcher::new(n, cfg.noise_sigma).unwrap();
        let em = matcher.emissions(&traj.observations);
        let engine = ViterbiEngine::new(matcher.velocity_model());
        let first = engine.run(&em);
        for _ in 0..3 {
            prop_assert_eq!(&engine.run(&em), &first);
        }
    }
}
