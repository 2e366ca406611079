use grid_hmm::grid::{Grid, Point};
use grid_hmm::metrics::score_path;
use grid_hmm::rng::{standard_normal, Lcg};
use grid_hmm::{simulate, MapMatcher, SimConfig, Trajectory};

fn noisy(points: &[Point], sigma: f64, seed: u32) -> Vec<Point> {
    let mut rng = Lcg::new(seed);
    points
        .iter()
        .map(|p| {
            let x = p.x + standard_normal(&mut rng) * sigma;
            let y = p.y + standard_normal(&mut rng) * sigma;
            Point::new(x, y)
        })
        .collect()
}

#[test]
fn straight_corridor_is_recovered_exactly() {
    let grid = Grid::new(5).unwrap();
    let truth: Vec<usize> = (0..4).map(|i| grid.id(i, 0)).collect();
    let centers: Vec<Point> = truth.iter().map(|&c| grid.center(c)).collect();
    let obs = noisy(&centers, 0.01, 42);

    let matcher = MapMatcher::new(5, 0.01).unwrap();
    assert_eq!(truth, vec![0, 1, 2, 3]);
    assert_eq!(matcher.decode_position_only(&obs).cells, truth);
    assert_eq!(matcher.decode_position_velocity(&obs).cells, truth);
}

#[test]
fn parked_car_is_not_chased_off_the_grid() {
    for seed in [12345u32, 1, 7, 99, 2024] {
        let config = SimConfig::default()
            .with_grid_size(10)
            .with_total_steps(60)
            .with_park_steps(5)
            .with_noise_sigma(0.01)
            .with_seed(seed);
        let traj = simulate(&config).unwrap();
        let last_on_road = traj.true_cells[54];

        let matcher = MapMatcher::new(10, 0.01).unwrap();
        let both = matcher.decode_both(&traj.observations);
        for decoded in [&both.position_only.cells, &both.position_velocity.cells] {
            assert_eq!(decoded.len(), 60);
            assert!(
                decoded[55..].iter().all(|&c| c == last_on_road),
                "seed {seed}: parked tail {:?} != {last_on_road}",
                &decoded[55..]
            );
            // at this noise level the whole run is recovered
            assert_eq!(decoded, &traj.true_cells, "seed {seed}");
        }
    }
}

#[test]
fn velocity_decoder_wins_on_noisy_straight_line() {
    let grid = Grid::new(12).unwrap();
    let truth: Vec<usize> = (0..12).map(|i| grid.id(i, 6)).collect();
    let centers: Vec<Point> = truth.iter().map(|&c| grid.center(c)).collect();
    let sigma = 0.3;
    let matcher = MapMatcher::new(12, sigma).unwrap();

    let mut hits_position = 0usize;
    let mut hits_velocity = 0usize;
    for seed in 1..=30u32 {
        let obs = noisy(&centers, sigma, seed);
        let traj = Trajectory {
            grid_size: 12,
            true_cells: truth.clone(),
            true_positions: centers.clone(),
            observations: obs.clone(),
        };
        let both = matcher.decode_both(&obs);
        let a = score_path(&grid, &both.position_only.cells, &traj).unwrap();
        let b = score_path(&grid, &both.position_velocity.cells, &traj).unwrap();
        hits_position += (a.match_rate * 12.0).round() as usize;
        hits_velocity += (b.match_rate * 12.0).round() as usize;
    }
    assert!(
        hits_velocity >= hits_position,
        "velocity {hits_velocity} < position {hits_position}"
    );
}

#[test]
fn default_demo_run_scores_sensibly() {
    let config = SimConfig::default();
    let traj = simulate(&config).unwrap();
    let matcher = MapMatcher::new(config.grid_size, config.noise_sigma).unwrap();
    let both = matcher.decode_both(&traj.observations);
    for decoded in [&both.position_only, &both.position_velocity] {
        let score = score_path(matcher.grid(), &decoded.cells, &traj).unwrap();
        assert!((0.0..=1.0).contains(&score.match_rate));
        assert!(score.mean_error.is_finite() && score.mean_error >= 0.0);
        assert!(decoded.log_prob.0.is_finite());
    }
}

#[test]
fn equidistant_neighbors_resolve_east_west_south_north() {
    // (0.5, 0.5) is equally far from cells 0, 1, 3 and 4 of a 3x3 grid.
    // Entering cell 4, the North (1) and West (3) predecessors tie exactly.
    let obs = [Point::new(0.5, 0.5), Point::new(1.0, 1.0)];
    let cells = grid_hmm::decode_position_only(&obs, 3, 0.3).unwrap();
    assert_eq!(cells, vec![3, 4]);
}
