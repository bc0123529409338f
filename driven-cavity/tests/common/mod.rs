#![allow(dead_code)]

use std::fs;
use std::path::Path;

use driven_cavity::relaxation::Scheme;
use driven_cavity::{Config, Solver};

/// Coarse cavity that converges in a few thousand iterations.
pub fn coarse_config(n: usize, scheme: Scheme, output: &Path) -> Config {
    let mut config = Config::default();
    config.grid.imax = n;
    config.grid.jmax = n;
    config.flow.reynolds = 10.0;
    config.numerics.scheme = scheme;
    config.numerics.tolerance = 1e-6;
    config.numerics.max_iterations = 20_000;
    config.output.directory = output.to_path_buf();
    config.output.solution_interval = 1000;
    config
}

/// `(iteration, [res1, res2, res3])` records from a history file.
pub fn read_history(path: &Path) -> Vec<(usize, [f64; 3])> {
    let text = fs::read_to_string(path).unwrap();
    text.lines()
        .skip(2)
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            let n = words[0].parse().unwrap();
            let r = |k: usize| words[2 + k].parse::<f64>().unwrap();
            (n, [r(0), r(1), r(2)])
        })
        .collect()
}

/// Step `solver` until the convergence scalar drops below `tolerance`,
/// returning the scalar of every iteration.
pub fn residual_trace(solver: &mut Solver, tolerance: f64, max_iterations: usize) -> Vec<f64> {
    let mut trace = Vec::new();
    for _ in 0..max_iterations {
        let conv = solver.step().unwrap().conv;
        trace.push(conv);
        if conv < tolerance {
            break;
        }
    }
    trace
}

/// Least-squares slope of ln(conv) against iteration.
pub fn log_slope(trace: &[f64]) -> f64 {
    let n = trace.len() as f64;
    let xs = (0..trace.len()).map(|k| k as f64);
    let ys: Vec<f64> = trace.iter().map(|r| r.ln()).collect();
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;
    let (num, den) = xs.zip(&ys).fold((0.0, 0.0), |(num, den), (x, y)| {
        (num + (x - x_mean) * (y - y_mean), den + (x - x_mean).powi(2))
    });
    num / den
}

/// Mean of log10(conv) over `blocks` equal spans of the run.
pub fn block_means(trace: &[f64], blocks: usize) -> Vec<f64> {
    let size = trace.len() / blocks;
    trace
        .chunks(size)
        .take(blocks)
        .map(|block| block.iter().map(|r| r.log10()).sum::<f64>() / block.len() as f64)
        .collect()
}

/// The residual falls on average: the log-linear trend is downward and each
/// quarter of the run sits below the one before.
///
/// Short-range monotonicity is not required. The convergence scalar cycles
/// with a period of a few hundred iterations, so neighbouring 100-iteration
/// blocks can rise while the trend falls by orders of magnitude.
pub fn assert_residual_trend(trace: &[f64]) {
    assert!(trace.len() >= 8, "too few iterations: {}", trace.len());
    assert!(trace.iter().all(|r| r.is_finite()));
    assert!(log_slope(trace) < 0.0, "slope = {}", log_slope(trace));
    let quarters = block_means(trace, 4);
    assert!(
        quarters.windows(2).all(|w| w[1] < w[0]),
        "quarter means of log10(conv): {:?}",
        quarters
    );
}
