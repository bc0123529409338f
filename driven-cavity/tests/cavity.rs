mod common;

use approx::assert_relative_eq;
use driven_cavity::output::{FIELD_FILE, HISTORY_FILE, RESTART_FILE};
use driven_cavity::relaxation::Scheme;
use driven_cavity::{Config, OutputWriter, RunState, Solver};

use common::{assert_residual_trend, coarse_config, read_history, residual_trace};

fn run_to_convergence(scheme: Scheme) {
    let dir = tempfile::tempdir().unwrap();
    let config = coarse_config(17, scheme, dir.path());
    let mut solver = Solver::new(&config).unwrap();
    let mut output = OutputWriter::create(&config.output, false).unwrap();

    let summary = solver.run(&mut output).unwrap();

    assert_eq!(summary.state, RunState::Converged, "{:?}", scheme);
    assert!(summary.iterations < config.numerics.max_iterations);
    assert!(summary.residuals.unwrap().conv < config.numerics.tolerance);
    assert!(solver.current.is_finite());

    // Anchor and lid hold in the final field
    let (ic, jc) = solver.grid.center();
    assert_relative_eq!(solver.current.p(ic, jc), config.flow.reference_pressure, epsilon = 1e-12);
    for i in 0..17 {
        assert_eq!(solver.current.u(i, 16), 1.0);
        assert_eq!(solver.current.u(i, 0), 0.0);
    }

    // The lid drags a clockwise vortex: fluid moves backward below the center
    assert!(solver.current.u(8, 4) < 0.0);

    let history = read_history(&dir.path().join(HISTORY_FILE));
    assert_eq!(history[0].0, 1);
    assert_eq!(history.last().unwrap().0, summary.iterations);
    let peak = history
        .iter()
        .flat_map(|(_, r)| r.iter().copied())
        .fold(0.0_f64, f64::max);
    let last = history.last().unwrap().1;
    assert!(last.iter().all(|&r| r < 1e-3 * peak));

    assert!(dir.path().join(FIELD_FILE).exists());
    assert!(dir.path().join(RESTART_FILE).exists());
}

#[test]
fn point_jacobi_converges_on_coarse_grid() {
    run_to_convergence(Scheme::PointJacobi);
}

#[test]
fn symmetric_gauss_seidel_converges_on_coarse_grid() {
    run_to_convergence(Scheme::SymmetricGaussSeidel);
}

#[test]
fn gauss_seidel_needs_fewer_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let mut counts = Vec::new();
    for scheme in [Scheme::PointJacobi, Scheme::SymmetricGaussSeidel] {
        let config = coarse_config(17, scheme, dir.path());
        let mut solver = Solver::new(&config).unwrap();
        let mut output = OutputWriter::create(&config.output, false).unwrap();
        counts.push(solver.run(&mut output).unwrap().iterations);
    }
    assert!(counts[1] < counts[0], "iterations: {:?}", counts);
}

#[test]
fn residual_falls_and_center_pressure_holds() {
    let dir = tempfile::tempdir().unwrap();
    for scheme in [Scheme::PointJacobi, Scheme::SymmetricGaussSeidel] {
        let config = coarse_config(17, scheme, dir.path());
        let mut solver = Solver::new(&config).unwrap();
        let tolerance = config.numerics.tolerance;
        let trace = residual_trace(&mut solver, tolerance, config.numerics.max_iterations);

        assert!(*trace.last().unwrap() < tolerance, "{:?} did not converge", scheme);
        assert_residual_trend(&trace);

        let (ic, jc) = solver.grid.center();
        assert_relative_eq!(
            solver.current.p(ic, jc),
            config.flow.reference_pressure,
            max_relative = 1e-12
        );
    }
}

#[test]
fn serial_and_parallel_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut fields = Vec::new();
    for parallel in [false, true] {
        let mut config = coarse_config(17, Scheme::PointJacobi, dir.path());
        config.numerics.parallel = parallel;
        config.numerics.max_iterations = 200;
        let mut solver = Solver::new(&config).unwrap();
        let mut output = OutputWriter::create(&config.output, false).unwrap();
        solver.run(&mut output).unwrap();
        fields.push(solver.current.clone());
    }
    assert_eq!(fields[0], fields[1]);
}

/// Re = 100 on the 65x65 benchmark grid. Slow without optimizations:
/// `cargo test --release -- --ignored`
#[test]
#[ignore]
fn benchmark_cavity_re100() {
    let config = Config::default();
    let mut solver = Solver::new(&config).unwrap();
    let tolerance = config.numerics.tolerance;
    let trace = residual_trace(&mut solver, tolerance, config.numerics.max_iterations);

    assert!(*trace.last().unwrap() < tolerance);
    assert!(trace.len() < config.numerics.max_iterations);
    assert_residual_trend(&trace);

    // Pressure stays pinned at the center
    let (ic, jc) = solver.grid.center();
    assert_relative_eq!(
        solver.current.p(ic, jc),
        config.flow.reference_pressure,
        max_relative = 1e-12
    );

    // Primary vortex near the center (Ghia et al. give u = -0.21, v = 0.06)
    let (u, v) = (solver.current.u(ic, jc), solver.current.v(ic, jc));
    assert!(u < -0.1 && u > -0.3, "u at center = {}", u);
    assert!(v > 0.0 && v < 0.15, "v at center = {}", v);
}
