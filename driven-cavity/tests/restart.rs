mod common;

use driven_cavity::checkpoint::Checkpoint;
use driven_cavity::output::RESTART_FILE;
use driven_cavity::relaxation::Scheme;
use driven_cavity::{OutputWriter, RunState, Solver, SolverError};

use common::{coarse_config, read_history};

#[test]
fn restart_reproduces_uninterrupted_run() {
    for scheme in [Scheme::PointJacobi, Scheme::SymmetricGaussSeidel] {
        let full_dir = tempfile::tempdir().unwrap();
        let mut config = coarse_config(17, scheme, full_dir.path());
        config.numerics.max_iterations = 60;
        let mut full = Solver::new(&config).unwrap();
        full.run(&mut OutputWriter::create(&config.output, false).unwrap())
            .unwrap();

        // First leg stops at 40 and leaves a restart file behind
        let first_dir = tempfile::tempdir().unwrap();
        let mut first_config = coarse_config(17, scheme, first_dir.path());
        first_config.numerics.max_iterations = 40;
        let mut first = Solver::new(&first_config).unwrap();
        let summary = first
            .run(&mut OutputWriter::create(&first_config.output, false).unwrap())
            .unwrap();
        assert_eq!(summary.state, RunState::Exhausted);

        let restart_file = first_dir.path().join(RESTART_FILE);
        let checkpoint = Checkpoint::read(&restart_file, &first.grid).unwrap();
        assert_eq!(checkpoint.iteration, 40);
        assert_eq!(checkpoint.field, first.current);

        // Second leg picks up at 41
        let second_dir = tempfile::tempdir().unwrap();
        let mut second_config = coarse_config(17, scheme, second_dir.path());
        second_config.numerics.max_iterations = 60;
        second_config.run.restart = Some(restart_file);
        let mut second = Solver::new(&second_config).unwrap();
        assert_eq!(second.completed_iterations(), 40);
        let summary = second
            .run(&mut OutputWriter::create(&second_config.output, false).unwrap())
            .unwrap();

        assert_eq!(summary.iterations, 60);
        assert_eq!(second.time(), full.time(), "{:?}", scheme);
        assert_eq!(second.current, full.current, "{:?}", scheme);

        let history = read_history(&second_dir.path().join("history.dat"));
        assert_eq!(history[0].0, 41);
    }
}

#[test]
fn restart_from_other_grid_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = coarse_config(9, Scheme::PointJacobi, dir.path());
    config.numerics.max_iterations = 3;
    let mut solver = Solver::new(&config).unwrap();
    solver
        .run(&mut OutputWriter::create(&config.output, false).unwrap())
        .unwrap();

    let mut larger = coarse_config(11, Scheme::PointJacobi, dir.path());
    larger.run.restart = Some(dir.path().join(RESTART_FILE));
    match Solver::new(&larger) {
        Err(SolverError::GridMismatch { expected, found }) => {
            assert_eq!((expected, found), (121, 81));
        }
        Err(e) => panic!("unexpected error {}", e),
        Ok(_) => panic!("restart on a different grid was accepted"),
    }
}

#[test]
fn missing_restart_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = coarse_config(9, Scheme::PointJacobi, dir.path());
    config.run.restart = Some(dir.path().join("restart.in"));
    assert!(matches!(Solver::new(&config), Err(SolverError::Io { .. })));
}
