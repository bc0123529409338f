use tracing::{error, info, warn};

use crate::boundary::BoundaryCondition;
use crate::checkpoint::Checkpoint;
use crate::config::Config;
use crate::convergence::{ConvergenceMonitor, Residuals};
use crate::dissipation::ArtificialDissipation;
use crate::error::{SolverError, SolverResult};
use crate::field::{Field, ScalarField, PRESSURE, XVEL};
use crate::grid::Grid;
use crate::mms::{ErrorNorms, ManufacturedSolution};
use crate::output::OutputWriter;
use crate::params::FlowParams;
use crate::pressure::rescale_pressure;
use crate::relaxation::{CellUpdate, Scheme};
use crate::timestep::compute_time_step;

/// Where the driver loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initializing,
    Running,
    Converged,
    Exhausted, // Iteration budget used up
    Diverged,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub state: RunState,
    pub iterations: usize, // Last completed iteration
    pub time: f64,
    pub residuals: Option<Residuals>,
    pub error_norms: Option<ErrorNorms>,
}

pub struct Solver {
    pub grid: Grid,
    pub params: FlowParams,
    pub current: Field,
    pub old: Field,
    source: Field,
    dt: ScalarField,
    visc: ArtificialDissipation,
    bc: BoundaryCondition,
    monitor: ConvergenceMonitor,
    scheme: Scheme,
    parallel: bool,
    reference_pressure: f64,
    max_iterations: usize,
    residual_interval: usize,
    solution_interval: usize,
    first_iteration: usize,
    iteration: usize, // Next iteration to run
    time: f64,
    dt_min: f64,
    state: RunState,
    last_residuals: Option<Residuals>,
}

impl Solver {
    /// Set up a run from `config`, resuming from `config.run.restart` when set.
    pub fn new(config: &Config) -> SolverResult<Self> {
        let grid = validated_grid(config)?;
        let restart = match &config.run.restart {
            Some(path) => Some(Checkpoint::read(path, &grid)?),
            None => None,
        };
        Self::with_initial_state(config, grid, restart)
    }

    pub fn from_checkpoint(config: &Config, checkpoint: Checkpoint) -> SolverResult<Self> {
        let grid = validated_grid(config)?;
        if checkpoint.field.dim() != (grid.imax, grid.jmax) {
            let (imax, jmax) = checkpoint.field.dim();
            return Err(SolverError::GridMismatch {
                expected: grid.imax * grid.jmax,
                found: imax * jmax,
            });
        }
        Self::with_initial_state(config, grid, Some(checkpoint))
    }

    fn with_initial_state(config: &Config, grid: Grid, restart: Option<Checkpoint>) -> SolverResult<Self> {
        let params = FlowParams::new(config, grid.width());
        let (imax, jmax) = (grid.imax, grid.jmax);

        let bc = if config.run.manufactured_solution {
            BoundaryCondition::Manufactured(ManufacturedSolution::new(grid.width(), &params))
        } else {
            BoundaryCondition::Wall {
                lid_velocity: params.lid_velocity,
            }
        };

        let reference_pressure = match bc.exact_solution() {
            Some(mms) => {
                let (ic, jc) = grid.center();
                mms.exact(grid.x_coord(ic), grid.y_coord(jc), PRESSURE)
            }
            None => params.reference_pressure,
        };

        let tolerance = config.numerics.tolerance;
        let fresh = restart.is_none();
        let (current, first_iteration, time, monitor) = match restart {
            Some(checkpoint) => {
                info!("Restarting at iteration {}", checkpoint.iteration + 1);
                (
                    checkpoint.field,
                    checkpoint.iteration + 1,
                    checkpoint.time,
                    ConvergenceMonitor::with_initial(checkpoint.initial_residuals, tolerance),
                )
            }
            None => {
                let mut field = Field::new(imax, jmax);
                field.shift_pressure(params.reference_pressure);
                for i in 0..imax {
                    field[(i, jmax - 1, XVEL)] = params.lid_velocity;
                }
                (field, 1, 0.0, ConvergenceMonitor::new(tolerance))
            }
        };

        let mut solver = Self {
            old: Field::new(imax, jmax),
            source: Field::new(imax, jmax),
            dt: ScalarField::new(imax, jmax),
            visc: ArtificialDissipation::new(imax, jmax),
            scheme: config.numerics.scheme,
            parallel: config.numerics.parallel,
            max_iterations: config.numerics.max_iterations,
            residual_interval: config.output.residual_interval,
            solution_interval: config.output.solution_interval,
            iteration: first_iteration,
            dt_min: 0.0,
            state: RunState::Initializing,
            last_residuals: None,
            grid,
            params,
            current,
            bc,
            monitor,
            reference_pressure,
            first_iteration,
            time,
        };
        solver.initialize(fresh);
        Ok(solver)
    }

    fn initialize(&mut self, fresh: bool) {
        // A restart field already satisfies the boundary conditions and is
        // kept bit for bit
        if fresh {
            self.bc.apply(&mut self.current, &self.grid);
        }
        // Forcing is zero everywhere unless a manufactured solution is set
        if let Some(mms) = self.bc.exact_solution() {
            mms.fill_sources(&self.grid, &mut self.source);
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Last completed iteration.
    pub fn completed_iterations(&self) -> usize {
        self.iteration - 1
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn dt_min(&self) -> f64 {
        self.dt_min
    }

    pub fn reference_pressure(&self) -> f64 {
        self.reference_pressure
    }

    pub fn exact_solution(&self) -> Option<&ManufacturedSolution> {
        self.bc.exact_solution()
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, RunState::Initializing | RunState::Running)
    }

    /// Snapshot of the current state for a restart file.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            iteration: self.completed_iterations(),
            time: self.time,
            initial_residuals: self.monitor.initial(),
            field: self.current.clone(),
        }
    }

    /// One pseudo-time iteration. Fails once the residual stops being finite.
    pub fn step(&mut self) -> SolverResult<Residuals> {
        // 1. Local time step
        self.dt_min = compute_time_step(&self.current, &self.grid, &self.params, &mut self.dt);

        // 2. Relaxation sweep(s) and boundary conditions
        let update = CellUpdate {
            source: &self.source,
            dt: &self.dt,
            grid: &self.grid,
            params: &self.params,
        };
        self.scheme.iterate(
            &mut self.current,
            &mut self.old,
            &mut self.visc,
            &update,
            &self.bc,
            self.parallel,
        );

        // 3. Pin the center pressure
        rescale_pressure(&mut self.current, &self.grid, self.reference_pressure);

        // 4. Advance
        self.time += self.dt_min;
        let iteration = self.iteration;
        self.iteration += 1;

        // 5. Iterative residuals
        let residuals = self
            .monitor
            .measure(&self.current, &self.old, &self.dt, &self.grid);
        if !residuals.conv.is_finite() {
            self.state = RunState::Diverged;
            return Err(SolverError::Diverged { iteration });
        }
        self.last_residuals = Some(residuals);
        Ok(residuals)
    }

    /// Iterate until converged or out of budget, then write the final output.
    pub fn run(&mut self, out: &mut OutputWriter) -> SolverResult<RunSummary> {
        info!(
            "Starting {:?} on {}x{} grid at iteration {}",
            self.scheme, self.grid.imax, self.grid.jmax, self.first_iteration
        );

        // Initial condition goes first in the field file
        out.write_solution(&self.checkpoint(), &self.grid, self.exact_solution())?;
        self.state = RunState::Running;

        while !self.is_finished() {
            let n = self.iteration;
            if n > self.max_iterations {
                self.state = RunState::Exhausted;
                break;
            }

            let residuals = match self.step() {
                Ok(residuals) => residuals,
                Err(e) => {
                    error!("{}", e);
                    out.flush()?;
                    return Err(e);
                }
            };

            let converged = self.monitor.is_converged(&residuals);
            if converged || n % self.residual_interval == 0 || n == self.first_iteration {
                out.record_residuals(n, self.time, self.dt_min, &residuals)?;
            }

            if converged {
                self.state = RunState::Converged;
            } else if n % self.solution_interval == 0 {
                out.write_solution(&self.checkpoint(), &self.grid, self.exact_solution())?;
            }
        }

        self.finish(out)
    }

    fn finish(&mut self, out: &mut OutputWriter) -> SolverResult<RunSummary> {
        match self.state {
            RunState::Converged => info!(
                "Solver stopped in {} iterations because the convergence criterion was met",
                self.completed_iterations()
            ),
            _ => warn!(
                "Solver stopped in {} iterations because the maximum number of iterations was exceeded",
                self.completed_iterations()
            ),
        }

        let error_norms = self
            .exact_solution()
            .map(|mms| mms.error_norms(&self.current, &self.grid));
        if let Some(norms) = &error_norms {
            out.write_error_norms(norms)?;
        }

        out.write_solution(&self.checkpoint(), &self.grid, self.exact_solution())?;
        out.flush()?;

        Ok(RunSummary {
            state: self.state,
            iterations: self.completed_iterations(),
            time: self.time,
            residuals: self.last_residuals,
            error_norms,
        })
    }
}

/// The grid for a config that passed validation; nothing is built from an
/// unchecked config.
fn validated_grid(config: &Config) -> SolverResult<Grid> {
    config
        .validate()
        .map_err(|e| SolverError::Config(e.to_string()))?;
    Ok(Grid::from_config(&config.grid))
}
