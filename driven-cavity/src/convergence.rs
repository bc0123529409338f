use crate::field::{Field, ScalarField, NEQ};
use crate::grid::Grid;

/// Per-equation residuals of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residuals {
    pub normalized: [f64; NEQ], // Divided by the initial residuals
    pub conv: f64,              // Largest normalized component
}

/// RMS over interior nodes of `(current - old) / dt` for each equation.
pub fn raw_residuals(current: &Field, old: &Field, dt: &ScalarField, grid: &Grid) -> [f64; NEQ] {
    let mut sums = [0.0; NEQ];
    for i in 1..grid.imax - 1 {
        for j in 1..grid.jmax - 1 {
            let (now, before) = (current.cell(i, j), old.cell(i, j));
            for k in 0..NEQ {
                let rate = (now[k] - before[k]) / dt[(i, j)];
                sums[k] += rate * rate;
            }
        }
    }
    let count = grid.interior_count() as f64;
    sums.map(|s| (s / count).sqrt())
}

/// Normalizes residuals by the ones seen on the first iteration of the run.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    initial: Option<[f64; NEQ]>,
    tolerance: f64,
}

impl ConvergenceMonitor {
    /// Fresh run: the first measurement becomes the reference.
    pub fn new(tolerance: f64) -> Self {
        Self {
            initial: None,
            tolerance,
        }
    }

    /// Restarted run: reference residuals come from the checkpoint.
    pub fn with_initial(initial: [f64; NEQ], tolerance: f64) -> Self {
        Self {
            initial: Some(initial.map(floor)),
            tolerance,
        }
    }

    /// Reference residuals, or ones if nothing was captured yet.
    pub fn initial(&self) -> [f64; NEQ] {
        self.initial.unwrap_or([1.0; NEQ])
    }

    pub fn measure(&mut self, current: &Field, old: &Field, dt: &ScalarField, grid: &Grid) -> Residuals {
        let raw = raw_residuals(current, old, dt, grid);
        let initial = *self.initial.get_or_insert_with(|| raw.map(floor));

        let mut normalized = [0.0; NEQ];
        for k in 0..NEQ {
            normalized[k] = raw[k] / initial[k];
        }
        // f64::max would drop a NaN, the divergence check needs it kept
        let conv = normalized
            .iter()
            .fold(0.0_f64, |acc, &r| if r.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(r) });

        Residuals { normalized, conv }
    }

    pub fn is_converged(&self, residuals: &Residuals) -> bool {
        residuals.conv < self.tolerance
    }
}

// Zero or non-finite reference residuals would blow up the division
fn floor(value: f64) -> f64 {
    if value > 0.0 && value.is_finite() {
        value
    } else {
        1.0
    }
}
