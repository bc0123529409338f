use ndarray::{Array2, Array3};
use std::ops::{Index, IndexMut};

/// Number of equations solved per cell (mass, x-momentum, y-momentum).
pub const NEQ: usize = 3;

/// Component slots in a [`Field`] cell.
pub const PRESSURE: usize = 0;
pub const XVEL: usize = 1;
pub const YVEL: usize = 2;

/// Primitive variables `[p, u, v]` at every grid node.
///
/// Storage is a standard-layout `Array3` of shape `(imax, jmax, NEQ)`, so
/// cell `(i, j, k)` lives at `i * jmax * NEQ + j * NEQ + k`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    data: Array3<f64>,
}

impl Field {
    pub fn new(imax: usize, jmax: usize) -> Self {
        Field {
            data: Array3::zeros((imax, jmax, NEQ)),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        let (imax, jmax, _) = self.data.dim();
        (imax, jmax)
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn p(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j, PRESSURE]]
    }

    pub fn u(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j, XVEL]]
    }

    pub fn v(&self, i: usize, j: usize) -> f64 {
        self.data[[i, j, YVEL]]
    }

    pub fn cell(&self, i: usize, j: usize) -> [f64; NEQ] {
        [self.p(i, j), self.u(i, j), self.v(i, j)]
    }

    pub fn set_cell(&mut self, i: usize, j: usize, values: [f64; NEQ]) {
        for (k, value) in values.into_iter().enumerate() {
            self.data[[i, j, k]] = value;
        }
    }

    /// Deep copy of `other` into `self`. Both fields must share dimensions.
    pub fn copy_from(&mut self, other: &Field) {
        self.data.assign(&other.data);
    }

    /// Exchange the underlying buffers in O(1).
    pub fn swap(&mut self, other: &mut Field) {
        std::mem::swap(&mut self.data, &mut other.data);
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Add `delta` to the pressure of every node.
    pub fn shift_pressure(&mut self, delta: f64) {
        self.data
            .index_axis_mut(ndarray::Axis(2), PRESSURE)
            .mapv_inplace(|p| p + delta);
    }

    /// Copy of one component as a 2-D array (used for plotting).
    pub fn component(&self, k: usize) -> Array2<f64> {
        self.data.index_axis(ndarray::Axis(2), k).to_owned()
    }

    pub fn compute_velocity_magnitude(&self) -> Array2<f64> {
        // |V| = sqrt(u² + v²)
        let (imax, jmax) = self.dim();
        let mut mag = Array2::<f64>::zeros((imax, jmax));
        for i in 0..imax {
            for j in 0..jmax {
                mag[[i, j]] = (self.u(i, j).powi(2) + self.v(i, j).powi(2)).sqrt();
            }
        }
        mag
    }
}

impl Index<(usize, usize, usize)> for Field {
    type Output = f64;

    fn index(&self, (i, j, k): (usize, usize, usize)) -> &f64 {
        &self.data[[i, j, k]]
    }
}

impl IndexMut<(usize, usize, usize)> for Field {
    fn index_mut(&mut self, (i, j, k): (usize, usize, usize)) -> &mut f64 {
        &mut self.data[[i, j, k]]
    }
}

/// One scalar per grid node: artificial dissipation, local time step.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    data: Array2<f64>,
}

impl ScalarField {
    pub fn new(imax: usize, jmax: usize) -> Self {
        ScalarField {
            data: Array2::zeros((imax, jmax)),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn copy_from(&mut self, other: &ScalarField) {
        self.data.assign(&other.data);
    }

    pub fn swap(&mut self, other: &mut ScalarField) {
        std::mem::swap(&mut self.data, &mut other.data);
    }
}

impl Index<(usize, usize)> for ScalarField {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[[i, j]]
    }
}

impl IndexMut<(usize, usize)> for ScalarField {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[[i, j]]
    }
}
