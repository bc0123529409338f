//! Fourth-order artificial dissipation on the pressure field.
//!
//! Central differencing of the continuity equation lets odd and even nodes
//! decouple. Each interior node gets
//!
//! ```text
//! visc_x = -|λx| · Cx · Δx³ · ∂⁴p/∂x⁴ / β²
//! visc_y = -|λy| · Cy · Δy³ · ∂⁴p/∂y⁴ / β²
//! ```
//!
//! The five-point fourth difference needs two neighbours on each side. On the
//! first and last interior line that is impossible, so the stencil is shifted
//! one node toward the interior there. Picking one of three stencils per axis
//! gives nine cases: interior, four edges and four corners.

use crate::field::{Field, ScalarField};
use crate::grid::Grid;
use crate::params::FlowParams;

/// Placement of the five-point stencil along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stencil {
    /// First interior line: nodes `n-1 ..= n+3`.
    Low,
    /// Two neighbours on each side: nodes `n-2 ..= n+2`.
    Central,
    /// Last interior line: nodes `n-3 ..= n+1`.
    High,
}

impl Stencil {
    /// Stencil for interior index `n` on an axis with `len` nodes.
    pub fn at(n: usize, len: usize) -> Self {
        if n == 1 {
            Stencil::Low
        } else if n == len - 2 {
            Stencil::High
        } else {
            Stencil::Central
        }
    }

    /// Index of the node carrying the first (+1) weight.
    fn start(self, n: usize) -> usize {
        match self {
            Stencil::Low => n - 1,
            Stencil::Central => n - 2,
            Stencil::High => n - 3,
        }
    }
}

/// Undivided fourth difference `1, -4, 6, -4, 1` of `sample` around node `n`.
pub fn fourth_difference(stencil: Stencil, n: usize, sample: impl Fn(usize) -> f64) -> f64 {
    let start = stencil.start(n);
    let s = |m: usize| sample(start + m);
    // Symmetric grouping keeps a uniform field at exactly zero
    (s(0) + s(4)) - 4.0 * (s(1) + s(3)) + 6.0 * s(2)
}

/// Dissipation terms for both directions, reused every iteration.
#[derive(Debug, Clone)]
pub struct ArtificialDissipation {
    pub viscx: ScalarField,
    pub viscy: ScalarField,
}

impl ArtificialDissipation {
    pub fn new(imax: usize, jmax: usize) -> Self {
        Self {
            viscx: ScalarField::new(imax, jmax),
            viscy: ScalarField::new(imax, jmax),
        }
    }

    /// Recompute both terms from `field`. Boundary nodes stay zero.
    ///
    /// β² and the wave speeds come from the velocity of the node itself, for
    /// every stencil case.
    pub fn compute(&mut self, field: &Field, grid: &Grid, params: &FlowParams) {
        let (dx, dy) = (grid.dx, grid.dy);
        let (imax, jmax) = (grid.imax, grid.jmax);
        // Δ³ from the scaling times 1/Δ⁴ from the difference quotient
        let coeff_x = params.cx * dx.powi(3) / dx.powi(4);
        let coeff_y = params.cy * dy.powi(3) / dy.powi(4);

        for i in 1..imax - 1 {
            let sx = Stencil::at(i, imax);
            for j in 1..jmax - 1 {
                let sy = Stencil::at(j, jmax);

                let d4p_x = fourth_difference(sx, i, |m| field.p(m, j));
                let d4p_y = fourth_difference(sy, j, |m| field.p(i, m));

                let (u, v) = (field.u(i, j), field.v(i, j));
                let beta2 = params.beta2(u, v);
                let (lambda_x, lambda_y) = params.wave_speeds(u, v, beta2);

                self.viscx[(i, j)] = -lambda_x.abs() * coeff_x * d4p_x / beta2;
                self.viscy[(i, j)] = -lambda_y.abs() * coeff_y * d4p_y / beta2;
            }
        }
    }
}
