use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryCondition;
use crate::dissipation::ArtificialDissipation;
use crate::field::{Field, ScalarField, NEQ};
use crate::grid::Grid;
use crate::params::FlowParams;

/// Relaxation scheme, fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    PointJacobi,
    SymmetricGaussSeidel,
}

/// Read-only inputs shared by every cell update of one iteration.
pub struct CellUpdate<'a> {
    pub source: &'a Field,
    pub dt: &'a ScalarField,
    pub grid: &'a Grid,
    pub params: &'a FlowParams,
}

impl CellUpdate<'_> {
    /// New `[p, u, v]` at `(i, j)` from the values around it in `field`.
    ///
    /// Everything is read before anything is written, so the caller decides
    /// whether the result lands in another buffer or back in `field`.
    pub fn cell(&self, field: &Field, visc: &ArtificialDissipation, i: usize, j: usize) -> [f64; NEQ] {
        let params = self.params;
        let (dx, dy) = (self.grid.dx, self.grid.dy);
        let (rho, rhoinv, mu) = (params.rho, params.rhoinv, params.mu);

        let [p, u, v] = field.cell(i, j);
        let [pe, ue, ve] = field.cell(i + 1, j);
        let [pw, uw, vw] = field.cell(i - 1, j);
        let [pn, un, vn] = field.cell(i, j + 1);
        let [ps, us, vs] = field.cell(i, j - 1);

        // Second-order central differences
        let dpdx = (pe - pw) / (2.0 * dx);
        let dpdy = (pn - ps) / (2.0 * dy);
        let dudx = (ue - uw) / (2.0 * dx);
        let dudy = (un - us) / (2.0 * dy);
        let dvdx = (ve - vw) / (2.0 * dx);
        let dvdy = (vn - vs) / (2.0 * dy);
        let d2udx2 = (ue - 2.0 * u + uw) / (dx * dx);
        let d2udy2 = (un - 2.0 * u + us) / (dy * dy);
        let d2vdx2 = (ve - 2.0 * v + vw) / (dx * dx);
        let d2vdy2 = (vn - 2.0 * v + vs) / (dy * dy);

        let beta2 = params.beta2(u, v);
        let dt = self.dt[(i, j)];
        let [s_mass, s_xmtm, s_ymtm] = self.source.cell(i, j);

        let p_new = p
            - beta2 * dt * (rho * dudx + rho * dvdy - visc.viscx[(i, j)] - visc.viscy[(i, j)] - s_mass);
        let u_new = u
            - dt * rhoinv * (rho * u * dudx + rho * v * dudy + dpdx - mu * (d2udx2 + d2udy2) - s_xmtm);
        let v_new = v
            - dt * rhoinv * (rho * u * dvdx + rho * v * dvdy + dpdy - mu * (d2vdx2 + d2vdy2) - s_ymtm);

        [p_new, u_new, v_new]
    }
}

/// One Jacobi pass: every interior cell of `current` from `old` only.
pub fn point_jacobi(current: &mut Field, old: &Field, visc: &ArtificialDissipation, update: &CellUpdate) {
    let (imax, jmax) = (update.grid.imax, update.grid.jmax);
    for i in 1..imax - 1 {
        for j in 1..jmax - 1 {
            current.set_cell(i, j, update.cell(old, visc, i, j));
        }
    }
}

/// Jacobi pass with the interior rows split across the rayon pool.
///
/// `old` is frozen while the new values are computed; they are committed to
/// `current` after the parallel map, so the result matches [`point_jacobi`].
pub fn point_jacobi_parallel(
    current: &mut Field,
    old: &Field,
    visc: &ArtificialDissipation,
    update: &CellUpdate,
) {
    let (imax, jmax) = (update.grid.imax, update.grid.jmax);

    let updates: Vec<(usize, usize, [f64; NEQ])> = (1..imax - 1)
        .into_par_iter()
        .flat_map_iter(|i| (1..jmax - 1).map(move |j| (i, j, update.cell(old, visc, i, j))))
        .collect();

    for (i, j, values) in updates {
        current.set_cell(i, j, values);
    }
}

/// In-place sweep with increasing `i` then `j`.
pub fn sgs_forward_sweep(field: &mut Field, visc: &ArtificialDissipation, update: &CellUpdate) {
    let (imax, jmax) = (update.grid.imax, update.grid.jmax);
    for i in 1..imax - 1 {
        for j in 1..jmax - 1 {
            let values = update.cell(field, visc, i, j);
            field.set_cell(i, j, values);
        }
    }
}

/// In-place sweep with decreasing `i` then `j`.
pub fn sgs_backward_sweep(field: &mut Field, visc: &ArtificialDissipation, update: &CellUpdate) {
    let (imax, jmax) = (update.grid.imax, update.grid.jmax);
    for i in (1..imax - 1).rev() {
        for j in (1..jmax - 1).rev() {
            let values = update.cell(field, visc, i, j);
            field.set_cell(i, j, values);
        }
    }
}

impl Scheme {
    /// One pseudo-time iteration.
    ///
    /// On return `old` holds the field the convergence monitor compares
    /// against: the previous iterate for Jacobi, the snapshot taken before
    /// both sweeps for SGS.
    pub fn iterate(
        self,
        current: &mut Field,
        old: &mut Field,
        visc: &mut ArtificialDissipation,
        update: &CellUpdate,
        bc: &BoundaryCondition,
        parallel: bool,
    ) {
        let (grid, params) = (update.grid, update.params);
        match self {
            Scheme::PointJacobi => {
                current.swap(old);
                visc.compute(old, grid, params);
                if parallel {
                    point_jacobi_parallel(current, old, visc, update);
                } else {
                    point_jacobi(current, old, visc, update);
                }
                bc.apply(current, grid);
            }
            Scheme::SymmetricGaussSeidel => {
                old.copy_from(current);

                visc.compute(current, grid, params);
                sgs_forward_sweep(current, visc, update);
                bc.apply(current, grid);

                visc.compute(current, grid, params);
                sgs_backward_sweep(current, visc, update);
                bc.apply(current, grid);
            }
        }
    }
}
