use crate::field::{Field, ScalarField};
use crate::grid::Grid;
use crate::params::FlowParams;

/// Local pseudo-time step for every interior node.
///
/// Each node takes `cfl * min(dt_conv, dt_visc)`; the smallest interior value
/// is returned and copied onto the boundary nodes, which have no stencil of
/// their own.
pub fn compute_time_step(field: &Field, grid: &Grid, params: &FlowParams, dt: &mut ScalarField) -> f64 {
    let (dx, dy) = (grid.dx, grid.dy);
    let (imax, jmax) = (grid.imax, grid.jmax);

    // Viscous limit is uniform over the grid
    let dt_visc = (dx * dy) / (4.0 * params.nu);
    let min_spacing = dx.min(dy);

    let mut dtmin = f64::INFINITY;
    for i in 1..imax - 1 {
        for j in 1..jmax - 1 {
            let (u, v) = (field.u(i, j), field.v(i, j));
            let beta2 = params.beta2(u, v);
            let (lambda_x, lambda_y) = params.wave_speeds(u, v, beta2);
            let dt_conv = min_spacing / lambda_x.max(lambda_y);

            let local = params.cfl * dt_conv.min(dt_visc);
            dt[(i, j)] = local;
            dtmin = dtmin.min(local);
        }
    }

    for i in 0..imax {
        dt[(i, 0)] = dtmin;
        dt[(i, jmax - 1)] = dtmin;
    }
    for j in 0..jmax {
        dt[(0, j)] = dtmin;
        dt[(imax - 1, j)] = dtmin;
    }

    dtmin
}
