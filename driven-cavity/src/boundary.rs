use crate::field::{Field, PRESSURE, XVEL, YVEL};
use crate::grid::Grid;
use crate::mms::ManufacturedSolution;

/// Boundary treatment, chosen once per run.
///
/// Both variants write the left/right walls for `j in 1..jmax-1` first and
/// then the bottom/top walls for every `i`, so the four corners take the
/// bottom/top values (top corners move with the lid).
#[derive(Debug, Clone)]
pub enum BoundaryCondition {
    /// No-slip walls and a moving lid on the top row.
    Wall { lid_velocity: f64 },
    /// Exact manufactured velocities on the border.
    Manufactured(ManufacturedSolution),
}

impl BoundaryCondition {
    pub fn apply(&self, field: &mut Field, grid: &Grid) {
        match self {
            BoundaryCondition::Wall { lid_velocity } => apply_walls(field, grid, *lid_velocity),
            BoundaryCondition::Manufactured(mms) => apply_manufactured(field, grid, mms),
        }
    }

    /// Exact solution for the manufactured variant.
    pub fn exact_solution(&self) -> Option<&ManufacturedSolution> {
        match self {
            BoundaryCondition::Wall { .. } => None,
            BoundaryCondition::Manufactured(mms) => Some(mms),
        }
    }
}

// Second-order extrapolation p0 = 2 p1 - p2 along the wall normal
fn extrapolate(field: &Field, near: (usize, usize), far: (usize, usize)) -> f64 {
    2.0 * field.p(near.0, near.1) - field.p(far.0, far.1)
}

fn apply_walls(field: &mut Field, grid: &Grid, lid_velocity: f64) {
    let (imax, jmax) = (grid.imax, grid.jmax);

    for j in 1..jmax - 1 {
        // Left wall
        field[(0, j, PRESSURE)] = extrapolate(field, (1, j), (2, j));
        field[(0, j, XVEL)] = 0.0;
        field[(0, j, YVEL)] = 0.0;
        // Right wall
        field[(imax - 1, j, PRESSURE)] = extrapolate(field, (imax - 2, j), (imax - 3, j));
        field[(imax - 1, j, XVEL)] = 0.0;
        field[(imax - 1, j, YVEL)] = 0.0;
    }

    for i in 0..imax {
        // Bottom wall
        field[(i, 0, PRESSURE)] = extrapolate(field, (i, 1), (i, 2));
        field[(i, 0, XVEL)] = 0.0;
        field[(i, 0, YVEL)] = 0.0;
        // Lid
        field[(i, jmax - 1, PRESSURE)] = extrapolate(field, (i, jmax - 2), (i, jmax - 3));
        field[(i, jmax - 1, XVEL)] = lid_velocity;
        field[(i, jmax - 1, YVEL)] = 0.0;
    }
}

fn apply_manufactured(field: &mut Field, grid: &Grid, mms: &ManufacturedSolution) {
    let (imax, jmax) = (grid.imax, grid.jmax);

    for j in 1..jmax - 1 {
        let y = grid.y_coord(j);
        field.set_cell(0, j, mms.exact_cell(grid.x_coord(0), y));
        field[(0, j, PRESSURE)] = extrapolate(field, (1, j), (2, j));

        field.set_cell(imax - 1, j, mms.exact_cell(grid.x_coord(imax - 1), y));
        field[(imax - 1, j, PRESSURE)] = extrapolate(field, (imax - 2, j), (imax - 3, j));
    }

    for i in 0..imax {
        let x = grid.x_coord(i);
        field.set_cell(i, 0, mms.exact_cell(x, grid.y_coord(0)));
        field[(i, 0, PRESSURE)] = extrapolate(field, (i, 1), (i, 2));

        field.set_cell(i, jmax - 1, mms.exact_cell(x, grid.y_coord(jmax - 1)));
        field[(i, jmax - 1, PRESSURE)] = extrapolate(field, (i, jmax - 2), (i, jmax - 3));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::params::FlowParams;
    use approx::assert_relative_eq;

    fn noisy_field(grid: &Grid) -> Field {
        let mut field = Field::new(grid.imax, grid.jmax);
        for i in 0..grid.imax {
            for j in 0..grid.jmax {
                let s = (i * 31 + j * 17) as f64;
                field.set_cell(i, j, [s.sin(), s.cos(), (0.5 * s).sin()]);
            }
        }
        field
    }

    #[test]
    fn walls_are_no_slip_and_lid_moves() {
        let grid = Grid::new(9, 7, 0.0, 1.0, 0.0, 1.0);
        let mut field = noisy_field(&grid);
        let bc = BoundaryCondition::Wall { lid_velocity: 1.5 };
        bc.apply(&mut field, &grid);

        for j in 0..grid.jmax - 1 {
            assert_eq!((field.u(0, j), field.v(0, j)), (0.0, 0.0));
            assert_eq!((field.u(8, j), field.v(8, j)), (0.0, 0.0));
        }
        for i in 0..grid.imax {
            assert_eq!((field.u(i, 0), field.v(i, 0)), (0.0, 0.0));
            assert_eq!((field.u(i, 6), field.v(i, 6)), (1.5, 0.0));
        }
    }

    #[test]
    fn corners_belong_to_bottom_and_top_walls() {
        let grid = Grid::new(7, 7, 0.0, 1.0, 0.0, 1.0);
        let mut field = noisy_field(&grid);
        BoundaryCondition::Wall { lid_velocity: 1.0 }.apply(&mut field, &grid);

        // Top corners carry the lid velocity, bottom corners are at rest
        assert_eq!((field.u(0, 6), field.v(0, 6)), (1.0, 0.0));
        assert_eq!((field.u(6, 6), field.v(6, 6)), (1.0, 0.0));
        assert_eq!((field.u(0, 0), field.v(0, 0)), (0.0, 0.0));
        assert_eq!((field.u(6, 0), field.v(6, 0)), (0.0, 0.0));

        // Corner pressure is extrapolated vertically from the side-wall values
        assert_relative_eq!(field.p(0, 0), 2.0 * field.p(0, 1) - field.p(0, 2));
        assert_relative_eq!(field.p(6, 6), 2.0 * field.p(6, 5) - field.p(6, 4));
    }

    #[test]
    fn wall_pressure_is_linear_extrapolation() {
        let grid = Grid::new(7, 9, 0.0, 1.0, 0.0, 1.0);
        let mut field = noisy_field(&grid);
        BoundaryCondition::Wall { lid_velocity: 1.0 }.apply(&mut field, &grid);
        for j in 1..grid.jmax - 1 {
            assert_relative_eq!(field.p(0, j), 2.0 * field.p(1, j) - field.p(2, j));
            assert_relative_eq!(field.p(6, j), 2.0 * field.p(5, j) - field.p(4, j));
        }
        for i in 0..grid.imax {
            assert_relative_eq!(field.p(i, 0), 2.0 * field.p(i, 1) - field.p(i, 2));
            assert_relative_eq!(field.p(i, 8), 2.0 * field.p(i, 7) - field.p(i, 6));
        }
    }

    #[test]
    fn interior_is_untouched() {
        let grid = Grid::new(7, 7, 0.0, 1.0, 0.0, 1.0);
        let mut field = noisy_field(&grid);
        let before = field.clone();
        BoundaryCondition::Wall { lid_velocity: 1.0 }.apply(&mut field, &grid);
        for i in 1..6 {
            for j in 1..6 {
                assert_eq!(field.cell(i, j), before.cell(i, j));
            }
        }
    }

    #[test]
    fn manufactured_border_takes_exact_velocity() {
        let config = Config::default();
        let grid = Grid::new(9, 9, 0.0, 0.05, 0.0, 0.05);
        let params = FlowParams::new(&config, grid.width());
        let mms = ManufacturedSolution::new(grid.width(), &params);
        let bc = BoundaryCondition::Manufactured(mms.clone());
        let mut field = noisy_field(&grid);
        bc.apply(&mut field, &grid);

        for i in 0..grid.imax {
            for j in [0, grid.jmax - 1] {
                let exact = mms.exact_cell(grid.x_coord(i), grid.y_coord(j));
                assert_eq!(field.u(i, j), exact[XVEL]);
                assert_eq!(field.v(i, j), exact[YVEL]);
                assert_relative_eq!(
                    field.p(i, j),
                    2.0 * field.p(i, if j == 0 { 1 } else { j - 1 })
                        - field.p(i, if j == 0 { 2 } else { j - 2 })
                );
            }
        }
        let exact = mms.exact_cell(grid.x_coord(0), grid.y_coord(4));
        assert_eq!(field.u(0, 4), exact[XVEL]);
        assert!(bc.exact_solution().is_some());
    }
}
