use crate::config::GridConfig;

/// Structured cavity grid. Nodes sit on the walls, so `(0, j)` and
/// `(imax - 1, j)` are boundary points.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub imax: usize, // Number of points in x direction
    pub jmax: usize, // Number of points in y direction
    pub xmin: f64,   // Left wall location (m)
    pub ymin: f64,   // Bottom wall location (m)
    pub dx: f64,     // Grid spacing in x (m)
    pub dy: f64,     // Grid spacing in y (m)
}

impl Grid {
    pub fn new(imax: usize, jmax: usize, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        let dx = (xmax - xmin) / (imax - 1) as f64;
        let dy = (ymax - ymin) / (jmax - 1) as f64;
        Grid {
            imax,
            jmax,
            xmin,
            ymin,
            dx,
            dy,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(
            config.imax,
            config.jmax,
            config.xmin,
            config.xmax,
            config.ymin,
            config.ymax,
        )
    }

    pub fn x_coord(&self, i: usize) -> f64 {
        // Convert grid index i to physical x coordinate
        self.xmin + self.dx * (i as f64)
    }

    pub fn y_coord(&self, j: usize) -> f64 {
        // Convert grid index j to physical y coordinate
        self.ymin + self.dy * (j as f64)
    }

    pub fn width(&self) -> f64 {
        // Total width of the cavity; also the characteristic length
        (self.imax - 1) as f64 * self.dx
    }

    /// Index of the cavity center, used as the pressure reference point.
    pub fn center(&self) -> (usize, usize) {
        ((self.imax - 1) / 2, (self.jmax - 1) / 2)
    }

    pub fn interior_count(&self) -> usize {
        (self.imax - 2) * (self.jmax - 2)
    }
}
