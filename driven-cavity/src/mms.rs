//! Manufactured solution used to verify the discretization.
//!
//! Each variable is `φ0 + φx·f(ax·π·x/L) + φy·f(ay·π·y/L) + φxy·f(axy·π·x·y/L²)`
//! where every `f` is either sine or cosine. Source terms are the residuals
//! of the steady equations evaluated analytically on that field.

use std::f64::consts::PI;

use crate::field::{Field, NEQ, PRESSURE, XVEL, YVEL};
use crate::grid::Grid;
use crate::params::FlowParams;

/// Sine or cosine for one term of the manufactured field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    fn value(self, arg: f64) -> f64 {
        match self {
            Wave::Sin => arg.sin(),
            Wave::Cos => arg.cos(),
        }
    }

    /// d/d(arg) of the wave.
    fn slope(self, arg: f64) -> f64 {
        match self {
            Wave::Sin => arg.cos(),
            Wave::Cos => -arg.sin(),
        }
    }
}

/// Amplitudes, frequencies and wave shapes for one variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MmsTerms {
    pub phi0: f64,
    pub phix: f64,
    pub phiy: f64,
    pub phixy: f64,
    pub apx: f64,
    pub apy: f64,
    pub apxy: f64,
    pub wave_x: Wave,
    pub wave_y: Wave,
    pub wave_xy: Wave,
}

/// Value and derivatives of one variable at a point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub ddx: f64,
    pub ddy: f64,
    pub d2dx2: f64,
    pub d2dy2: f64,
}

impl MmsTerms {
    fn sample(&self, x: f64, y: f64, length: f64) -> Sample {
        let kx = self.apx * PI / length;
        let ky = self.apy * PI / length;
        let kxy = self.apxy * PI / (length * length);

        let (argx, argy, argxy) = (kx * x, ky * y, kxy * x * y);
        let (fx, fy, fxy) = (
            self.wave_x.value(argx),
            self.wave_y.value(argy),
            self.wave_xy.value(argxy),
        );
        let (sx, sy, sxy) = (
            self.wave_x.slope(argx),
            self.wave_y.slope(argy),
            self.wave_xy.slope(argxy),
        );

        Sample {
            value: self.phi0 + self.phix * fx + self.phiy * fy + self.phixy * fxy,
            ddx: self.phix * kx * sx + self.phixy * kxy * y * sxy,
            ddy: self.phiy * ky * sy + self.phixy * kxy * x * sxy,
            // Second derivative of sin/cos is minus the function
            d2dx2: -self.phix * kx * kx * fx - self.phixy * (kxy * y).powi(2) * fxy,
            d2dy2: -self.phiy * ky * ky * fy - self.phixy * (kxy * x).powi(2) * fxy,
        }
    }
}

/// Closed-form exact solution and matching source terms.
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturedSolution {
    pub terms: [MmsTerms; NEQ],
    pub length: f64, // Characteristic length L (cavity width)
    pub rho: f64,
    pub mu: f64,
}

impl ManufacturedSolution {
    /// Standard verification field on a cavity of width `length`.
    pub fn new(length: f64, params: &FlowParams) -> Self {
        use Wave::{Cos, Sin};
        let terms = [
            // Pressure
            MmsTerms {
                phi0: 0.25,
                phix: 0.5,
                phiy: 0.4,
                phixy: 1.0 / 3.0,
                apx: 0.5,
                apy: 0.2,
                apxy: 2.0 / 7.0,
                wave_x: Cos,
                wave_y: Sin,
                wave_xy: Sin,
            },
            // x-velocity
            MmsTerms {
                phi0: 0.3,
                phix: 0.15,
                phiy: 0.2,
                phixy: 0.25,
                apx: 1.0 / 3.0,
                apy: 0.25,
                apxy: 0.4,
                wave_x: Sin,
                wave_y: Cos,
                wave_xy: Sin,
            },
            // y-velocity
            MmsTerms {
                phi0: 0.2,
                phix: 1.0 / 6.0,
                phiy: 0.25,
                phixy: 0.1,
                apx: 7.0 / 17.0,
                apy: 1.0 / 6.0,
                apxy: 1.0 / 3.0,
                wave_x: Cos,
                wave_y: Cos,
                wave_xy: Cos,
            },
        ];
        Self {
            terms,
            length,
            rho: params.rho,
            mu: params.mu,
        }
    }

    /// Exact value of variable `k` at `(x, y)`.
    pub fn exact(&self, x: f64, y: f64, k: usize) -> f64 {
        self.terms[k].sample(x, y, self.length).value
    }

    pub fn exact_cell(&self, x: f64, y: f64) -> [f64; NEQ] {
        [
            self.exact(x, y, PRESSURE),
            self.exact(x, y, XVEL),
            self.exact(x, y, YVEL),
        ]
    }

    fn samples(&self, x: f64, y: f64) -> (Sample, Sample, Sample) {
        (
            self.terms[PRESSURE].sample(x, y, self.length),
            self.terms[XVEL].sample(x, y, self.length),
            self.terms[YVEL].sample(x, y, self.length),
        )
    }

    pub fn source_mass(&self, x: f64, y: f64) -> f64 {
        let (_, u, v) = self.samples(x, y);
        self.rho * u.ddx + self.rho * v.ddy
    }

    pub fn source_xmtm(&self, x: f64, y: f64) -> f64 {
        let (p, u, v) = self.samples(x, y);
        self.rho * u.value * u.ddx + self.rho * v.value * u.ddy + p.ddx
            - self.mu * (u.d2dx2 + u.d2dy2)
    }

    pub fn source_ymtm(&self, x: f64, y: f64) -> f64 {
        let (p, u, v) = self.samples(x, y);
        self.rho * u.value * v.ddx + self.rho * v.value * v.ddy + p.ddy
            - self.mu * (v.d2dx2 + v.d2dy2)
    }

    /// Fill the interior of `source` with the forcing terms. Boundary nodes
    /// are left at zero.
    pub fn fill_sources(&self, grid: &Grid, source: &mut Field) {
        for i in 1..grid.imax - 1 {
            for j in 1..grid.jmax - 1 {
                let (x, y) = (grid.x_coord(i), grid.y_coord(j));
                source.set_cell(
                    i,
                    j,
                    [
                        self.source_mass(x, y),
                        self.source_xmtm(x, y),
                        self.source_ymtm(x, y),
                    ],
                );
            }
        }
    }

    /// Discretization error norms of `field` over every grid node.
    pub fn error_norms(&self, field: &Field, grid: &Grid) -> ErrorNorms {
        let mut l1 = [0.0; NEQ];
        let mut l2 = [0.0; NEQ];
        let mut linf = [0.0_f64; NEQ];
        for i in 0..grid.imax {
            for j in 0..grid.jmax {
                let exact = self.exact_cell(grid.x_coord(i), grid.y_coord(j));
                let cell = field.cell(i, j);
                for k in 0..NEQ {
                    let de = (cell[k] - exact[k]).abs();
                    l1[k] += de;
                    l2[k] += de * de;
                    linf[k] = linf[k].max(de);
                }
            }
        }
        let n = (grid.imax * grid.jmax) as f64;
        for k in 0..NEQ {
            l1[k] /= n;
            l2[k] = (l2[k] / n).sqrt();
        }
        ErrorNorms { l1, l2, linf }
    }
}

/// L1, L2 and L∞ norms of the discretization error per equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorNorms {
    pub l1: [f64; NEQ],
    pub l2: [f64; NEQ],
    pub linf: [f64; NEQ],
}
