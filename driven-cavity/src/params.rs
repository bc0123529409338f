use crate::config::Config;

/// Flow and numerical constants derived once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowParams {
    pub rho: f64,                // Density (kg/m³)
    pub rhoinv: f64,             // 1 / rho
    pub mu: f64,                 // Dynamic viscosity (N·s/m²)
    pub nu: f64,                 // Kinematic viscosity mu / rho (m²/s)
    pub lid_velocity: f64,       // Lid velocity (m/s)
    pub vel2ref: f64,            // Reference velocity squared (m²/s²)
    pub reference_pressure: f64, // Pressure anchored at the cavity center
    pub rkappa: f64,             // Preconditioning constant
    pub cfl: f64,
    pub cx: f64, // 4th-order dissipation coefficients
    pub cy: f64,
}

impl FlowParams {
    /// `length` is the characteristic length (cavity width).
    pub fn new(config: &Config, length: f64) -> Self {
        let flow = &config.flow;
        let numerics = &config.numerics;
        let mu = flow.rho * flow.lid_velocity * length / flow.reynolds;
        Self {
            rho: flow.rho,
            rhoinv: 1.0 / flow.rho,
            mu,
            nu: mu / flow.rho,
            lid_velocity: flow.lid_velocity,
            vel2ref: flow.lid_velocity * flow.lid_velocity,
            reference_pressure: flow.reference_pressure,
            rkappa: numerics.rkappa,
            cfl: numerics.cfl,
            cx: numerics.cx,
            cy: numerics.cy,
        }
    }

    /// Artificial-compressibility parameter β², floored at rκ·V_ref².
    pub fn beta2(&self, u: f64, v: f64) -> f64 {
        (u * u + v * v).max(self.rkappa * self.vel2ref)
    }

    /// Largest eigenvalue magnitudes (λx, λy) of the preconditioned system.
    pub fn wave_speeds(&self, u: f64, v: f64, beta2: f64) -> (f64, f64) {
        let lambda_x = 0.5 * (u.abs() + (u * u + 4.0 * beta2).sqrt());
        let lambda_y = 0.5 * (v.abs() + (v * v + 4.0 * beta2).sqrt());
        (lambda_x, lambda_y)
    }
}
