use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::relaxation::Scheme;

/// Grid configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub imax: usize, // Points in x (odd)
    pub jmax: usize, // Points in y (odd)
    pub xmin: f64,   // Cavity extents (m)
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            imax: 65,
            jmax: 65,
            xmin: 0.0,
            xmax: 0.05,
            ymin: 0.0,
            ymax: 0.05,
        }
    }
}

impl GridConfig {
    fn validate(&self) -> Result<()> {
        for (name, n) in [("imax", self.imax), ("jmax", self.jmax)] {
            if n < 5 {
                return Err(anyhow!("{} must be at least 5, got {}", name, n));
            }
            if n % 2 == 0 {
                return Err(anyhow!("{} must be odd, got {}", name, n));
            }
        }
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|x| x.is_finite());
        if !finite || !(self.xmax > self.xmin) || !(self.ymax > self.ymin) {
            return Err(anyhow!(
                "Cavity extents must be positive (x: {}..{}, y: {}..{})",
                self.xmin,
                self.xmax,
                self.ymin,
                self.ymax
            ));
        }
        Ok(())
    }
}

/// Finite and strictly positive; false for NaN.
fn positive(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

/// Fluid properties and lid forcing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub reynolds: f64,           // Re = rho * U * L / mu
    pub rho: f64,                // Density (kg/m³)
    pub lid_velocity: f64,       // Lid velocity (m/s)
    pub reference_pressure: f64, // Pressure held at the cavity center (N/m²)
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            reynolds: 100.0,
            rho: 1.0,
            lid_velocity: 1.0,
            reference_pressure: 0.801333844662,
        }
    }
}

impl FlowConfig {
    fn validate(&self) -> Result<()> {
        if !positive(self.reynolds) || !positive(self.rho) || !positive(self.lid_velocity) {
            return Err(anyhow!(
                "Flow properties must be positive (Re={}, rho={}, lid_velocity={})",
                self.reynolds,
                self.rho,
                self.lid_velocity
            ));
        }
        if !self.reference_pressure.is_finite() {
            return Err(anyhow!(
                "reference_pressure must be finite, got {}",
                self.reference_pressure
            ));
        }
        Ok(())
    }
}

/// Pseudo-time iteration controls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericsConfig {
    pub scheme: Scheme,
    pub cfl: f64,
    pub cx: f64,     // 4th-order artificial dissipation coefficient in x
    pub cy: f64,     // 4th-order artificial dissipation coefficient in y
    pub rkappa: f64, // Time-derivative preconditioning constant
    pub tolerance: f64,
    pub max_iterations: usize,
    pub parallel: bool, // Point-Jacobi interior pass on the rayon pool
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::PointJacobi,
            cfl: 0.9,
            cx: 0.01,
            cy: 0.01,
            rkappa: 0.1,
            tolerance: 1e-10,
            max_iterations: 500_000,
            parallel: true,
        }
    }
}

impl NumericsConfig {
    fn validate(&self) -> Result<()> {
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(anyhow!("cfl must be in (0, 1], got {}", self.cfl));
        }
        let non_negative = |c: f64| c >= 0.0 && c.is_finite();
        if !non_negative(self.cx) || !non_negative(self.cy) {
            return Err(anyhow!(
                "Dissipation coefficients must be non-negative (cx={}, cy={})",
                self.cx,
                self.cy
            ));
        }
        if !positive(self.rkappa) {
            return Err(anyhow!("rkappa must be positive, got {}", self.rkappa));
        }
        if !positive(self.tolerance) {
            return Err(anyhow!("tolerance must be positive, got {}", self.tolerance));
        }
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be positive"));
        }
        Ok(())
    }
}

/// Run mode: verification against the manufactured solution, restart
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub manufactured_solution: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart: Option<PathBuf>, // Restart file to resume from
}

/// Output files and snapshot rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub residual_interval: usize, // Iterations between residual records
    pub solution_interval: usize, // Iterations between field/restart writes
    pub snapshots: bool,
    pub snapshot_field: String,
    pub image_width: u32,
    pub image_height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            residual_interval: 10,
            solution_interval: 5000,
            snapshots: false,
            snapshot_field: default_snapshot_field(),
            image_width: 650,
            image_height: 650,
        }
    }
}

fn default_snapshot_field() -> String {
    "pressure".to_string()
}

impl OutputConfig {
    fn validate(&self) -> Result<()> {
        if self.residual_interval == 0 || self.solution_interval == 0 {
            return Err(anyhow!(
                "Output intervals must be positive (residual={}, solution={})",
                self.residual_interval,
                self.solution_interval
            ));
        }
        let valid_fields = ["pressure", "u", "v", "vmag"];
        if !valid_fields.contains(&self.snapshot_field.as_str()) {
            return Err(anyhow!(
                "Invalid snapshot_field '{}'. Must be one of: {:?}",
                self.snapshot_field,
                valid_fields
            ));
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(anyhow!(
                "Image dimensions must be positive (width={}, height={})",
                self.image_width,
                self.image_height
            ));
        }
        Ok(())
    }
}

/// Complete solver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub flow: FlowConfig,
    pub numerics: NumericsConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| anyhow!("Failed to parse TOML config: {}", e))?;

        // Validate before returning
        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.flow.validate()?;
        self.numerics.validate()?;
        self.output.validate()?;
        Ok(())
    }

    /// Log configuration summary
    pub fn print_summary(&self) {
        info!("=== Cavity Configuration ===");
        info!(
            "Grid: {}x{} ({} x {} m)",
            self.grid.imax,
            self.grid.jmax,
            self.grid.xmax - self.grid.xmin,
            self.grid.ymax - self.grid.ymin
        );
        info!(
            "Flow: Re={}, rho={} kg/m³, lid={} m/s, p_ref={} N/m²",
            self.flow.reynolds, self.flow.rho, self.flow.lid_velocity, self.flow.reference_pressure
        );
        info!(
            "Numerics: {:?}, CFL={}, C4=({}, {}), rkappa={}, tol={:e}, max iter={}",
            self.numerics.scheme,
            self.numerics.cfl,
            self.numerics.cx,
            self.numerics.cy,
            self.numerics.rkappa,
            self.numerics.tolerance,
            self.numerics.max_iterations
        );
        if self.run.manufactured_solution {
            info!("Boundary conditions: manufactured solution");
        } else {
            info!("Boundary conditions: lid-driven walls");
        }
        if let Some(restart) = &self.run.restart {
            info!("Restarting from {}", restart.display());
        }
        info!(
            "Output: {} (residuals every {}, solution every {})",
            self.output.directory.display(),
            self.output.residual_interval,
            self.output.solution_interval
        );
        info!("============================");
    }
}
