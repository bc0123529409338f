//! Artificial-compressibility pseudo-transient solver for the 2-D
//! lid-driven cavity, with a manufactured-solution mode for verification.

pub mod boundary;
pub mod checkpoint;
pub mod config;
pub mod convergence;
pub mod dissipation;
pub mod error;
pub mod field;
pub mod grid;
pub mod mms;
pub mod output;
pub mod params;
pub mod pressure;
pub mod relaxation;
pub mod solver;
pub mod timestep;
pub mod visualisation;

pub use config::Config;
pub use error::{SolverError, SolverResult};
pub use output::OutputWriter;
pub use solver::{RunState, RunSummary, Solver};
