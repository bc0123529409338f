//! Run output: residual history, Tecplot field zones, restart files and
//! optional PNG snapshots, all under one output directory.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::checkpoint::Checkpoint;
use crate::config::OutputConfig;
use crate::convergence::Residuals;
use crate::error::{SolverError, SolverResult};
use crate::field::NEQ;
use crate::grid::Grid;
use crate::mms::{ErrorNorms, ManufacturedSolution};
use crate::visualisation::FieldVisualiser;

pub const HISTORY_FILE: &str = "history.dat";
pub const FIELD_FILE: &str = "cavity.dat";
pub const RESTART_FILE: &str = "restart.out";
pub const NORMS_FILE: &str = "de_norms.dat";

const HEADER_EVERY: usize = 20; // Residual records between column headers

/// Open output streams for one run.
pub struct OutputWriter {
    directory: PathBuf,
    history: BufWriter<File>,
    fields: BufWriter<File>,
    manufactured: bool,
    records: usize,
    snapshots: Option<(FieldVisualiser, String)>,
}

impl OutputWriter {
    /// Create the directory and both Tecplot files with their headers.
    pub fn create(config: &OutputConfig, manufactured: bool) -> SolverResult<Self> {
        let directory = config.directory.clone();
        fs::create_dir_all(&directory).map_err(|e| SolverError::io(&directory, e))?;

        let history = open(&directory.join(HISTORY_FILE))?;
        let fields = open(&directory.join(FIELD_FILE))?;

        let snapshots = if config.snapshots {
            let visualiser = FieldVisualiser::new(&directory, config.image_width, config.image_height)
                .map_err(|e| SolverError::io(&directory, e))?;
            Some((visualiser, config.snapshot_field.clone()))
        } else {
            None
        };

        let mut writer = Self {
            directory,
            history,
            fields,
            manufactured,
            records: 0,
            snapshots,
        };
        writer.write_headers()?;
        Ok(writer)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn restart_path(&self) -> PathBuf {
        self.directory.join(RESTART_FILE)
    }

    fn write_headers(&mut self) -> SolverResult<()> {
        write_history_header(&mut self.history)
            .map_err(|e| SolverError::io(self.directory.join(HISTORY_FILE), e))?;
        write_field_header(&mut self.fields, self.manufactured)
            .map_err(|e| SolverError::io(self.directory.join(FIELD_FILE), e))
    }

    /// Append one history record and log the same numbers.
    pub fn record_residuals(
        &mut self,
        iteration: usize,
        time: f64,
        dt_min: f64,
        residuals: &Residuals,
    ) -> SolverResult<()> {
        let [r0, r1, r2] = residuals.normalized;
        writeln!(self.history, "{} {:e} {:e} {:e} {:e}", iteration, time, r0, r1, r2)
            .map_err(|e| SolverError::io(self.directory.join(HISTORY_FILE), e))?;

        if self.records % HEADER_EVERY == 0 {
            info!("Iter.    Time (s)     dt (s)       Continuity   x-Momentum   y-Momentum");
        }
        info!(
            "{:<8} {:.5e}  {:.5e}  {:.5e}  {:.5e}  {:.5e}",
            iteration, time, dt_min, r0, r1, r2
        );
        self.records += 1;
        Ok(())
    }

    /// Field zone, restart file and snapshot for the state in `checkpoint`.
    pub fn write_solution(
        &mut self,
        checkpoint: &Checkpoint,
        grid: &Grid,
        exact: Option<&ManufacturedSolution>,
    ) -> SolverResult<()> {
        let field_path = self.directory.join(FIELD_FILE);
        self.write_zone(checkpoint, grid, exact)
            .map_err(|e| SolverError::io(&field_path, e))?;

        let restart = self.restart_path();
        checkpoint.write(&restart, grid)?;
        debug!(
            "Wrote solution zone and {} at iteration {}",
            restart.display(),
            checkpoint.iteration
        );

        if let Some((visualiser, quantity)) = &self.snapshots {
            if let Some(data) = FieldVisualiser::quantity(&checkpoint.field, quantity) {
                match visualiser.plot_field(&data, checkpoint.iteration, quantity) {
                    Ok(path) => debug!("Saved frame: {}", path.display()),
                    Err(e) => warn!("Failed to visualise: {}", e),
                }
            }
        }
        Ok(())
    }

    fn write_zone(
        &mut self,
        checkpoint: &Checkpoint,
        grid: &Grid,
        exact: Option<&ManufacturedSolution>,
    ) -> std::io::Result<()> {
        let out = &mut self.fields;
        writeln!(out, "zone T=\"n={}\"", checkpoint.iteration)?;
        writeln!(out, "I= {} J= {}", grid.imax, grid.jmax)?;
        writeln!(out, "DATAPACKING=POINT")?;

        for i in 0..grid.imax {
            for j in 0..grid.jmax {
                let (x, y) = (grid.x_coord(i), grid.y_coord(j));
                let cell = checkpoint.field.cell(i, j);
                write!(out, "{:e} {:e} {:e} {:e} {:e}", x, y, cell[0], cell[1], cell[2])?;
                if let Some(mms) = exact {
                    let e = mms.exact_cell(x, y);
                    write!(
                        out,
                        " {:e} {:e} {:e} {:e} {:e} {:e}",
                        e[0],
                        e[1],
                        e[2],
                        cell[0] - e[0],
                        cell[1] - e[1],
                        cell[2] - e[2]
                    )?;
                }
                writeln!(out)?;
            }
        }
        out.flush()
    }

    /// Log the discretization error norms and write them to their own file.
    pub fn write_error_norms(&self, norms: &ErrorNorms) -> SolverResult<()> {
        let names = ["pressure", "x-velocity", "y-velocity"];
        for k in 0..NEQ {
            info!(
                "DE norms {:<10}  L1={:e}  L2={:e}  Linf={:e}",
                names[k], norms.l1[k], norms.l2[k], norms.linf[k]
            );
        }

        let path = self.directory.join(NORMS_FILE);
        let mut out = open(&path)?;
        write_norms(&mut out, &names, norms).map_err(|e| SolverError::io(&path, e))
    }

    pub fn flush(&mut self) -> SolverResult<()> {
        self.history
            .flush()
            .map_err(|e| SolverError::io(self.directory.join(HISTORY_FILE), e))?;
        self.fields
            .flush()
            .map_err(|e| SolverError::io(self.directory.join(FIELD_FILE), e))
    }
}

fn write_history_header(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "TITLE = \"Cavity Iterative Residual History\"")?;
    writeln!(out, "variables=\"Iteration\"\"Time(s)\"\"Res1\"\"Res2\"\"Res3\"")
}

fn write_field_header(out: &mut impl Write, manufactured: bool) -> std::io::Result<()> {
    writeln!(out, "TITLE = \"Cavity Field Data\"")?;
    write!(out, "variables=\"x(m)\"\"y(m)\"\"p(N/m^2)\"\"u(m/s)\"\"v(m/s)\"")?;
    if manufactured {
        write!(out, "\"p-exact\"\"u-exact\"\"v-exact\"\"DE-p\"\"DE-u\"\"DE-v\"")?;
    }
    writeln!(out)
}

fn write_norms(out: &mut impl Write, names: &[&str; NEQ], norms: &ErrorNorms) -> std::io::Result<()> {
    writeln!(out, "TITLE = \"Discretization Error Norms\"")?;
    writeln!(out, "variables=\"Equation\"\"L1\"\"L2\"\"Linf\"")?;
    for k in 0..NEQ {
        writeln!(
            out,
            "{} {:e} {:e} {:e}",
            names[k], norms.l1[k], norms.l2[k], norms.linf[k]
        )?;
    }
    out.flush()
}

fn open(path: &Path) -> SolverResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| SolverError::io(path, e))
}
