//! Plain-text restart files.
//!
//! ```text
//! <iteration> <time>
//! <res_p> <res_u> <res_v>          initial residuals
//! <x> <y> <p> <u> <v>              imax * jmax lines, i outer, j inner
//! ```
//!
//! Floats are written with `{:e}`, which round-trips exactly.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{SolverError, SolverResult};
use crate::field::{Field, NEQ};
use crate::grid::Grid;

/// Everything needed to resume a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    pub iteration: usize,
    pub time: f64,
    pub initial_residuals: [f64; NEQ],
    pub field: Field,
}

impl Checkpoint {
    pub fn write(&self, path: &Path, grid: &Grid) -> SolverResult<()> {
        let file = File::create(path).map_err(|e| SolverError::io(path, e))?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out, grid)
            .and_then(|_| out.flush())
            .map_err(|e| SolverError::io(path, e))
    }

    fn write_to(&self, out: &mut impl Write, grid: &Grid) -> std::io::Result<()> {
        writeln!(out, "{} {:e}", self.iteration, self.time)?;
        let [r0, r1, r2] = self.initial_residuals;
        writeln!(out, "{:e} {:e} {:e}", r0, r1, r2)?;
        for i in 0..grid.imax {
            for j in 0..grid.jmax {
                let [p, u, v] = self.field.cell(i, j);
                writeln!(
                    out,
                    "{:e} {:e} {:e} {:e} {:e}",
                    grid.x_coord(i),
                    grid.y_coord(j),
                    p,
                    u,
                    v
                )?;
            }
        }
        Ok(())
    }

    /// Read a restart file written for `grid`.
    pub fn read(path: &Path, grid: &Grid) -> SolverResult<Self> {
        let file = File::open(path).map_err(|e| SolverError::io(path, e))?;
        let mut lines = BufReader::new(file).lines().enumerate();
        let mut next_line = |what: &str| -> SolverResult<(usize, String)> {
            match lines.next() {
                Some((n, Ok(line))) => Ok((n + 1, line)),
                Some((_, Err(e))) => Err(SolverError::io(path, e)),
                None => Err(SolverError::checkpoint(path, 0, format!("missing {}", what))),
            }
        };

        let (n, header) = next_line("header")?;
        let words: Vec<&str> = header.split_whitespace().collect();
        let iteration = words
            .first()
            .and_then(|w| w.parse::<usize>().ok())
            .ok_or_else(|| SolverError::checkpoint(path, n, "expected iteration number"))?;
        let [time] = parse_floats::<1>(words.get(1..).unwrap_or_default(), path, n)?;

        let (n, residual_line) = next_line("initial residuals")?;
        let words: Vec<&str> = residual_line.split_whitespace().collect();
        let initial_residuals = parse_floats::<NEQ>(&words, path, n)?;

        let mut field = Field::new(grid.imax, grid.jmax);
        let expected = grid.imax * grid.jmax;
        let mut found = 0;
        for i in 0..grid.imax {
            for j in 0..grid.jmax {
                let (n, line) = match next_line("cell") {
                    Ok(line) => line,
                    Err(SolverError::Checkpoint { line: 0, .. }) => {
                        return Err(SolverError::GridMismatch { expected, found })
                    }
                    Err(e) => return Err(e),
                };
                let words: Vec<&str> = line.split_whitespace().collect();
                let [_, _, p, u, v] = parse_floats::<5>(&words, path, n)?;
                field.set_cell(i, j, [p, u, v]);
                found += 1;
            }
        }

        // Trailing cells mean the file belongs to a larger grid
        let extra = std::iter::from_fn(|| next_line("cell").ok())
            .filter(|(_, line)| !line.trim().is_empty())
            .count();
        if extra > 0 {
            return Err(SolverError::GridMismatch {
                expected,
                found: found + extra,
            });
        }

        Ok(Self {
            iteration,
            time,
            initial_residuals,
            field,
        })
    }
}

fn parse_floats<const N: usize>(words: &[&str], path: &Path, line: usize) -> SolverResult<[f64; N]> {
    if words.len() < N {
        return Err(SolverError::checkpoint(
            path,
            line,
            format!("expected {} values, got {}", N, words.len()),
        ));
    }
    let mut values = [0.0; N];
    for (value, word) in values.iter_mut().zip(words) {
        *value = word
            .parse()
            .map_err(|_| SolverError::checkpoint(path, line, format!("invalid number '{}'", word)))?;
    }
    Ok(values)
}
