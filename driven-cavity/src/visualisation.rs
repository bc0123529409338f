use ndarray::Array2;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::field::{Field, PRESSURE, XVEL, YVEL};

/// Renders one field quantity as a colour map, one PNG per call.
pub struct FieldVisualiser {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    gradient: Box<dyn colorgrad::Gradient>,
}

impl FieldVisualiser {
    pub fn new(output_dir: &Path, width: u32, height: u32) -> std::io::Result<Self> {
        std::fs::create_dir_all(output_dir)?;

        let gradient = Box::new(colorgrad::preset::rd_yl_bu());

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            width,
            height,
            gradient,
        })
    }

    /// Extract `quantity` ("pressure", "u", "v" or "vmag") from `field`.
    pub fn quantity(field: &Field, quantity: &str) -> Option<Array2<f64>> {
        match quantity {
            "pressure" => Some(field.component(PRESSURE)),
            "u" => Some(field.component(XVEL)),
            "v" => Some(field.component(YVEL)),
            "vmag" => Some(field.compute_velocity_magnitude()),
            _ => None,
        }
    }

    pub fn plot_field(
        &self,
        data: &Array2<f64>,
        iteration: usize,
        field_name: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let filename = self
            .output_dir
            .join(format!("{}_{:07}.png", field_name, iteration));
        let (imax, jmax) = data.dim();
        let min_val = data.iter().copied().fold(f64::INFINITY, f64::min);
        let max_val = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        {
            // The backend borrows the path until it is dropped
            let root = BitMapBackend::new(&filename, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE)?;

            // j grows upward so the lid is drawn at the top
            let mut chart = ChartBuilder::on(&root)
                .margin(10)
                .build_cartesian_2d(0..imax, 0..jmax)?;

            chart.draw_series((0..imax).flat_map(|i| (0..jmax).map(move |j| (i, j))).map(|(i, j)| {
                let color = self.value_to_color(data[[i, j]], min_val, max_val);
                Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
            }))?;

            root.present()?;
        }
        Ok(filename)
    }

    fn value_to_color(&self, value: f64, min_val: f64, max_val: f64) -> RGBColor {
        let normalized = if max_val > min_val {
            (value - min_val) / (max_val - min_val)
        } else {
            0.5
        };
        let normalized = normalized.clamp(0.0, 1.0);
        let color_rgba = self.gradient.at(normalized as f32).to_rgba8();
        RGBColor(color_rgba[0], color_rgba[1], color_rgba[2])
    }
}
