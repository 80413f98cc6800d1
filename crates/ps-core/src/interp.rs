//! Table interpolation shared by chart and thermochemistry lookups.

use crate::error::{CoreError, CoreResult};

/// Axes need at least two finite, strictly increasing points.
pub fn check_axis(axis: &[f64], what: &'static str) -> CoreResult<()> {
    if axis.len() < 2 {
        return Err(CoreError::InvalidArg { what });
    }
    if axis.iter().any(|v| !v.is_finite()) || axis.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CoreError::InvalidArg { what });
    }
    Ok(())
}

/// Index `i` with `axis[i] <= x <= axis[i + 1]`, or `None` outside the axis.
pub fn bracket(axis: &[f64], x: f64) -> Option<usize> {
    let last = axis.len().checked_sub(1)?;
    if last == 0 || !(x >= axis[0] && x <= axis[last]) {
        return None;
    }
    let upper = axis.partition_point(|&v| v <= x);
    Some(upper.saturating_sub(1).min(last - 1))
}

/// Values on a rectilinear grid, interpolated bilinearly.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2 {
    x_axis: Vec<f64>,
    y_axis: Vec<f64>,
    /// Row-major over `x_axis`
    values: Vec<f64>,
}

impl Grid2 {
    pub fn new(x_axis: Vec<f64>, y_axis: Vec<f64>, values: Vec<f64>) -> CoreResult<Self> {
        check_axis(&x_axis, "grid x axis")?;
        check_axis(&y_axis, "grid y axis")?;
        if values.len() != x_axis.len() * y_axis.len() {
            return Err(CoreError::InvalidArg {
                what: "grid value count does not match axes",
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidArg {
                what: "grid values must be finite",
            });
        }
        Ok(Self {
            x_axis,
            y_axis,
            values,
        })
    }

    pub fn x_axis(&self) -> &[f64] {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &[f64] {
        &self.y_axis
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.y_axis.len() + j]
    }

    pub fn interpolate(&self, x: f64, y: f64) -> Option<f64> {
        let i = bracket(&self.x_axis, x)?;
        let j = bracket(&self.y_axis, y)?;
        let tx = (x - self.x_axis[i]) / (self.x_axis[i + 1] - self.x_axis[i]);
        let ty = (y - self.y_axis[j]) / (self.y_axis[j + 1] - self.y_axis[j]);
        let low = self.at(i, j) * (1.0 - ty) + self.at(i, j + 1) * ty;
        let high = self.at(i + 1, j) * (1.0 - ty) + self.at(i + 1, j + 1) * ty;
        Some(low * (1.0 - tx) + high * tx)
    }
}
