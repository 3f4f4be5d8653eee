//! Scattered-to-regular-grid interpolation of per-point minima.
//!
//! The lattice is `n × n` over the bounding box of the observations, stored
//! row-major with rows running from the highest y down to the lowest and
//! columns from the lowest x up to the highest. That is the orientation an
//! image is drawn in, so cell `(0, 0)` sits at the top-left corner
//! `(x_min, y_max)`.
mod cubic;
mod delaunay;

use serde::{Deserialize, Serialize};

use crate::error::InterpolationUndefined;

pub use cubic::Cubic;
pub use delaunay::triangulate;

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

/// Interpolation strategy for the panel images.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InterpMethod {
    /// Value of the nearest observation; defined everywhere.
    #[default]
    Nearest,
    /// Piecewise-linear over a Delaunay triangulation; missing outside the
    /// convex hull of the observations.
    Linear,
    /// Piecewise-cubic (Clough–Tocher) over the same triangulation; missing
    /// outside the convex hull.
    Cubic,
}

impl InterpMethod {
    pub fn interpolator(self) -> Box<dyn Interpolator> {
        match self {
            InterpMethod::Nearest => Box::new(NearestNeighbor),
            InterpMethod::Linear => Box::new(Linear),
            InterpMethod::Cubic => Box::new(Cubic),
        }
    }
}

/// Estimates values at arbitrary targets from scattered observations.
///
/// Implementations return one value per target, NaN where no estimate
/// exists.
pub trait Interpolator {
    fn interpolate(
        &self,
        points: &[[f64; 2]],
        values: &[f64],
        targets: &[[f64; 2]],
    ) -> Result<Vec<f64>, InterpolationUndefined>;
}

// ---------------------------------------------------------------------------
// Nearest neighbour
// ---------------------------------------------------------------------------

/// Euclidean nearest observation; ties go to the lowest observation index.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Interpolator for NearestNeighbor {
    fn interpolate(
        &self,
        points: &[[f64; 2]],
        values: &[f64],
        targets: &[[f64; 2]],
    ) -> Result<Vec<f64>, InterpolationUndefined> {
        if points.is_empty() {
            return Err(InterpolationUndefined::TooFewPoints { needed: 1, got: 0 });
        }

        Ok(targets
            .iter()
            .map(|t| {
                let mut best = 0;
                let mut best_d2 = f64::INFINITY;
                for (i, p) in points.iter().enumerate() {
                    let d2 = (p[0] - t[0]).powi(2) + (p[1] - t[1]).powi(2);
                    if d2 < best_d2 {
                        best = i;
                        best_d2 = d2;
                    }
                }
                values[best]
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Linear (barycentric over Delaunay triangles)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl Interpolator for Linear {
    fn interpolate(
        &self,
        points: &[[f64; 2]],
        values: &[f64],
        targets: &[[f64; 2]],
    ) -> Result<Vec<f64>, InterpolationUndefined> {
        if points.len() < 3 {
            return Err(InterpolationUndefined::TooFewPoints {
                needed: 3,
                got: points.len(),
            });
        }

        let triangles = triangulate(points);
        if triangles.is_empty() {
            return Err(InterpolationUndefined::Collinear);
        }

        Ok(targets
            .iter()
            .map(|&t| {
                triangles
                    .iter()
                    .find_map(|tri| {
                        let w = delaunay::barycentric(tri.map(|i| points[i]), t)?;
                        Some(
                            w[0] * values[tri[0]] + w[1] * values[tri[1]] + w[2] * values[tri[2]],
                        )
                    })
                    .unwrap_or(f64::NAN)
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Interpolated grid
// ---------------------------------------------------------------------------

/// An `n × n` image of interpolated values; NaN marks "no estimate".
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedGrid {
    size: usize,
    /// Column coordinates, ascending.
    xs: Vec<f64>,
    /// Row coordinates, descending.
    ys: Vec<f64>,
    values: Vec<f64>,
}

impl InterpolatedGrid {
    /// Cells per side.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size + col]
    }

    /// Rows from the top (highest y) down.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.size)
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// All cells in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Interpolate the observations `(x[i], y[i]) → v[i]` onto an `n × n`
/// lattice spanning their bounding box.
///
/// The box covers every point with finite coordinates, including points
/// whose value is missing; only valued points are interpolated from. An
/// axis without range makes the lattice degenerate, which is reported
/// rather than papered over.
pub fn interpolate_grid(
    x: &[f64],
    y: &[f64],
    v: &[f64],
    n: usize,
    method: &dyn Interpolator,
) -> Result<InterpolatedGrid, InterpolationUndefined> {
    let located: Vec<([f64; 2], f64)> = x
        .iter()
        .zip(y)
        .zip(v)
        .filter(|((xi, yi), _)| !(xi.is_nan() || yi.is_nan()))
        .map(|((&xi, &yi), &vi)| ([xi, yi], vi))
        .collect();

    if located.is_empty() {
        return Err(InterpolationUndefined::TooFewPoints { needed: 1, got: 0 });
    }

    let (x_lo, x_hi) = bounds(located.iter().map(|(p, _)| p[0]));
    let (y_lo, y_hi) = bounds(located.iter().map(|(p, _)| p[1]));
    if x_hi <= x_lo {
        return Err(InterpolationUndefined::ZeroRange { axis: "x" });
    }
    if y_hi <= y_lo {
        return Err(InterpolationUndefined::ZeroRange { axis: "y" });
    }

    let (points, values): (Vec<[f64; 2]>, Vec<f64>) =
        located.into_iter().filter(|(_, vi)| !vi.is_nan()).unzip();

    let xs = linspace(x_lo, x_hi, n);
    let ys = linspace(y_hi, y_lo, n);
    let targets: Vec<[f64; 2]> = ys
        .iter()
        .flat_map(|&yi| xs.iter().map(move |&xi| [xi, yi]))
        .collect();

    let values = method.interpolate(&points, &values, &targets)?;
    Ok(InterpolatedGrid {
        size: n,
        xs,
        ys,
        values,
    })
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
