//! Piecewise-cubic interpolation over a Delaunay triangulation.
//!
//! Each triangle is split at its centroid into three cubic Bézier patches
//! (Clough–Tocher). The surface is C1 inside a triangle and continuous across
//! its edges. Vertex gradients come from a least-squares plane through each
//! vertex's Delaunay neighbours, so planar data is reproduced exactly.

use super::delaunay::{self, triangulate};
use super::Interpolator;
use crate::error::InterpolationUndefined;

/// Clough–Tocher cubic; missing outside the convex hull of the observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cubic;

impl Interpolator for Cubic {
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

        let gradients = estimate_gradients(points, values, &triangles);
        let patches: Vec<Patch> = triangles
            .iter()
            .map(|&tri| Patch::new(tri, points, values, &gradients))
            .collect();

        Ok(targets
            .iter()
            .map(|&t| {
                triangles
                    .iter()
                    .zip(&patches)
                    .find_map(|(tri, patch)| {
                        let w = delaunay::barycentric(tri.map(|i| points[i]), t)?;
                        Some(patch.eval(w))
                    })
                    .unwrap_or(f64::NAN)
            })
            .collect())
    }
}

fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

fn sub(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

/// Least-squares gradient at every vertex from its Delaunay neighbours.
/// Vertices without a usable neighbourhood get a flat gradient.
fn estimate_gradients(
    points: &[[f64; 2]],
    values: &[f64],
    triangles: &[[usize; 3]],
) -> Vec<[f64; 2]> {
    let mut neighbours: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
    for tri in triangles {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            if !neighbours[a].contains(&b) {
                neighbours[a].push(b);
            }
            if !neighbours[b].contains(&a) {
                neighbours[b].push(a);
            }
        }
    }

    neighbours
        .iter()
        .enumerate()
        .map(|(i, around)| {
            let (mut sxx, mut sxy, mut syy, mut sxf, mut syf) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for &j in around {
                let [dx, dy] = sub(points[j], points[i]);
                let df = values[j] - values[i];
                sxx += dx * dx;
                sxy += dx * dy;
                syy += dy * dy;
                sxf += dx * df;
                syf += dy * df;
            }
            let det = sxx * syy - sxy * sxy;
            if det.abs() <= 1e-12 * sxx * syy {
                return [0.0, 0.0];
            }
            [(sxf * syy - syf * sxy) / det, (syf * sxx - sxf * sxy) / det]
        })
        .collect()
}

/// Bézier control values of one macro-triangle, indexed by vertex `k`.
///
/// Sub-triangle `k` is `(V[k], V[k+1], centroid)`.
#[derive(Debug, Clone, Copy)]
struct Patch {
    vertex: [f64; 3],
    /// Control at `V[k] + (V[k+1] - V[k]) / 3`.
    forward: [f64; 3],
    /// Control at `V[k+1] + (V[k] - V[k+1]) / 3`.
    backward: [f64; 3],
    /// Control at `(2 V[k] + C) / 3`.
    spoke: [f64; 3],
    /// Control at `(V[k] + V[k+1] + C) / 3`.
    edge: [f64; 3],
    /// Control at `(V[k] + 2 C) / 3`.
    inner: [f64; 3],
    center: f64,
}

impl Patch {
    fn new(tri: [usize; 3], points: &[[f64; 2]], values: &[f64], gradients: &[[f64; 2]]) -> Self {
        let v = tri.map(|i| points[i]);
        let f = tri.map(|i| values[i]);
        let g = tri.map(|i| gradients[i]);
        let c = [
            (v[0][0] + v[1][0] + v[2][0]) / 3.0,
            (v[0][1] + v[1][1] + v[2][1]) / 3.0,
        ];
        // value of vertex k's tangent plane at p
        let tangent = |k: usize, p: [f64; 2]| f[k] + dot(g[k], sub(p, v[k]));

        let next = |k: usize| (k + 1) % 3;
        let forward = [0, 1, 2].map(|k| f[k] + dot(g[k], sub(v[next(k)], v[k])) / 3.0);
        let backward = [0, 1, 2].map(|k| f[next(k)] + dot(g[next(k)], sub(v[k], v[next(k)])) / 3.0);
        let spoke = [0, 1, 2].map(|k| f[k] + dot(g[k], sub(c, v[k])) / 3.0);
        let edge = [0, 1, 2].map(|k| {
            let n = next(k);
            let d = [
                (v[k][0] + v[n][0] + c[0]) / 3.0,
                (v[k][1] + v[n][1] + c[1]) / 3.0,
            ];
            (tangent(k, d) + tangent(n, d)) / 2.0
        });
        let inner = [0, 1, 2].map(|k| (spoke[k] + edge[k] + edge[(k + 2) % 3]) / 3.0);
        let center = (inner[0] + inner[1] + inner[2]) / 3.0;

        Patch {
            vertex: f,
            forward,
            backward,
            spoke,
            edge,
            inner,
            center,
        }
    }

    /// Evaluate at barycentric weights `w` of the macro-triangle.
    fn eval(&self, w: [f64; 3]) -> f64 {
        // the sub-triangle is the one opposite the smallest weight
        let m = (0..3).fold(0, |m, i| if w[i] < w[m] { i } else { m });
        let k = (m + 1) % 3;
        let n = (k + 1) % 3;
        let (a, b, c) = (w[k] - w[m], w[n] - w[m], 3.0 * w[m]);

        a.powi(3) * self.vertex[k]
            + b.powi(3) * self.vertex[n]
            + c.powi(3) * self.center
            + 3.0 * a * a * b * self.forward[k]
            + 3.0 * a * b * b * self.backward[k]
            + 3.0 * a * a * c * self.spoke[k]
            + 3.0 * b * b * c * self.spoke[n]
            + 3.0 * a * c * c * self.inner[k]
            + 3.0 * b * c * c * self.inner[n]
            + 6.0 * a * b * c * self.edge[k]
    }
}
