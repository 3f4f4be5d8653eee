use std::collections::HashMap;

/// A triangle by vertex index, with its circumcircle cached.
#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Triangle {
    fn new(v: [usize; 3], pts: &[[f64; 2]]) -> Self {
        let [a, b, c] = v.map(|i| pts[i]);
        let d = 2.0 * (a[0] * (b[1] - c[1]) + b[0] * (c[1] - a[1]) + c[0] * (a[1] - b[1]));
        if d == 0.0 {
            // Degenerate: infinite circumcircle, always "contains" the point.
            return Triangle {
                v,
                cx: 0.0,
                cy: 0.0,
                r2: f64::INFINITY,
            };
        }
        let sa = a[0] * a[0] + a[1] * a[1];
        let sb = b[0] * b[0] + b[1] * b[1];
        let sc = c[0] * c[0] + c[1] * c[1];
        let cx = (sa * (b[1] - c[1]) + sb * (c[1] - a[1]) + sc * (a[1] - b[1])) / d;
        let cy = (sa * (c[0] - b[0]) + sb * (a[0] - c[0]) + sc * (b[0] - a[0])) / d;
        let r2 = (a[0] - cx).powi(2) + (a[1] - cy).powi(2);
        Triangle { v, cx, cy, r2 }
    }

    fn circumcircle_contains(&self, p: [f64; 2]) -> bool {
        (p[0] - self.cx).powi(2) + (p[1] - self.cy).powi(2) < self.r2
    }
}

/// Delaunay triangulation of distinct points (Bowyer–Watson).
///
/// Returns vertex-index triples into `points`. The result is empty when the
/// points span no area (fewer than three, or all collinear).
pub fn triangulate(points: &[[f64; 2]]) -> Vec<[usize; 3]> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p[0]);
        min_y = min_y.min(p[1]);
        max_x = max_x.max(p[0]);
        max_y = max_y.max(p[1]);
    }
    let delta = (max_x - min_x).max(max_y - min_y).max(f64::MIN_POSITIVE);
    let (mid_x, mid_y) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);

    // Super-triangle vertices live at indices n, n+1, n+2.
    let mut pts = points.to_vec();
    pts.push([mid_x - 100.0 * delta, mid_y - 100.0 * delta]);
    pts.push([mid_x, mid_y + 100.0 * delta]);
    pts.push([mid_x + 100.0 * delta, mid_y - 100.0 * delta]);

    let mut triangles = vec![Triangle::new([n, n + 1, n + 2], &pts)];

    for (i, &p) in points.iter().enumerate() {
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.circumcircle_contains(p));
        triangles = good;

        // The cavity boundary is every edge used by exactly one bad triangle.
        let mut edges: HashMap<(usize, usize), usize> = HashMap::new();
        for t in &bad {
            for k in 0..3 {
                let (a, b) = (t.v[k], t.v[(k + 1) % 3]);
                *edges.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }
        triangles.extend(
            edges
                .into_iter()
                .filter(|&(_, count)| count == 1)
                .map(|((a, b), _)| Triangle::new([a, b, i], &pts)),
        );
    }

    triangles
        .into_iter()
        .filter(|t| t.v.iter().all(|&v| v < n))
        .filter(|t| signed_area(t.v.map(|i| points[i])).abs() > 0.0)
        .map(|t| t.v)
        .collect()
}

/// Twice the signed area of a triangle.
pub fn signed_area([a, b, c]: [[f64; 2]; 3]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])
}

/// Barycentric weights of `p` in triangle `t`, or `None` if `p` lies
/// outside it beyond a small tolerance.
pub fn barycentric(t: [[f64; 2]; 3], p: [f64; 2]) -> Option<[f64; 3]> {
    const EPS: f64 = 1e-10;
    let area = signed_area(t);
    if area == 0.0 {
        return None;
    }
    let [a, b, c] = t;
    let w_a = signed_area([p, b, c]) / area;
    let w_b = signed_area([a, p, c]) / area;
    let w_c = 1.0 - w_a - w_b;
    (w_a >= -EPS && w_b >= -EPS && w_c >= -EPS).then_some([w_a, w_b, w_c])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn total_area(points: &[[f64; 2]], tris: &[[usize; 3]]) -> f64 {
        tris.iter()
            .map(|t| signed_area(t.map(|i| points[i])).abs() / 2.0)
            .sum()
    }

    #[test]
    fn square_with_center_covers_the_square() {
        let pts = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [1.0, 1.0]];
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(total_area(&pts, &tris), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn regular_grid_covers_its_hull() {
        let mut pts = Vec::new();
        for i in 0..4 {
            for j in 0..3 {
                pts.push([i as f64 * 16.0, j as f64 * 0.5]);
            }
        }
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 2 * 3 * 2);
        assert_relative_eq!(total_area(&pts, &tris), 48.0 * 1.0, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points_have_no_triangles() {
        let pts = [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
        assert!(triangulate(&pts).is_empty());
        assert!(triangulate(&pts[..2]).is_empty());
    }

    #[test]
    fn barycentric_weights_sum_to_one_inside() {
        let t = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let w = barycentric(t, [0.25, 0.25]).unwrap();
        assert_relative_eq!(w[0], 0.5);
        assert_relative_eq!(w[1], 0.25);
        assert_relative_eq!(w[2], 0.25);
        assert!(barycentric(t, [1.0, 0.0]).is_some());
        assert!(barycentric(t, [0.6, 0.6]).is_none());
    }
}
