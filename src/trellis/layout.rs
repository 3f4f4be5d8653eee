use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Layout inputs
// ---------------------------------------------------------------------------

/// Space left empty inside each grid cell, as a fraction of the cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Padding {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 0.05,
            bottom: 0.05,
            right: 0.05,
            top: 0.05,
        }
    }
}

/// Region of the figure the whole trellis occupies, in figure fractions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Margins {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 0.1,
            bottom: 0.1,
            width: 0.8,
            height: 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// Panel geometry
// ---------------------------------------------------------------------------

/// A panel rectangle in figure fractions, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelGeometry {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Whether the interiors of two rectangles intersect.
    pub fn overlaps(&self, other: &PanelGeometry) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.bottom < other.top()
            && other.bottom < self.top()
    }
}

/// Index pairs `(ix, iy)` with `iy < ix` over `npars` parameters, in the
/// order panels are built: outer loop over `ix`, inner over `iy`.
pub fn lower_triangle(npars: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..npars).flat_map(|ix| (0..ix).map(move |iy| (ix, iy)))
}

/// Rectangle of the panel comparing parameter `ix` (horizontal) against
/// parameter `iy` (vertical).
///
/// Without a reserved diagonal the first column never holds a panel, so the
/// grid shrinks to `npars - 1` cells per side and shifts one column left.
///
/// Returns `None` unless `iy < ix < npars`.
pub fn panel_geometry(
    ix: usize,
    iy: usize,
    npars: usize,
    show_diagonal: bool,
    pad: &Padding,
    outer: &Margins,
) -> Option<PanelGeometry> {
    if iy >= ix || ix >= npars {
        return None;
    }

    let (divisor, column) = if show_diagonal {
        (npars, ix)
    } else {
        (npars - 1, ix.checked_sub(1)?)
    };
    let (divisor, column) = (divisor as f64, column as f64);

    Some(PanelGeometry {
        left: outer.left + outer.width * (column + pad.left) / divisor,
        bottom: outer.bottom + outer.height * (iy as f64 + pad.bottom) / divisor,
        width: (1.0 - pad.left - pad.right) * outer.width / divisor,
        height: (1.0 - pad.bottom - pad.top) * outer.height / divisor,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn assert_geometry(actual: PanelGeometry, expected: [f64; 4]) {
        assert_relative_eq!(actual.left, expected[0], epsilon = 1e-12);
        assert_relative_eq!(actual.bottom, expected[1], epsilon = 1e-12);
        assert_relative_eq!(actual.width, expected[2], epsilon = 1e-12);
        assert_relative_eq!(actual.height, expected[3], epsilon = 1e-12);
    }

    fn all_panels(npars: usize, show_diagonal: bool) -> Vec<PanelGeometry> {
        lower_triangle(npars)
            .map(|(ix, iy)| {
                panel_geometry(
                    ix,
                    iy,
                    npars,
                    show_diagonal,
                    &Padding::default(),
                    &Margins::default(),
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn lower_triangle_order_and_count() {
        let pairs: Vec<_> = lower_triangle(4).collect();
        assert_eq!(pairs, [(1, 0), (2, 0), (2, 1), (3, 0), (3, 1), (3, 2)]);
        for n in 2..8 {
            assert_eq!(lower_triangle(n).count(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn three_parameters_without_diagonal() {
        // divisor 2, cell 0.4 wide, padded panel 0.36 wide
        let p = all_panels(3, false);
        assert_geometry(p[0], [0.12, 0.12, 0.36, 0.36]); // (1, 0)
        assert_geometry(p[1], [0.52, 0.12, 0.36, 0.36]); // (2, 0)
        assert_geometry(p[2], [0.52, 0.52, 0.36, 0.36]); // (2, 1)
    }

    #[test]
    fn three_parameters_with_diagonal() {
        // divisor 3, cell 0.8/3 wide
        let cell = 0.8 / 3.0;
        let side = 0.9 * cell;
        let p = all_panels(3, true);
        assert_geometry(p[0], [0.1 + 1.05 * cell, 0.1 + 0.05 * cell, side, side]);
        assert_geometry(p[1], [0.1 + 2.05 * cell, 0.1 + 0.05 * cell, side, side]);
        assert_geometry(p[2], [0.1 + 2.05 * cell, 0.1 + 1.05 * cell, side, side]);
    }

    #[test]
    fn four_parameters_both_ways() {
        let p = all_panels(4, false);
        // divisor 3: (3, 2) sits in the top-right cell
        let cell = 0.8 / 3.0;
        assert_geometry(
            p[5],
            [0.1 + 2.05 * cell, 0.1 + 2.05 * cell, 0.9 * cell, 0.9 * cell],
        );
        // (1, 0) sits in the bottom-left cell
        assert_geometry(
            p[0],
            [0.1 + 0.05 * cell, 0.1 + 0.05 * cell, 0.9 * cell, 0.9 * cell],
        );

        let p = all_panels(4, true);
        // divisor 4, cell 0.2: (3, 2) → left 0.1 + 3.05 * 0.2
        assert_geometry(p[5], [0.71, 0.51, 0.18, 0.18]);
        assert_geometry(p[0], [0.31, 0.11, 0.18, 0.18]);
    }

    #[test]
    fn asymmetric_padding() {
        let pad = Padding {
            left: 0.1,
            bottom: 0.2,
            right: 0.0,
            top: 0.3,
        };
        let g = panel_geometry(2, 1, 3, false, &pad, &Margins::default()).unwrap();
        assert_geometry(g, [0.1 + 0.4 * 1.1, 0.1 + 0.4 * 1.2, 0.9 * 0.4, 0.5 * 0.4]);
    }

    #[test]
    fn pairs_off_the_lower_triangle_have_no_geometry() {
        let (pad, outer) = (Padding::default(), Margins::default());
        for show_diagonal in [false, true] {
            assert_eq!(panel_geometry(0, 0, 3, show_diagonal, &pad, &outer), None);
            assert_eq!(panel_geometry(1, 2, 3, show_diagonal, &pad, &outer), None);
            assert_eq!(panel_geometry(3, 1, 3, show_diagonal, &pad, &outer), None);
        }
        assert!(panel_geometry(1, 0, 2, false, &pad, &outer).is_some());
    }

    #[test]
    fn panels_never_overlap_and_stay_inside_the_figure() {
        for npars in 2..7 {
            for show_diagonal in [false, true] {
                let panels = all_panels(npars, show_diagonal);
                for (i, a) in panels.iter().enumerate() {
                    assert!(a.left >= 0.0 && a.bottom >= 0.0);
                    assert!(a.right() <= 1.0 && a.top() <= 1.0);
                    for b in &panels[i + 1..] {
                        assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
                    }
                }
            }
        }
    }
}
