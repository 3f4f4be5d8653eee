//! Trellis assembly: one panel per pair of parameters.
//!
//! Pipeline:
//! ```text
//!   Dataset ──► params ──► ordered parameter names
//!                              │
//!                  for each (ix, iy), iy < ix
//!                              ▼
//!        ┌──────────┬─────────────┬──────────────┐
//!        │  layout  │  aggregate  │  interp (opt) │
//!        └──────────┴─────────────┴──────────────┘
//!                              │
//!                              ▼
//!                 scale: global vmin / vmax
//! ```
pub mod aggregate;
pub mod interp;
pub mod layout;
pub mod params;
pub mod scale;

use std::path::Path;

use crate::config::TrellisConfig;
use crate::data::{self, Dataset};
use crate::error::Result;

use aggregate::PairAggregate;
use interp::InterpolatedGrid;
use layout::PanelGeometry;
use scale::ColorScale;

// ---------------------------------------------------------------------------
// Panel – one pairwise comparison
// ---------------------------------------------------------------------------

/// Axis extents of a panel's observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Everything a renderer needs to draw one cell of the trellis.
#[derive(Debug, Clone)]
pub struct Panel {
    /// Parameter on the horizontal axis and its index.
    pub x_name: String,
    pub ix: usize,
    /// Parameter on the vertical axis and its index.
    pub y_name: String,
    pub iy: usize,
    pub geometry: PanelGeometry,
    pub data: PairAggregate,
    /// `None` when images are off or interpolation is undefined here.
    pub image: Option<InterpolatedGrid>,
    /// `None` only when the panel has no finite observations.
    pub extent: Option<Extent>,
    /// Bottom row: label and ticks on the x axis.
    pub show_x_label: bool,
    /// Right column: label and ticks on the y axis, drawn on the right.
    pub show_y_label: bool,
    /// Next to the diagonal: mirrored x ticks along the top.
    pub show_top_ticks: bool,
}

// ---------------------------------------------------------------------------
// Trellis
// ---------------------------------------------------------------------------

/// The prepared trellis: immutable once built.
#[derive(Debug, Clone)]
pub struct Trellis {
    parameters: Vec<String>,
    panels: Vec<Panel>,
    scale: ColorScale,
    config: TrellisConfig,
}

impl Trellis {
    /// Load `path` and build a trellis from it.
    pub fn from_file(path: &Path, config: TrellisConfig) -> Result<Self> {
        config.validate()?;
        let dataset = data::load_file(path, &config.objective)?;
        Self::build(&dataset, config)
    }

    /// Build every panel of `dataset` and resolve the shared colour scale.
    pub fn build(dataset: &Dataset, config: TrellisConfig) -> Result<Self> {
        config.validate()?;
        log::info!("Using objective \"{}\"", dataset.objective_name());

        let parameters = params::select_parameters(dataset, config.parameter_names.as_deref())?;
        let npars = parameters.len();
        let interpolator = config.interp_method.interpolator();

        let mut panels = Vec::with_capacity(npars * (npars - 1) / 2);
        for (ix, iy) in layout::lower_triangle(npars) {
            let (x_name, y_name) = (&parameters[ix], &parameters[iy]);

            let Some(geometry) = layout::panel_geometry(
                ix,
                iy,
                npars,
                config.show_diagonal,
                &config.axes_padding,
                &config.margins,
            ) else {
                continue;
            };
            let data = aggregate::aggregate(dataset, x_name, y_name)?;

            let image = if config.show_image {
                match interp::interpolate_grid(
                    &data.x,
                    &data.y,
                    &data.minima,
                    config.nbins_image,
                    interpolator.as_ref(),
                ) {
                    Ok(grid) => Some(grid),
                    Err(reason) => {
                        log::warn!("No image for {x_name} vs {y_name}: {reason}");
                        None
                    }
                }
            } else {
                None
            };

            let extent = data
                .x_range()
                .zip(data.y_range())
                .map(|((x_min, x_max), (y_min, y_max))| Extent {
                    x_min,
                    x_max,
                    y_min,
                    y_max,
                });

            log::debug!(
                "Panel {x_name} vs {y_name}: {} unique points, image: {}",
                data.len(),
                image.is_some()
            );

            panels.push(Panel {
                x_name: x_name.clone(),
                ix,
                y_name: y_name.clone(),
                iy,
                geometry,
                data,
                image,
                extent,
                show_x_label: iy == 0,
                show_y_label: ix == npars - 1,
                show_top_ticks: iy + 1 == ix,
            });
        }
        log::info!("Calculated the per-axes data for {} panels", panels.len());

        let scale = ColorScale::resolve(
            panels.iter().map(|p| p.data.minima.as_slice()),
            config.vmin,
            config.vmax,
        )?;

        Ok(Trellis {
            parameters,
            panels,
            scale,
            config,
        })
    }

    /// Ordered parameter names; panel indices refer to this list.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn scale(&self) -> ColorScale {
        self.scale
    }

    pub fn config(&self) -> &TrellisConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::TrellisError;
    use interp::InterpMethod;

    fn two_by_two() -> Dataset {
        Dataset::from_columns(
            vec![
                ("a".to_string(), vec![1.0, 1.0, 2.0, 2.0]),
                ("b".to_string(), vec![10.0, 20.0, 10.0, 20.0]),
                ("time".to_string(), vec![5.0, 3.0, 8.0, 1.0]),
            ],
            "time",
        )
        .unwrap()
    }

    fn four_params() -> Dataset {
        let a = vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0];
        let b = vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
        let c = vec![4.0, 4.0, 4.0, 8.0, 8.0, 8.0];
        let d = vec![0.5, 0.5, 0.5, 0.5, 0.5, 0.25];
        let time = vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        Dataset::from_columns(
            vec![
                ("d".to_string(), d),
                ("c".to_string(), c),
                ("time".to_string(), time),
                ("b".to_string(), b),
                ("a".to_string(), a),
            ],
            "time",
        )
        .unwrap()
    }

    #[test]
    fn two_parameter_end_to_end() {
        let trellis = Trellis::build(&two_by_two(), TrellisConfig::default()).unwrap();

        assert_eq!(trellis.parameters(), ["a", "b"]);
        assert_eq!(trellis.panels().len(), 1);

        let panel = &trellis.panels()[0];
        assert_eq!((panel.x_name.as_str(), panel.y_name.as_str()), ("b", "a"));
        assert_eq!(panel.data.len(), 4);
        assert_eq!(panel.data.minima, [5.0, 3.0, 8.0, 1.0]);
        assert_eq!(trellis.scale(), ColorScale { vmin: 1.0, vmax: 8.0 });

        let extent = panel.extent.unwrap();
        assert_eq!((extent.x_min, extent.x_max), (10.0, 20.0));
        assert_eq!((extent.y_min, extent.y_max), (1.0, 2.0));

        let image = panel.image.as_ref().unwrap();
        assert_eq!(image.size(), 100);
        // top-left cell is (b = 10, a = 2)
        assert_eq!(image.get(0, 0), 8.0);
        assert_eq!(image.get(99, 99), 3.0);

        assert!(panel.show_x_label && panel.show_y_label && panel.show_top_ticks);
    }

    #[test]
    fn panel_count_ignores_diagonal_flag() {
        for show_diagonal in [false, true] {
            let config = TrellisConfig {
                show_diagonal,
                ..TrellisConfig::default()
            };
            let trellis = Trellis::build(&four_params(), config).unwrap();
            assert_eq!(trellis.parameters(), ["a", "b", "c", "d"]);
            assert_eq!(trellis.panels().len(), 6);
        }
    }

    #[test]
    fn geometry_follows_the_diagonal_flag() {
        let build = |show_diagonal| {
            Trellis::build(
                &four_params(),
                TrellisConfig {
                    show_diagonal,
                    show_image: false,
                    ..TrellisConfig::default()
                },
            )
            .unwrap()
        };

        let without = build(false);
        let with = build(true);
        let first = |t: &Trellis| t.panels()[0].geometry;
        assert_relative_eq!(first(&without).width, 0.9 * 0.8 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(first(&with).width, 0.9 * 0.8 / 4.0, epsilon = 1e-12);
        assert_relative_eq!(first(&with).left, 0.31, epsilon = 1e-12);
    }

    #[test]
    fn label_flags_follow_panel_position() {
        let trellis = Trellis::build(&four_params(), TrellisConfig::default()).unwrap();
        let flags: Vec<_> = trellis
            .panels()
            .iter()
            .map(|p| (p.ix, p.iy, p.show_x_label, p.show_y_label, p.show_top_ticks))
            .collect();
        assert_eq!(
            flags,
            [
                (1, 0, true, false, true),
                (2, 0, true, false, false),
                (2, 1, false, false, true),
                (3, 0, true, true, false),
                (3, 1, false, true, false),
                (3, 2, false, true, true),
            ]
        );
    }

    #[test]
    fn zero_range_pair_keeps_panel_without_image() {
        // q never varies, so the lattice would have no width
        let ds = Dataset::from_columns(
            vec![
                ("p".to_string(), vec![1.0, 2.0, 3.0]),
                ("q".to_string(), vec![7.0, 7.0, 7.0]),
                ("time".to_string(), vec![3.0, 2.0, 1.0]),
            ],
            "time",
        )
        .unwrap();
        let trellis = Trellis::build(&ds, TrellisConfig::default()).unwrap();
        let panel = &trellis.panels()[0];
        assert!(panel.image.is_none());
        assert_eq!(panel.data.len(), 3);
        assert_eq!(trellis.scale(), ColorScale { vmin: 1.0, vmax: 3.0 });
    }

    #[test]
    fn lattice_spans_the_panel_extent_despite_missing_objectives() {
        // (b = 30, a = 3) was only ever measured as missing
        let ds = Dataset::from_columns(
            vec![
                ("a".to_string(), vec![1.0, 2.0, 1.0, 3.0]),
                ("b".to_string(), vec![10.0, 10.0, 20.0, 30.0]),
                ("time".to_string(), vec![5.0, 3.0, 8.0, f64::NAN]),
            ],
            "time",
        )
        .unwrap();

        for interp_method in [InterpMethod::Nearest, InterpMethod::Linear, InterpMethod::Cubic] {
            let config = TrellisConfig {
                interp_method,
                nbins_image: 11,
                ..TrellisConfig::default()
            };
            let trellis = Trellis::build(&ds, config).unwrap();
            let panel = &trellis.panels()[0];
            let extent = panel.extent.unwrap();
            assert_eq!((extent.x_min, extent.x_max), (10.0, 30.0));
            assert_eq!((extent.y_min, extent.y_max), (1.0, 3.0));

            let image = panel.image.as_ref().unwrap();
            assert_eq!(image.xs().first(), Some(&extent.x_min));
            assert_eq!(image.xs().last(), Some(&extent.x_max));
            assert_eq!(image.ys().first(), Some(&extent.y_max));
            assert_eq!(image.ys().last(), Some(&extent.y_min));
        }
    }

    #[test]
    fn images_can_be_switched_off() {
        let config = TrellisConfig {
            show_image: false,
            ..TrellisConfig::default()
        };
        let trellis = Trellis::build(&two_by_two(), config).unwrap();
        assert!(trellis.panels()[0].image.is_none());
    }

    #[test]
    fn explicit_parameters_drive_pairs() {
        let config = TrellisConfig {
            parameter_names: Some(vec!["c".to_string(), "a".to_string()]),
            ..TrellisConfig::default()
        };
        let trellis = Trellis::build(&four_params(), config).unwrap();
        let panel = &trellis.panels()[0];
        assert_eq!((panel.x_name.as_str(), panel.y_name.as_str()), ("a", "c"));
        assert_eq!((panel.ix, panel.iy), (1, 0));
    }

    #[test]
    fn configuration_errors_are_fatal() {
        let config = TrellisConfig {
            parameter_names: Some(vec!["a".to_string(), "zz".to_string()]),
            ..TrellisConfig::default()
        };
        assert!(matches!(
            Trellis::build(&four_params(), config),
            Err(TrellisError::UnknownParameter(n)) if n == "zz"
        ));

        let config = TrellisConfig {
            vmin: Some(10.0),
            ..TrellisConfig::default()
        };
        assert!(matches!(
            Trellis::build(&four_params(), config),
            Err(TrellisError::InvalidColorScale { .. })
        ));
    }

    #[test]
    fn loads_and_builds_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(
            &path,
            r#"{"a": {"0": 1, "1": 1, "2": 2, "3": 2},
                "b": {"0": 10, "1": 20, "2": 10, "3": 20},
                "time": {"0": 5.0, "1": 3.0, "2": 8.0, "3": 1.0}}"#,
        )
        .unwrap();

        let trellis = Trellis::from_file(&path, TrellisConfig::default()).unwrap();
        assert_eq!(trellis.panels()[0].data.minima, [5.0, 3.0, 8.0, 1.0]);
        assert_eq!(trellis.scale(), ColorScale { vmin: 1.0, vmax: 8.0 });

        let missing = Trellis::from_file(&dir.path().join("none.json"), TrellisConfig::default());
        assert!(matches!(missing, Err(TrellisError::Load { .. })));
    }
}
