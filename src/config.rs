use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::colormap::Colormap;
use crate::error::{Result, TrellisError};
use crate::trellis::interp::InterpMethod;
use crate::trellis::layout::{Margins, Padding};

// ---------------------------------------------------------------------------
// Trellis configuration
// ---------------------------------------------------------------------------

/// Every option that shapes a trellis, from data selection to drawing.
///
/// Missing fields in a JSON file take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrellisConfig {
    /// Column to minimize.
    pub objective: String,
    /// Explicit ordered subset of parameters; all of them, sorted, if unset.
    pub parameter_names: Option<Vec<String>>,
    /// Reserve the (always empty) diagonal row/column in the layout.
    pub show_diagonal: bool,
    pub show_image: bool,
    pub show_scatter: bool,
    /// Lattice resolution of the interpolated image.
    pub nbins_image: usize,
    pub interp_method: InterpMethod,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub axes_padding: Padding,
    pub margins: Margins,
    pub colormap: Colormap,
    /// Scatter marker radius in points.
    pub marker_radius: f32,
}

impl Default for TrellisConfig {
    fn default() -> Self {
        Self {
            objective: "time".to_string(),
            parameter_names: None,
            show_diagonal: false,
            show_image: true,
            show_scatter: true,
            nbins_image: 100,
            interp_method: InterpMethod::default(),
            vmin: None,
            vmax: None,
            axes_padding: Padding::default(),
            margins: Margins::default(),
            colormap: Colormap::default(),
            marker_radius: 5.0,
        }
    }
}

impl TrellisConfig {
    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let parsed = std::fs::read_to_string(path)
            .context("reading configuration file")
            .and_then(|text| {
                serde_json::from_str::<TrellisConfig>(&text).context("parsing configuration")
            })
            .map_err(|source| TrellisError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Check option ranges that the type system does not.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TrellisError::InvalidConfig(msg));

        if self.objective.is_empty() {
            return invalid("objective must not be empty".to_string());
        }
        if self.nbins_image == 0 {
            return invalid("nbins_image must be at least 1".to_string());
        }

        let p = &self.axes_padding;
        for (side, v) in [
            ("left", p.left),
            ("bottom", p.bottom),
            ("right", p.right),
            ("top", p.top),
        ] {
            if !(0.0..1.0).contains(&v) {
                return invalid(format!("axes_padding.{side} = {v} is outside [0, 1)"));
            }
        }
        if p.left + p.right >= 1.0 || p.bottom + p.top >= 1.0 {
            return invalid("axes_padding leaves no room for the panel".to_string());
        }

        let m = &self.margins;
        if !(m.width > 0.0 && m.height > 0.0) {
            return invalid(format!(
                "margins width/height must be positive, got {}x{}",
                m.width, m.height
            ));
        }

        if !(self.marker_radius > 0.0) {
            return invalid(format!("marker_radius = {} must be positive", self.marker_radius));
        }

        // Inverted explicit bounds are caught here already; partially
        // supplied bounds are checked once the other side is resolved.
        if let (Some(lo), Some(hi)) = (self.vmin, self.vmax) {
            if !(lo <= hi) {
                return Err(TrellisError::InvalidColorScale { vmin: lo, vmax: hi });
            }
        }

        Ok(())
    }
}
