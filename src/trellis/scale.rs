use crate::error::{Result, TrellisError};

/// Colour limits shared by every panel of a trellis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl ColorScale {
    /// Resolve the global scale from every panel's minima.
    ///
    /// A bound supplied by the caller is used verbatim; a missing one is the
    /// min (or max) over all values, NaN ignored. Either way the result must
    /// satisfy `vmin <= vmax`.
    pub fn resolve<'a, I>(minima: I, vmin: Option<f64>, vmax: Option<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let (lo, hi) = match (vmin, vmax) {
            (Some(lo), Some(hi)) => (lo, hi),
            _ => {
                let (data_lo, data_hi) = minima
                    .into_iter()
                    .flatten()
                    .filter(|v| !v.is_nan())
                    .fold((f64::NAN, f64::NAN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                let lo = vmin.unwrap_or(data_lo);
                let hi = vmax.unwrap_or(data_hi);
                if lo.is_nan() {
                    return Err(TrellisError::UnresolvedColorScale("vmin"));
                }
                if hi.is_nan() {
                    return Err(TrellisError::UnresolvedColorScale("vmax"));
                }
                (lo, hi)
            }
        };

        if !(lo <= hi) {
            return Err(TrellisError::InvalidColorScale { vmin: lo, vmax: hi });
        }

        let origin = |supplied: Option<f64>| match supplied {
            Some(_) => "defined",
            None => "identified",
        };
        log::info!("The lower color limit \"vmin\" was {} as {lo}", origin(vmin));
        log::info!("The upper color limit \"vmax\" was {} as {hi}", origin(vmax));

        Ok(ColorScale { vmin: lo, vmax: hi })
    }

    /// Position of `v` on the scale in `[0, 1]`, clamped.
    ///
    /// NaN has no position. A zero-width scale maps everything to the
    /// middle.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        if v.is_nan() {
            return None;
        }
        let width = self.vmax - self.vmin;
        if width <= 0.0 {
            return Some(0.5);
        }
        Some(((v - self.vmin) / width).clamp(0.0, 1.0))
    }
}
