use palette::{Hsl, IntoColor, Mix, Srgb};
use serde::{Deserialize, Serialize};

use crate::trellis::scale::ColorScale;

// ---------------------------------------------------------------------------
// Colormaps: normalised value → sRGB
// ---------------------------------------------------------------------------

/// How objective values are turned into colours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Blue → white → red, diverging around the middle of the scale.
    #[default]
    Bwr,
    /// Hue sweep from blue (low) to red (high) at constant saturation.
    Hue,
}

impl Colormap {
    /// Colour for a position `t` in `[0, 1]` (clamped).
    pub fn rgb(self, t: f64) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0) as f32;
        let color: Srgb = match self {
            Colormap::Bwr => {
                let blue = Srgb::new(0.0, 0.0, 1.0);
                let white = Srgb::new(1.0, 1.0, 1.0);
                let red = Srgb::new(1.0, 0.0, 0.0);
                if t < 0.5 {
                    blue.mix(white, t * 2.0)
                } else {
                    white.mix(red, (t - 0.5) * 2.0)
                }
            }
            Colormap::Hue => {
                let hsl = Hsl::new(240.0 * (1.0 - t), 0.75, 0.55);
                hsl.into_color()
            }
        };
        let rgb: Srgb<u8> = color.into_format();
        [rgb.red, rgb.green, rgb.blue]
    }

    /// Colour of objective value `v` on `scale`; `None` for NaN.
    pub fn map(self, scale: &ColorScale, v: f64) -> Option<[u8; 3]> {
        scale.normalize(v).map(|t| self.rgb(t))
    }
}
