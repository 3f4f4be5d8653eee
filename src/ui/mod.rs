pub mod panels;
pub mod plot;

use eframe::egui::Color32;
use trellis_view::{ColorScale, Colormap};

/// Scale colour of `v`, or `None` when it has none (NaN).
pub fn value_color(colormap: Colormap, scale: &ColorScale, v: f64) -> Option<Color32> {
    colormap
        .map(scale, v)
        .map(|[r, g, b]| Color32::from_rgb(r, g, b))
}
