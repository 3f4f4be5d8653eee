use std::collections::BTreeMap;

use eframe::egui::{self, Color32, ColorImage, TextureOptions, Ui, UiBuilder};
use egui_plot::{
    AxisHints, HPlacement, MarkerShape, Plot, PlotImage, PlotPoint, Points, VPlacement,
};
use trellis_view::{ColorScale, Colormap, Panel};

use super::value_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Trellis (central panel)
// ---------------------------------------------------------------------------

/// Render every panel of the trellis at its figure-fraction rectangle.
pub fn trellis_plot(ui: &mut Ui, state: &mut AppState) {
    let AppState { trellis, textures, .. } = state;
    let Some(trellis) = trellis.as_ref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the trellis  (File → Open…)");
        });
        return;
    };

    let scale = trellis.scale();
    let config = trellis.config();

    // Upload panel images once per build.
    if textures.len() != trellis.panels().len() {
        *textures = trellis
            .panels()
            .iter()
            .map(|panel| {
                let image = panel.image.as_ref()?;
                let pixels = image_pixels(image.values(), config.colormap, &scale);
                Some(ui.ctx().load_texture(
                    format!("trellis_{}_{}", panel.ix, panel.iy),
                    ColorImage::from_rgba_unmultiplied([image.size(), image.size()], &pixels),
                    TextureOptions::NEAREST,
                ))
            })
            .collect();
    }

    let figure = ui.max_rect();
    for (panel, texture) in trellis.panels().iter().zip(textures.iter()) {
        let g = panel.geometry;
        let rect = egui::Rect::from_min_max(
            egui::pos2(
                figure.left() + g.left as f32 * figure.width(),
                figure.bottom() - g.top() as f32 * figure.height(),
            ),
            egui::pos2(
                figure.left() + g.right() as f32 * figure.width(),
                figure.bottom() - g.bottom as f32 * figure.height(),
            ),
        );

        ui.scope_builder(UiBuilder::new().max_rect(rect), |ui: &mut Ui| {
            panel_plot(
                ui,
                panel,
                rect.size(),
                texture.as_ref(),
                config.show_scatter,
                config.marker_radius,
                config.colormap,
                &scale,
            );
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn panel_plot(
    ui: &mut Ui,
    panel: &Panel,
    size: egui::Vec2,
    texture: Option<&egui::TextureHandle>,
    show_scatter: bool,
    marker_radius: f32,
    colormap: Colormap,
    scale: &ColorScale,
) {
    // Ticks and labels only on the outer edges of the trellis.
    let mut x_axes = Vec::new();
    if panel.show_x_label {
        x_axes.push(AxisHints::new_x().label(panel.x_name.clone()));
    }
    if panel.show_top_ticks {
        x_axes.push(AxisHints::new_x().placement(VPlacement::Top));
    }
    let mut y_axes = Vec::new();
    if panel.show_y_label {
        y_axes.push(
            AxisHints::new_y()
                .label(panel.y_name.clone())
                .placement(HPlacement::Right),
        );
    }

    let mut plot = Plot::new(("trellis_panel", panel.ix, panel.iy))
        .width(size.x)
        .height(size.y)
        .custom_x_axes(x_axes)
        .custom_y_axes(y_axes)
        .show_x(false)
        .show_y(false)
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true);

    if let Some(extent) = panel.extent {
        plot = plot
            .include_x(extent.x_min)
            .include_x(extent.x_max)
            .include_y(extent.y_min)
            .include_y(extent.y_max);
    }

    plot.show(ui, |plot_ui| {
        if let (Some(texture), Some(image)) = (texture, panel.image.as_ref()) {
            // placed by its own lattice so cells sit under their samples
            let (xs, ys) = (image.xs(), image.ys());
            if let (Some(&x_min), Some(&x_max), Some(&y_max), Some(&y_min)) =
                (xs.first(), xs.last(), ys.first(), ys.last())
            {
                let center = PlotPoint::new((x_min + x_max) / 2.0, (y_min + y_max) / 2.0);
                let size = egui::vec2((x_max - x_min) as f32, (y_max - y_min) as f32);
                plot_ui.image(PlotImage::new(texture.id(), center, size));
            }
        }

        if show_scatter {
            // One item per colour keeps the item count small.
            let mut by_color: BTreeMap<[u8; 4], Vec<[f64; 2]>> = BTreeMap::new();
            let data = &panel.data;
            for ((&x, &y), &v) in data.x.iter().zip(&data.y).zip(&data.minima) {
                let color = value_color(colormap, scale, v).unwrap_or(Color32::GRAY);
                by_color.entry(color.to_array()).or_default().push([x, y]);
            }

            let outline: Vec<[f64; 2]> = by_color.values().flatten().copied().collect();
            plot_ui.points(
                Points::new(outline)
                    .shape(MarkerShape::Circle)
                    .radius(marker_radius + 1.0)
                    .color(Color32::BLACK)
                    .filled(true),
            );

            for ([r, g, b, a], points) in by_color {
                plot_ui.points(
                    Points::new(points)
                        .shape(MarkerShape::Circle)
                        .radius(marker_radius)
                        .color(Color32::from_rgba_unmultiplied(r, g, b, a))
                        .filled(true),
                );
            }
        }
    });
}

/// RGBA bytes for a row-major grid; cells without an estimate stay clear.
fn image_pixels(values: &[f64], colormap: Colormap, scale: &ColorScale) -> Vec<u8> {
    values
        .iter()
        .flat_map(|&v| match colormap.map(scale, v) {
            Some([r, g, b]) => [r, g, b, 255],
            None => [0, 0, 0, 0],
        })
        .collect()
}
