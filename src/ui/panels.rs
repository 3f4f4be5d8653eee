use eframe::egui::{self, Color32, RichText, Ui};
use trellis_view::trellis::interp::InterpMethod;

use super::value_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(trellis)) = (&state.dataset, &state.trellis) {
            if let Some(name) = state.source.as_deref().and_then(|p| p.file_name()) {
                ui.strong(name.to_string_lossy().into_owned());
            }
            ui.label(format!(
                "{} records, {} parameters, {} panels",
                ds.len(),
                trellis.parameters().len(),
                trellis.panels().len()
            ));
        }

        ui.separator();

        let mut changed = false;
        let cfg = &mut state.config;
        for (flag, label) in [
            (&mut cfg.show_image, "Image"),
            (&mut cfg.show_scatter, "Scatter"),
            (&mut cfg.show_diagonal, "Diagonal"),
        ] {
            if ui.selectable_label(*flag, label).clicked() {
                *flag = !*flag;
                changed = true;
            }
        }

        egui::ComboBox::from_id_salt("interp_method")
            .selected_text(format!("{:?}", cfg.interp_method))
            .show_ui(ui, |ui: &mut Ui| {
                for method in [InterpMethod::Nearest, InterpMethod::Linear, InterpMethod::Cubic] {
                    changed |= ui
                        .selectable_value(&mut cfg.interp_method, method, format!("{method:?}"))
                        .changed();
                }
            });

        if changed {
            state.rebuild();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Colour scale
// ---------------------------------------------------------------------------

/// Render the shared colour scale as a gradient strip with its limits.
pub fn color_scale_bar(ui: &mut Ui, state: &AppState) {
    let Some(trellis) = &state.trellis else {
        return;
    };
    let scale = trellis.scale();
    let colormap = state.config.colormap;

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{} ", state.config.objective));
        ui.label(format!("{:.4}", scale.vmin));

        let steps = 64;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(256.0, 12.0), egui::Sense::hover());
        let step_w = rect.width() / steps as f32;
        for i in 0..steps {
            let t = i as f64 / (steps - 1) as f64;
            let v = scale.vmin + t * (scale.vmax - scale.vmin);
            let color = value_color(colormap, &scale, v).unwrap_or(Color32::GRAY);
            let min = rect.min + egui::vec2(i as f32 * step_w, 0.0);
            ui.painter().rect_filled(
                egui::Rect::from_min_size(min, egui::vec2(step_w, rect.height())),
                0.0,
                color,
            );
        }

        ui.label(format!("{:.4}", scale.vmax));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tuning results")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}
