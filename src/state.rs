use std::path::{Path, PathBuf};

use eframe::egui::TextureHandle;
use trellis_view::{Dataset, Trellis, TrellisConfig};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Dataset>,

    /// Options the trellis is built with; toggles in the UI edit this.
    pub config: TrellisConfig,

    /// Prepared panels for the current dataset and config.
    pub trellis: Option<Trellis>,

    /// One image texture per panel, uploaded lazily by the plot.
    pub textures: Vec<Option<TextureHandle>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: TrellisConfig) -> Self {
        Self {
            source: None,
            dataset: None,
            config,
            trellis: None,
            textures: Vec::new(),
            status_message: None,
        }
    }

    /// Load a file and build its trellis; failures end up in the status line.
    pub fn open(&mut self, path: &Path) {
        match trellis_view::data::load_file(path, &self.config.objective) {
            Ok(dataset) => {
                self.source = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a loaded dataset and build its trellis.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.rebuild();
    }

    /// Rebuild the trellis after a config change.
    pub fn rebuild(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.textures.clear();
        match Trellis::build(dataset, self.config.clone()) {
            Ok(trellis) => {
                self.trellis = Some(trellis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to build trellis: {e}");
                self.trellis = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
