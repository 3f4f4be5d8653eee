mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::TrellisApp;
use clap::Parser;
use eframe::egui;
use state::AppState;
use trellis_view::trellis::interp::InterpMethod;
use trellis_view::{Colormap, TrellisConfig};

#[derive(Parser)]
#[command(name = "trellis-view")]
#[command(version, about = "Pairwise parameter trellis for tuning results", long_about = None)]
struct Cli {
    /// Tuning results (.json, .csv or .parquet)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// JSON file with trellis options; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Column to minimize
    #[arg(short, long, value_name = "NAME")]
    objective: Option<String>,

    /// Parameters to compare, in order
    #[arg(short, long, value_name = "A,B,...", value_delimiter = ',')]
    parameters: Option<Vec<String>>,

    /// Reserve the diagonal row/column in the layout
    #[arg(long)]
    show_diagonal: bool,

    /// Skip the interpolated images
    #[arg(long)]
    no_image: bool,

    /// Skip the scatter points
    #[arg(long)]
    no_scatter: bool,

    /// Image lattice resolution
    #[arg(long, value_name = "N")]
    nbins: Option<usize>,

    /// Image interpolation method
    #[arg(long, value_enum, value_name = "METHOD")]
    interp: Option<InterpMethod>,

    #[arg(long, value_enum)]
    colormap: Option<Colormap>,

    /// Lower colour limit (default: lowest minimum in any panel)
    #[arg(long, allow_negative_numbers = true)]
    vmin: Option<f64>,

    /// Upper colour limit (default: highest minimum in any panel)
    #[arg(long, allow_negative_numbers = true)]
    vmax: Option<f64>,

    /// Log progress (unless RUST_LOG says otherwise)
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn trellis_config(&self) -> anyhow::Result<TrellisConfig> {
        let mut config = match &self.config {
            Some(path) => TrellisConfig::from_json_file(path)?,
            None => TrellisConfig::default(),
        };

        if let Some(objective) = &self.objective {
            config.objective = objective.clone();
        }
        if let Some(parameters) = &self.parameters {
            config.parameter_names = Some(parameters.clone());
        }
        config.show_diagonal |= self.show_diagonal;
        config.show_image &= !self.no_image;
        config.show_scatter &= !self.no_scatter;
        if let Some(n) = self.nbins {
            config.nbins_image = n;
        }
        if let Some(method) = self.interp {
            config.interp_method = method;
        }
        if let Some(colormap) = self.colormap {
            config.colormap = colormap;
        }
        config.vmin = self.vmin.or(config.vmin);
        config.vmax = self.vmax.or(config.vmax);

        config.validate().context("checking options")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut state = AppState::new(cli.trellis_config()?);

    // A file named on the command line must load; there is nothing to show otherwise.
    if let Some(path) = &cli.input {
        let dataset = trellis_view::data::load_file(path, &state.config.objective)?;
        state.source = Some(path.clone());
        state.set_dataset(dataset);
        if state.trellis.is_none() {
            anyhow::bail!(state
                .status_message
                .take()
                .unwrap_or_else(|| "failed to build trellis".to_string()));
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 1000.0])
            .with_min_inner_size([400.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trellis View",
        options,
        Box::new(move |_cc| Ok(Box::new(TrellisApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
