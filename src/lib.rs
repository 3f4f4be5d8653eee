//! Pairwise parameter trellis for tuning results.
//!
//! For every pair of tunable parameters the trellis keeps the best
//! (lowest) objective value seen at each distinct value combination,
//! optionally interpolates those minima onto a regular lattice, lays the
//! pair out as a panel in a lower-triangular grid, and shares one colour
//! scale across all panels.
//!
//! ```no_run
//! use std::path::Path;
//! use trellis_view::{Trellis, TrellisConfig};
//!
//! let trellis = Trellis::from_file(Path::new("results.json"), TrellisConfig::default())?;
//! for panel in trellis.panels() {
//!     println!("{} vs {}: {} points", panel.x_name, panel.y_name, panel.data.len());
//! }
//! # Ok::<(), trellis_view::TrellisError>(())
//! ```

pub mod colormap;
pub mod config;
pub mod data;
pub mod error;
pub mod trellis;

pub use colormap::Colormap;
pub use config::TrellisConfig;
pub use data::Dataset;
pub use error::{InterpolationUndefined, TrellisError};
pub use trellis::scale::ColorScale;
pub use trellis::{Panel, Trellis};
