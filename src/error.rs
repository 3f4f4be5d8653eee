use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

/// Everything that stops a trellis from being built.
///
/// All variants are fatal: inputs are in-memory and deterministic, so a
/// retry would fail the same way.
#[derive(Debug, Error)]
pub enum TrellisError {
    /// The source file is missing, unreadable or malformed.
    #[error("failed to load \"{}\": {source:#}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("objective column \"{0}\" does not occur in the data")]
    MissingObjective(String),

    #[error("there should be at least 2 parameters to compare, found {0}")]
    TooFewParameters(usize),

    #[error("\"{0}\" does not occur as a parameter in the data")]
    UnknownParameter(String),

    #[error("vmin ({vmin}) should be lower than or equal to vmax ({vmax})")]
    InvalidColorScale { vmin: f64, vmax: f64 },

    /// No finite objective value was available to derive a bound from.
    #[error("cannot determine {0}: no objective values in any panel")]
    UnresolvedColorScale(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = TrellisError> = std::result::Result<T, E>;

// ---------------------------------------------------------------------------
// Local (per-panel) condition
// ---------------------------------------------------------------------------

/// Interpolation is not defined for a panel's observations.
///
/// This never aborts a build: the affected panel is kept without an image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationUndefined {
    #[error("{axis} values have zero range")]
    ZeroRange { axis: &'static str },

    #[error("need at least {needed} observations, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("observations are collinear")]
    Collinear,
}
