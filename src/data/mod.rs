//! Data layer: the tuning-result table and how it is read.
//!
//! Architecture:
//! ```text
//!  .json / .csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → named numeric columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset   │  column-major values, objective column checked
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;

pub use loader::load_file;
pub use model::Dataset;
