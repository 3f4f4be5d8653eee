use crate::error::{Result, TrellisError};

// ---------------------------------------------------------------------------
// Dataset – the complete loaded tuning result
// ---------------------------------------------------------------------------

/// An in-memory table of named numeric columns, one of which is the
/// objective (lower is better).
///
/// Values are stored column-major. The dataset is read-only once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names in source order.
    columns: Vec<String>,
    /// One vector per column, all of the same length.
    values: Vec<Vec<f64>>,
    /// Index of the objective column in `columns`.
    objective: usize,
}

impl Dataset {
    /// Build a dataset from `(name, values)` columns.
    ///
    /// Fails when the objective column is absent or the columns do not all
    /// have the same length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>, objective: &str) -> Result<Self> {
        let objective_idx = columns
            .iter()
            .position(|(name, _)| name == objective)
            .ok_or_else(|| TrellisError::MissingObjective(objective.to_string()))?;

        if let Some((first, rest)) = columns.split_first() {
            let n_rows = first.1.len();
            if let Some((name, vals)) = rest.iter().find(|(_, v)| v.len() != n_rows) {
                return Err(TrellisError::InvalidConfig(format!(
                    "column \"{name}\" has {} rows but \"{}\" has {n_rows}",
                    vals.len(),
                    first.0
                )));
            }
        }

        let (columns, values) = columns.into_iter().unzip();
        Ok(Dataset {
            columns,
            values,
            objective: objective_idx,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All column names in source order, objective included.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Name of the objective column.
    pub fn objective_name(&self) -> &str {
        &self.columns[self.objective]
    }

    pub fn objective_values(&self) -> &[f64] {
        &self.values[self.objective]
    }

    /// Values of the named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .position(|c| c == name)
            .map(|i| self.values[i].as_slice())
    }

    /// Every column except the objective, in source order.
    pub fn parameter_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.objective)
            .map(|(_, name)| name.as_str())
    }
}
