use std::collections::HashMap;

use crate::data::Dataset;
use crate::error::{Result, TrellisError};

// ---------------------------------------------------------------------------
// Unique points and per-point minima for one parameter pair
// ---------------------------------------------------------------------------

/// Distinct `(x, y)` combinations in first-seen order, with the lowest
/// objective value observed at each of them.
///
/// `x`, `y` and `minima` always have the same length and are index aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairAggregate {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub minima: Vec<f64>,
}

impl PairAggregate {
    pub fn len(&self) -> usize {
        self.minima.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minima.is_empty()
    }

    /// `(min, max)` of the x values, ignoring NaN.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.x)
    }

    /// `(min, max)` of the y values, ignoring NaN.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        finite_range(&self.y)
    }
}

/// Aggregate the named pair of columns of `dataset`.
///
/// Comparing a parameter with itself yields an empty aggregate.
pub fn aggregate(dataset: &Dataset, x_name: &str, y_name: &str) -> Result<PairAggregate> {
    if x_name == y_name {
        return Ok(PairAggregate::default());
    }
    let column = |name: &str| {
        dataset
            .column(name)
            .ok_or_else(|| TrellisError::UnknownParameter(name.to_string()))
    };
    Ok(aggregate_columns(
        column(x_name)?,
        column(y_name)?,
        dataset.objective_values(),
    ))
}

/// Group rows by their exact `(x, y)` value and keep the minimum objective
/// per group.
///
/// NaN objective values are skipped; a group whose objective values are all
/// NaN keeps NaN as its minimum.
pub fn aggregate_columns(x: &[f64], y: &[f64], objective: &[f64]) -> PairAggregate {
    let mut slots: HashMap<(u64, u64), usize> = HashMap::new();
    let mut out = PairAggregate::default();

    for ((&xv, &yv), &obj) in x.iter().zip(y).zip(objective) {
        let slot = *slots.entry((value_key(xv), value_key(yv))).or_insert_with(|| {
            out.x.push(xv);
            out.y.push(yv);
            out.minima.push(f64::NAN);
            out.minima.len() - 1
        });
        // f64::min returns the non-NaN operand, so NaN never wins.
        out.minima[slot] = out.minima[slot].min(obj);
    }

    out
}

/// Hashable identity of a value: -0.0 equals 0.0 and all NaNs are one value.
fn value_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
