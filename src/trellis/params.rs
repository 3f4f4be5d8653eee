use crate::data::Dataset;
use crate::error::{Result, TrellisError};

/// Decide which parameters are compared, and in what order.
///
/// Without an explicit list every non-objective column is used, sorted by
/// name. An explicit list keeps the caller's order but every entry has to
/// be a non-objective column of `dataset`.
pub fn select_parameters(dataset: &Dataset, explicit: Option<&[String]>) -> Result<Vec<String>> {
    let mut from_data: Vec<String> = dataset.parameter_columns().map(str::to_string).collect();
    from_data.sort();

    let selected = match explicit {
        None => from_data,
        Some(names) => {
            if let Some(unknown) = names.iter().find(|n| !from_data.contains(n)) {
                return Err(TrellisError::UnknownParameter(unknown.clone()));
            }
            if let Some((i, dup)) = names
                .iter()
                .enumerate()
                .find(|&(i, n)| names[..i].contains(n))
            {
                return Err(TrellisError::InvalidConfig(format!(
                    "parameter \"{dup}\" is listed twice (position {i})"
                )));
            }
            names.to_vec()
        }
    };

    if selected.len() < 2 {
        return Err(TrellisError::TooFewParameters(selected.len()));
    }

    log::info!("Comparing parameters {selected:?}");
    Ok(selected)
}
