//! Conversion of a model input into a dense feature matrix.

use super::{ModelError, ModelInput};
use crate::scalar::Scalar;

/// Resolve which table column feeds each model feature.
fn column_order(
    input: ModelInput<'_>,
    feature_names: Option<&[String]>,
    n_features: usize,
) -> Result<Vec<usize>, ModelError> {
    let table = input.table();

    if let (ModelInput::Named(_), Some(names)) = (input, feature_names) {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| table.column_index(n).is_none())
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ModelError::MissingFeatures(missing));
        }

        let unexpected: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| !names.contains(c))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(ModelError::UnexpectedFeatures(unexpected));
        }

        return Ok(names
            .iter()
            .filter_map(|n| table.column_index(n))
            .collect());
    }

    if table.n_columns() != n_features {
        return Err(ModelError::FeatureCount {
            expected: n_features,
            got: table.n_columns(),
        });
    }
    Ok((0..n_features).collect())
}

fn cell_to_f64(cell: &Scalar, row: usize, column: usize) -> Result<f64, ModelError> {
    let value = match cell {
        #[allow(clippy::cast_precision_loss)]
        Scalar::Int(v) => *v as f64,
        Scalar::Float(v) => *v,
        Scalar::Bool(b) => f64::from(u8::from(*b)),
        Scalar::Str(s) => s.trim().parse::<f64>().map_err(|_| ModelError::NonNumeric {
            row,
            column,
            value: format!("'{s}'"),
        })?,
        Scalar::Null => return Err(ModelError::MissingValue { row, column }),
    };
    if value.is_nan() {
        return Err(ModelError::MissingValue { row, column });
    }
    if value.is_infinite() {
        return Err(ModelError::NonFinite { row, column });
    }
    Ok(value)
}

/// Build the `rows x n_features` matrix a model scores.
pub(crate) fn feature_matrix(
    input: ModelInput<'_>,
    feature_names: Option<&[String]>,
    n_features: usize,
) -> Result<Vec<Vec<f64>>, ModelError> {
    let order = column_order(input, feature_names, n_features)?;

    input
        .table()
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| {
            order
                .iter()
                .map(|&c| cell_to_f64(&row[c], r, c))
                .collect::<Result<Vec<f64>, ModelError>>()
        })
        .collect()
}
