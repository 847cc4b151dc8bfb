use crate::prelude::*;
use csv::{ReaderBuilder, Writer};
use std::path::Path;

/// Reads a headerless CSV file where every record holds `inputs` input values
/// followed by `targets` target values. With `targets == 0` the second array
/// has no columns.
pub fn read_samples<P: AsRef<Path>>(
    path: P,
    inputs: usize,
    targets: usize,
) -> Result<(Array2<f64>, Array2<f64>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_path(path)?;
    let width = inputs + targets;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut rows = 0;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != width {
            return Err(NNError::InvalidState(format!(
                "record {} has {} fields, expected {}",
                i + 1,
                record.len(),
                width
            )));
        }
        for (j, field) in record.iter().enumerate() {
            let value: f64 = field.parse().map_err(|_| {
                NNError::InvalidState(format!(
                    "record {} field {}: '{}' is not a number",
                    i + 1,
                    j + 1,
                    field
                ))
            })?;
            if j < inputs {
                x.push(value);
            } else {
                y.push(value);
            }
        }
        rows += 1;
    }

    Ok((
        Array2::from_shape_vec((rows, inputs), x)?,
        Array2::from_shape_vec((rows, targets), y)?,
    ))
}

pub fn write_predictions<P: AsRef<Path>>(predictions: &Array2<f64>, path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;

    for row in predictions.outer_iter() {
        let record: Vec<String> = row.iter().map(|x| x.to_string()).collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
