use crate::prelude::*;

/// `Σ (y_hat - y)^2` over one sample.
pub fn squared_error(y_hat: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
    if y_hat.len() != y.len() {
        return Err(NNError::InvalidState(format!(
            "prediction has {} values but target has {}",
            y_hat.len(),
            y.len()
        )));
    }
    Ok(y_hat
        .iter()
        .zip(y.iter())
        .map(|(p, t)| (p - t) * (p - t))
        .sum())
}

/// Half the squared error, the loss whose gradient backpropagation follows.
pub fn criteria(y_hat: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<f64> {
    Ok(0.5 * squared_error(y_hat, y)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_squared_error() {
        let y_hat = array![1.0, 2.0, 3.0];
        let y = array![1.5, 2.0, 1.0];
        assert_eq!(squared_error(y_hat.view(), y.view()).unwrap(), 0.25 + 4.0);
        assert_eq!(criteria(y_hat.view(), y.view()).unwrap(), 0.5 * 4.25);
    }

    #[test]
    fn test_shape_mismatch() {
        let err = squared_error(array![1.0].view(), array![1.0, 2.0].view()).unwrap_err();
        assert!(matches!(err, NNError::InvalidState(_)));
    }
}
