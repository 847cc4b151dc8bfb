use crate::prelude::*;

/// Weight matrices of a network, one per layer transition.
///
/// Matrix `i` has a bias row at index 0 followed by one row per unit of layer
/// `i`, and one column per unit of layer `i + 1`. `Clone` is a deep copy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct WeightStore {
    layers: Vec<Array2<f64>>,
}

impl WeightStore {
    pub fn new(layers: Vec<Array2<f64>>) -> Self {
        Self { layers }
    }

    /// Builds matrices from nested rows, rejecting ragged or empty ones.
    pub fn from_rows(layers: Vec<Vec<Vec<f64>>>) -> Result<Self> {
        let mut matrices = Vec::with_capacity(layers.len());
        for (i, rows) in layers.into_iter().enumerate() {
            let width = match rows.first() {
                Some(row) => row.len(),
                None => {
                    return Err(NNError::InvalidConfiguration(format!(
                        "layer {} has no rows",
                        i
                    )))
                }
            };
            if let Some(j) = rows.iter().position(|row| row.len() != width) {
                return Err(NNError::InvalidConfiguration(format!(
                    "layer {} row {} has {} columns, expected {}",
                    i,
                    j,
                    rows[j].len(),
                    width
                )));
            }
            let height = rows.len();
            let flat: Vec<f64> = rows.into_iter().flatten().collect();
            matrices.push(Array2::from_shape_vec((height, width), flat)?);
        }
        Ok(Self::new(matrices))
    }

    pub fn zeros(topology: &Topology) -> Self {
        Self::new(topology.shapes().map(|shape| Array2::zeros(shape)).collect())
    }

    pub fn layers(&self) -> &[Array2<f64>] {
        &self.layers
    }

    pub fn layer(&self, i: usize) -> Option<&Array2<f64>> {
        self.layers.get(i)
    }

    pub fn layer_mut(&mut self, i: usize) -> Option<&mut Array2<f64>> {
        self.layers.get_mut(i)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn into_layers(self) -> Vec<Array2<f64>> {
        self.layers
    }

    pub fn validate(&self, topology: &Topology) -> Result<()> {
        if self.layers.len() != topology.transitions() {
            return Err(NNError::InvalidConfiguration(format!(
                "the layers count does not match (units = {}, layers = {})",
                topology.len(),
                self.layers.len()
            )));
        }
        for (i, (layer, (rows, cols))) in self.layers.iter().zip(topology.shapes()).enumerate() {
            if layer.nrows() != rows {
                return Err(NNError::InvalidConfiguration(format!(
                    "the units count does not match at layer {} (expected {} rows, got {})",
                    i,
                    rows,
                    layer.nrows()
                )));
            }
            if layer.ncols() != cols {
                return Err(NNError::InvalidConfiguration(format!(
                    "the units count does not match at layer {} (expected {} columns, got {})",
                    i,
                    cols,
                    layer.ncols()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> Topology {
        Topology::new(vec![
            Unit::input(2),
            Unit::new(3, Activation::Sigmoid),
            Unit::new(1, Activation::Sigmoid),
        ])
        .unwrap()
    }

    #[test]
    fn test_zeros_matches_topology() {
        let weights = WeightStore::zeros(&topology());
        assert_eq!(weights.len(), 2);
        assert_eq!(weights.layers()[0].dim(), (3, 3));
        assert_eq!(weights.layers()[1].dim(), (4, 1));
        assert!(weights.validate(&topology()).is_ok());
    }

    #[test]
    fn test_clone_is_deep() {
        let original = WeightStore::zeros(&topology());
        let mut copy = original.clone();
        copy.layer_mut(0).unwrap()[[1, 2]] = 9.0;
        assert_eq!(original.layers()[0][[1, 2]], 0.0);

        let mut original = original;
        original.layer_mut(1).unwrap()[[0, 0]] = -4.0;
        assert_eq!(copy.layers()[1][[0, 0]], 0.0);
        assert_eq!(copy.layers()[0][[1, 2]], 9.0);
    }

    #[test]
    fn test_validate_reports_layer_count() {
        let mut layers = WeightStore::zeros(&topology()).into_layers();
        layers.pop();
        let err = WeightStore::new(layers).validate(&topology()).unwrap_err();
        match err {
            NNError::InvalidConfiguration(msg) => assert!(msg.contains("layers = 1")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_row_mismatch() {
        let mut layers = WeightStore::zeros(&topology()).into_layers();
        layers[1] = Array2::zeros((3, 1));
        let err = WeightStore::new(layers).validate(&topology()).unwrap_err();
        match err {
            NNError::InvalidConfiguration(msg) => {
                assert!(msg.contains("layer 1"));
                assert!(msg.contains("expected 4 rows, got 3"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_validate_reports_column_mismatch() {
        let mut layers = WeightStore::zeros(&topology()).into_layers();
        layers[0] = Array2::zeros((3, 2));
        let err = WeightStore::new(layers).validate(&topology()).unwrap_err();
        assert!(matches!(err, NNError::InvalidConfiguration(msg) if msg.contains("columns")));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let err = WeightStore::from_rows(vec![vec![vec![1.0, 2.0], vec![3.0]]]).unwrap_err();
        match err {
            NNError::InvalidConfiguration(msg) => assert!(msg.contains("row 1")),
            other => panic!("unexpected error {other:?}"),
        }
        assert!(WeightStore::from_rows(vec![vec![]]).is_err());
    }

    #[test]
    fn test_from_rows_keeps_row_major_order() {
        let weights = WeightStore::from_rows(vec![vec![vec![1.0, 2.0], vec![3.0, 4.0]]]).unwrap();
        assert_eq!(weights.layers()[0], array![[1.0, 2.0], [3.0, 4.0]]);
    }
}
