use crate::prelude::*;

/// One layer of the perceptron: how many real units it has (the bias unit is
/// not counted) and the activation they share.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub size: usize,
    #[serde(default)]
    pub activation: Activation,
}

impl Unit {
    pub fn new(size: usize, activation: Activation) -> Self {
        Self { size, activation }
    }

    /// Input layers pass raw values through unchanged.
    pub fn input(size: usize) -> Self {
        Self::new(size, Activation::Identity)
    }
}

/// Ordered layers of a network, input first.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Topology {
    units: Vec<Unit>,
}

impl Topology {
    pub fn new(units: Vec<Unit>) -> Result<Self> {
        if units.len() < 3 {
            return Err(NNError::InvalidConfiguration(format!(
                "a multilayer perceptron needs at least 3 layers (got {})",
                units.len()
            )));
        }
        if units[0].activation != Activation::Identity {
            return Err(NNError::InvalidConfiguration(format!(
                "the input layer must use Identity activation (got {})",
                units[0].activation
            )));
        }
        if let Some(i) = units.iter().position(|u| u.size == 0) {
            return Err(NNError::InvalidConfiguration(format!(
                "layer {} has no units",
                i
            )));
        }
        Ok(Self { units })
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.units[0].size
    }

    pub fn output_size(&self) -> usize {
        self.units[self.units.len() - 1].size
    }

    /// Number of weight matrices, one per layer transition.
    pub fn transitions(&self) -> usize {
        self.units.len() - 1
    }

    /// Shape of the matrix feeding layer `i + 1`: a bias row followed by one row
    /// per unit of layer `i`, and one column per unit of layer `i + 1`.
    pub fn layer_shape(&self, i: usize) -> (usize, usize) {
        (self.units[i].size + 1, self.units[i + 1].size)
    }

    pub fn shapes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.transitions()).map(move |i| self.layer_shape(i))
    }

    pub fn parameter_count(&self) -> usize {
        self.shapes().map(|(rows, cols)| rows * cols).sum()
    }
}

impl<'de> Deserialize<'de> for Topology {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let units = Vec::<Unit>::deserialize(deserializer)?;
        Topology::new(units).map_err(serde::de::Error::custom)
    }
}
