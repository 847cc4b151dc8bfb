use crate::prelude::*;
use crate::rand_array;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Supplies the weights of a network that has no persisted source.
pub trait WeightInitializer {
    fn create(&self, topology: &Topology) -> WeightStore;
}

/// Uniform random weights in `[low, high)`.
///
/// Unseeded initializers draw from the thread RNG; a seed makes every `create`
/// call return the same store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct UniformInitializer {
    pub low: f64,
    pub high: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl UniformInitializer {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high, seed: None }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for UniformInitializer {
    fn default() -> Self {
        Self::new(-0.5, 0.5)
    }
}

impl WeightInitializer for UniformInitializer {
    fn create(&self, topology: &Topology) -> WeightStore {
        let layers = match self.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                topology
                    .shapes()
                    .map(|(rows, cols)| rand_array!(rows, cols; self.low, self.high; &mut rng))
                    .collect()
            }
            None => topology
                .shapes()
                .map(|(rows, cols)| rand_array!(rows, cols; self.low, self.high))
                .collect(),
        };
        WeightStore::new(layers)
    }
}

/// Every weight set to the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantInitializer(pub f64);

impl WeightInitializer for ConstantInitializer {
    fn create(&self, topology: &Topology) -> WeightStore {
        WeightStore::new(
            topology
                .shapes()
                .map(|shape| Array2::from_elem(shape, self.0))
                .collect(),
        )
    }
}

impl<F> WeightInitializer for F
where
    F: Fn(&Topology) -> WeightStore,
{
    fn create(&self, topology: &Topology) -> WeightStore {
        self(topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology() -> Topology {
        Topology::new(vec![
            Unit::input(3),
            Unit::new(4, Activation::Tanh),
            Unit::new(2, Activation::Sigmoid),
        ])
        .unwrap()
    }

    #[test]
    fn test_uniform_shapes_and_bounds() {
        let weights = UniformInitializer::default().create(&topology());
        assert!(weights.validate(&topology()).is_ok());
        for layer in weights.layers() {
            assert!(layer.iter().all(|&w| (-0.5..0.5).contains(&w)));
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let init = UniformInitializer::new(-1.0, 1.0).seeded(7);
        assert_eq!(init.create(&topology()), init.create(&topology()));

        let other = UniformInitializer::new(-1.0, 1.0).seeded(8);
        assert_ne!(init.create(&topology()), other.create(&topology()));
    }

    #[test]
    fn test_constant() {
        let weights = ConstantInitializer(0.25).create(&topology());
        assert!(weights.validate(&topology()).is_ok());
        assert!(weights.layers().iter().flatten().all(|&w| w == 0.25));
    }

    #[test]
    fn test_closure_initializer() {
        let init = |t: &Topology| WeightStore::zeros(t);
        assert_eq!(init.create(&topology()), WeightStore::zeros(&topology()));
    }
}
