pub use serde::{Serialize, Deserialize};

pub use ndarray::*;
pub use ndarray_rand::RandomExt;
pub use ndarray_rand::rand_distr::Uniform;

pub use crate::models::Network;
pub use crate::error::*;

// Internal re-exports
pub use crate::core::{
    Activation,
    ConstantInitializer,
    Topology,
    UniformInitializer,
    Unit,
    WeightInitializer,
    WeightStore,
};
pub use crate::persistence::{
    BinaryFileReader,
    BinaryPersistence,
    InputReader,
    Persistence,
    TextFilePersistence,
    TextFileReader,
};
