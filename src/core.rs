// src/core.rs
pub mod activations;
pub mod initializers;
pub mod layers;
pub mod losses;
pub mod weights;

// Re-export commonly used items
pub use activations::Activation;
pub use initializers::{ConstantInitializer, UniformInitializer, WeightInitializer};
pub use layers::{Topology, Unit};
pub use losses::{criteria, squared_error};
pub use weights::WeightStore;
