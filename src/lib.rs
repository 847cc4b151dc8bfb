pub mod config;
pub mod core;
pub mod dataset;
pub mod error;
pub mod models;
pub mod persistence;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{Activation, Topology, Unit, WeightInitializer, WeightStore};
pub use crate::error::{NNError, Result};
pub use crate::models::Network;
pub use crate::persistence::{InputReader, Persistence};
