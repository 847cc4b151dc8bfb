pub mod binary;
pub mod text;

pub use binary::{BinaryFileReader, BinaryPersistence};
pub use text::{TextFilePersistence, TextFileReader};

use crate::prelude::*;

/// Source of persisted weights, read one matrix per layer transition.
pub trait InputReader {
    fn source_exists(&self) -> bool;

    /// Next matrix in layer order, `rows × cols`, row-major.
    fn read_matrix(&mut self, rows: usize, cols: usize) -> Result<Array2<f64>>;

    /// Releases the underlying source. Calling it again is harmless.
    fn close(&mut self) -> Result<()>;
}

pub trait Persistence {
    fn save(&self, network: &Network) -> Result<()>;
}
