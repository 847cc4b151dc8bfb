use crate::persistence::{InputReader, Persistence};
use crate::prelude::*;
use log::debug;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Weight snapshots encoded with bincode.
#[derive(Debug, Clone)]
pub struct BinaryPersistence {
    path: PathBuf,
}

impl BinaryPersistence {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, topology: Topology, initializer: &dyn WeightInitializer) -> Result<Network> {
        let mut reader = BinaryFileReader::open(&self.path)?;
        Network::new(topology, Some(&mut reader), initializer)
    }
}

impl Persistence for BinaryPersistence {
    fn save(&self, network: &Network) -> Result<()> {
        let encoded: Vec<u8> = bincode::serialize(&network.cloned_weights())?;

        File::create(&self.path)?.write_all(&encoded)?;
        debug!("saved {} byte snapshot to {}", encoded.len(), self.path.display());
        Ok(())
    }
}

pub struct BinaryFileReader {
    exists: bool,
    layers: VecDeque<Array2<f64>>,
    taken: usize,
}

impl BinaryFileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("snapshot {} does not exist", path.display());
            return Ok(Self {
                exists: false,
                layers: VecDeque::new(),
                taken: 0,
            });
        }
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let weights: WeightStore = bincode::deserialize(bytes)?;
        Ok(Self {
            exists: true,
            layers: weights.into_layers().into(),
            taken: 0,
        })
    }
}

impl InputReader for BinaryFileReader {
    fn source_exists(&self) -> bool {
        self.exists
    }

    fn read_matrix(&mut self, rows: usize, cols: usize) -> Result<Array2<f64>> {
        let layer = self.layers.pop_front().ok_or_else(|| {
            NNError::InvalidConfiguration(format!(
                "the snapshot holds only {} matrices",
                self.taken
            ))
        })?;
        if layer.dim() != (rows, cols) {
            return Err(NNError::InvalidConfiguration(format!(
                "snapshot matrix {} is {}x{}, expected {}x{}",
                self.taken,
                layer.nrows(),
                layer.ncols(),
                rows,
                cols
            )));
        }
        self.taken += 1;
        Ok(layer)
    }

    fn close(&mut self) -> Result<()> {
        self.layers.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology;

    fn topology() -> Topology {
        topology!(
            input 4,
            dense 3 => Activation::Tanh,
            dense 2 => Activation::Sigmoid
        )
        .unwrap()
    }

    #[test]
    fn test_snapshot_round_trip() {
        let network = Network::new(topology(), None, &UniformInitializer::default().seeded(4)).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let persistence = BinaryPersistence::new(dir.path().join("weights.bin"));
        persistence.save(&network).unwrap();

        let loaded = persistence.load(topology(), &ConstantInitializer(0.0)).unwrap();
        assert_eq!(loaded, network);
    }

    #[test]
    fn test_snapshot_with_other_shape_is_rejected() {
        let other = topology!(
            input 3,
            dense 3 => Activation::Tanh,
            dense 2 => Activation::Sigmoid
        )
        .unwrap();
        let network = Network::new(other, None, &ConstantInitializer(1.0)).unwrap();
        let bytes = bincode::serialize(network.weights()).unwrap();

        let mut reader = BinaryFileReader::from_bytes(&bytes).unwrap();
        let err = Network::new(topology(), Some(&mut reader), &ConstantInitializer(0.0)).unwrap_err();
        match err {
            NNError::InvalidConfiguration(msg) => assert!(msg.contains("expected 5x3"), "{msg}"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let reader = BinaryFileReader::open(dir.path().join("none.bin")).unwrap();
        assert!(!reader.source_exists());
    }

    #[test]
    fn test_garbage_snapshot() {
        let err = BinaryFileReader::from_bytes(&[1, 2, 3]).err().unwrap();
        assert!(matches!(err, NNError::SerializationError(_)));
    }
}
