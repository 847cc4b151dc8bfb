//! Line-oriented weight files.
//!
//! ```text
//! #rmlp config start.
//! #layer: 0
//! <row 0 of layer 0, space separated>
//! <row 1 of layer 0>
//! #layer: 1
//! ...
//! #endofile.
//! ```
//!
//! Lines starting with `#` and blank lines are skipped when reading. The file
//! carries no dimensions; the reader takes them from the topology.

use crate::persistence::{InputReader, Persistence};
use crate::prelude::*;
use log::debug;
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "#rmlp config start.";
pub const FOOTER: &str = "#endofile.";

pub struct TextFileReader<R = BufReader<File>> {
    exists: bool,
    source: Option<R>,
    tokens: VecDeque<String>,
    line: usize,
}

impl TextFileReader {
    /// A missing file is not an error: the reader reports no source and the
    /// network falls back to its initializer.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("weights file {} does not exist", path.display());
            return Ok(Self {
                exists: false,
                source: None,
                tokens: VecDeque::new(),
                line: 0,
            });
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> TextFileReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            exists: true,
            source: Some(reader),
            tokens: VecDeque::new(),
            line: 0,
        }
    }

    fn next_value(&mut self) -> Result<f64> {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return token.parse::<f64>().map_err(|e| {
                    NNError::InvalidConfiguration(format!(
                        "line {}: cannot read '{}' as a number ({})",
                        self.line, token, e
                    ))
                });
            }
            let reader = self.source.as_mut().ok_or_else(|| {
                NNError::InvalidConfiguration("the weights source is closed".to_string())
            })?;
            let mut buf = String::new();
            if reader.read_line(&mut buf)? == 0 {
                return Err(NNError::InvalidConfiguration(format!(
                    "unexpected end of weights after line {}",
                    self.line
                )));
            }
            self.line += 1;
            let line = buf.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.tokens.extend(line.split_whitespace().map(str::to_owned));
        }
    }
}

impl<R: BufRead> InputReader for TextFileReader<R> {
    fn source_exists(&self) -> bool {
        self.exists
    }

    fn read_matrix(&mut self, rows: usize, cols: usize) -> Result<Array2<f64>> {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let value = self.next_value().map_err(|e| match e {
                    NNError::InvalidConfiguration(msg) => NNError::InvalidConfiguration(format!(
                        "row {} column {} of a {}x{} matrix: {}",
                        i, j, rows, cols, msg
                    )),
                    other => other,
                })?;
                values.push(value);
            }
        }
        Ok(Array2::from_shape_vec((rows, cols), values)?)
    }

    fn close(&mut self) -> Result<()> {
        self.source = None;
        self.tokens.clear();
        Ok(())
    }
}

/// Writes `weights` in the text format. Numbers use the shortest
/// representation that parses back to the same `f64`.
pub fn write_weights<W: Write>(writer: &mut W, weights: &WeightStore) -> Result<()> {
    writeln!(writer, "{}", HEADER)?;
    for (i, layer) in weights.layers().iter().enumerate() {
        writeln!(writer, "#layer: {}", i)?;
        for row in layer.outer_iter() {
            let line: Vec<String> = row.iter().map(|w| w.to_string()).collect();
            writeln!(writer, "{}", line.join(" "))?;
        }
    }
    writeln!(writer, "{}", FOOTER)?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct TextFilePersistence {
    path: PathBuf,
}

impl TextFilePersistence {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Builds a network from this file, or from `initializer` when the file
    /// does not exist yet.
    pub fn load(&self, topology: Topology, initializer: &dyn WeightInitializer) -> Result<Network> {
        let mut reader = TextFileReader::open(&self.path)?;
        Network::new(topology, Some(&mut reader), initializer)
    }
}

impl Persistence for TextFilePersistence {
    fn save(&self, network: &Network) -> Result<()> {
        let weights = network.cloned_weights();
        let mut writer = BufWriter::new(File::create(&self.path)?);
        write_weights(&mut writer, &weights)?;
        writer.flush()?;
        debug!("saved {} weight matrices to {}", weights.len(), self.path.display());
        Ok(())
    }
}
