use crate::core::losses::{criteria, squared_error};
use crate::prelude::*;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::Arc;

/// Value of the synthetic unit prepended to every non-output layer.
const BIAS: f64 = 1.0;

/// A multilayer perceptron: a topology plus the weights between its layers.
///
/// Networks are immutable. [`Network::backward`] returns a new network and
/// leaves the receiver untouched, so any number of threads may run inference
/// on one instance while another computes its successor.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    topology: Arc<Topology>,
    weights: WeightStore,
}

impl Network {
    /// Loads weights from `source` when it exists, otherwise asks
    /// `initializer` for them. A supplied source is closed exactly once,
    /// whether loading succeeds or not.
    pub fn new(
        topology: Topology,
        source: Option<&mut dyn InputReader>,
        initializer: &dyn WeightInitializer,
    ) -> Result<Self> {
        let weights = match source {
            Some(reader) => {
                let loaded = if reader.source_exists() {
                    Some(read_layers(&topology, reader))
                } else {
                    None
                };
                let closed = reader.close();
                match loaded {
                    Some(layers) => {
                        let layers = layers?;
                        closed?;
                        debug!("loaded {} weight matrices from source", layers.len());
                        layers
                    }
                    None => {
                        closed?;
                        debug!("no persisted weights, running initializer");
                        initializer.create(&topology)
                    }
                }
            }
            None => {
                debug!("no weight source given, running initializer");
                initializer.create(&topology)
            }
        };
        Self::from_weights(topology, weights)
    }

    pub fn from_weights(topology: Topology, weights: WeightStore) -> Result<Self> {
        weights.validate(&topology)?;
        Ok(Self {
            topology: Arc::new(topology),
            weights,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    /// Independent copy of the weights, safe to hand to exporters.
    pub fn cloned_weights(&self) -> WeightStore {
        self.weights.clone()
    }

    pub fn summary(&self) -> String {
        let units = self.topology.units();
        let mut res = "\nModel Network\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer\t Units\t Activation\t Weights shape\t No.of params\n");
        res.push_str(&format!("0\t {}\t {}\t\t -\t\t 0\n", units[0].size, units[0].activation));
        for (i, layer) in self.weights.layers().iter().enumerate() {
            let unit = units[i + 1];
            res.push_str(&format!(
                "{}\t {}\t {}\t\t ({}, {})\t\t {}\n",
                i + 1,
                unit.size,
                unit.activation,
                layer.nrows(),
                layer.ncols(),
                layer.len()
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", self.topology.parameter_count()));
        res
    }

    /// Propagates `input` through every layer.
    ///
    /// Returns `(result, post_activation, pre_activation)`. `pre_activation[0]`
    /// is the raw input and `pre_activation[l]` the weighted sums of layer `l`;
    /// `post_activation[l]` holds the activated values, led by the bias slot for
    /// every layer except the output one, whose values are also `result`.
    pub fn forward(&self, input: &[f64]) -> Result<(Array1<f64>, Vec<Array1<f64>>, Vec<Array1<f64>>)> {
        let units = self.topology.units();
        if input.len() != units[0].size {
            return Err(NNError::InvalidState(format!(
                "the input layer has {} units but {} inputs were given",
                units[0].size,
                input.len()
            )));
        }
        let last = units.len() - 1;

        let mut pre_activation = Vec::with_capacity(units.len());
        let mut post_activation = Vec::with_capacity(units.len());
        pre_activation.push(Array1::from(input.to_vec()));
        post_activation.push(with_bias(input.iter().map(|&x| units[0].activation.apply(x))));

        for (l, layer) in self.weights.layers().iter().enumerate().map(|(i, w)| (i + 1, w)) {
            let u = post_activation[l - 1].dot(layer);
            let f = units[l].activation;
            let o = if l == last {
                u.mapv(|x| f.apply(x))
            } else {
                with_bias(u.iter().map(|&x| f.apply(x)))
            };
            pre_activation.push(u);
            post_activation.push(o);
        }

        let result = post_activation[last].clone();
        Ok((result, post_activation, pre_activation))
    }

    pub fn predict(&self, input: &[f64]) -> Result<Array1<f64>> {
        let (result, _, _) = self.forward(input)?;
        Ok(result)
    }

    /// Runs [`Network::predict`] on every row of `inputs` in parallel.
    pub fn predict_many(&self, inputs: &Array2<f64>) -> Result<Array2<f64>> {
        let outputs = (0..inputs.nrows())
            .into_par_iter()
            .map(|i| self.predict(&inputs.row(i).to_vec()))
            .collect::<Result<Vec<_>>>()?;
        let flat: Vec<f64> = outputs.iter().flat_map(|o| o.iter().copied()).collect();
        Ok(Array2::from_shape_vec((inputs.nrows(), self.topology.output_size()), flat)?)
    }

    /// One gradient-descent step on `½ Σ (result - target)^2` for a single
    /// sample. Returns the updated network; `self` keeps its weights.
    pub fn backward(&self, input: &[f64], target: &[f64], learning_rate: f64) -> Result<Network> {
        let units = self.topology.units();
        let last = units.len() - 1;
        if target.len() != units[last].size {
            return Err(NNError::InvalidState(format!(
                "the output layer has {} units but {} targets were given",
                units[last].size,
                target.len()
            )));
        }
        let (result, post_activation, pre_activation) = self.forward(input)?;

        let old = self.weights.layers();
        let mut layers = old.to_vec();

        let f = units[last].activation;
        let mut delta: Array1<f64> = result
            .iter()
            .zip(target)
            .zip(pre_activation[last].iter())
            .map(|((y, t), &u)| (y - t) * f.derive(u))
            .collect();

        for l in (1..=last).rev() {
            // layers[l - 1] feeds layer l
            let gradient = outer(&post_activation[l - 1], &delta);
            layers[l - 1].scaled_add(-learning_rate, &gradient);

            if l > 1 {
                let f = units[l - 1].activation;
                // skip the bias row
                let propagated = old[l - 1].slice(s![1.., ..]).dot(&delta);
                delta = propagated
                    .iter()
                    .zip(pre_activation[l - 1].iter())
                    .map(|(e, &u)| e * f.derive(u))
                    .collect();
            }
        }

        Ok(Network {
            topology: Arc::clone(&self.topology),
            weights: WeightStore::new(layers),
        })
    }

    pub fn squared_error(&self, input: &[f64], target: &[f64]) -> Result<f64> {
        let result = self.predict(input)?;
        squared_error(result.view(), ArrayView1::from(target))
    }

    /// Mean of `½ Σ (result - target)^2` over the rows of `x` and `y`.
    pub fn evaluate(&self, x: &Array2<f64>, y: &Array2<f64>) -> Result<f64> {
        check_samples(x, y)?;
        if x.nrows() == 0 {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for (input, target) in x.outer_iter().zip(y.outer_iter()) {
            let result = self.predict(&input.to_vec())?;
            total += criteria(result.view(), target)?;
        }
        Ok(total / x.nrows() as f64)
    }

    /// Online training: one [`Network::backward`] step per row, `epochs` times
    /// over the data. Returns the last network and the error after each epoch.
    pub fn fit(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        epochs: usize,
        learning_rate: f64,
    ) -> Result<(Network, Vec<f64>)> {
        check_samples(x, y)?;
        let mut network = self.clone();
        let mut errors = Vec::with_capacity(epochs);
        let every = (epochs / 10).max(1);

        for epoch in 0..epochs {
            for (input, target) in x.outer_iter().zip(y.outer_iter()) {
                network = network.backward(&input.to_vec(), &target.to_vec(), learning_rate)?;
            }
            let error = network.evaluate(x, y)?;
            if !error.is_finite() {
                warn!("epoch {}/{}: error is {}, learning rate {} may be too large", epoch + 1, epochs, error, learning_rate);
            } else if (epoch + 1) % every == 0 || epoch + 1 == epochs {
                info!("epoch {}/{}: error {:.6}", epoch + 1, epochs, error);
            } else {
                debug!("epoch {}/{}: error {:.6}", epoch + 1, epochs, error);
            }
            errors.push(error);
        }
        Ok((network, errors))
    }
}

fn read_layers(topology: &Topology, reader: &mut dyn InputReader) -> Result<WeightStore> {
    let layers = topology
        .shapes()
        .map(|(rows, cols)| reader.read_matrix(rows, cols))
        .collect::<Result<Vec<_>>>()?;
    Ok(WeightStore::new(layers))
}

fn with_bias(values: impl Iterator<Item = f64>) -> Array1<f64> {
    std::iter::once(BIAS).chain(values).collect()
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    let column = a.view().insert_axis(Axis(1));
    let row = b.view().insert_axis(Axis(0));
    column.dot(&row)
}

fn check_samples(x: &Array2<f64>, y: &Array2<f64>) -> Result<()> {
    if x.nrows() != y.nrows() {
        return Err(NNError::InvalidState(format!(
            "{} input rows but {} target rows",
            x.nrows(),
            y.nrows()
        )));
    }
    Ok(())
}
