use crate::prelude::*;
use std::fmt;

/// Activation function attached to every unit of a layer.
///
/// `derive` takes the same pre-activation value that was handed to `apply`,
/// not the activated output.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Identity,
    Sigmoid,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
}

impl Activation {
    pub fn apply(&self, u: f64) -> f64 {
        match self {
            Self::Identity => u,
            Self::Sigmoid => sigmoid(u),
            Self::Tanh => u.tanh(),
            Self::ReLU => {
                if u > 0.0 {
                    u
                } else {
                    0.0
                }
            }
        }
    }

    pub fn derive(&self, u: f64) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::Sigmoid => {
                let s = sigmoid(u);
                s * (1.0 - s)
            }
            Self::Tanh => {
                let t = u.tanh();
                1.0 - t * t
            }
            Self::ReLU => {
                if u > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Identity => "Identity",
            Self::Sigmoid => "Sigmoid",
            Self::Tanh => "Tanh",
            Self::ReLU => "ReLU",
        };
        f.write_str(name)
    }
}

fn sigmoid(u: f64) -> f64 {
    1.0 / (1.0 + (-u).exp())
}
