use clap::{Parser, Subcommand};
use log::{info, warn};
use rmlp::config::load_config;
use rmlp::dataset::{read_samples, write_predictions};
use rmlp::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rmlp", about = "Train and run a multilayer perceptron")]
struct Cli {
    /// JSON training configuration
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on a CSV of inputs followed by targets, then save the weights
    Train {
        data: PathBuf,

        /// Overrides the epoch count from the config
        #[arg(long)]
        epochs: Option<usize>,
    },
    /// Predict every row of a CSV of inputs
    Predict {
        data: PathBuf,

        /// Write predictions here instead of printing them
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    let network = config.network()?;
    info!("{}", network.summary());

    let topology = network.topology();
    match cli.command {
        Command::Train { data, epochs } => {
            let (x, y) = read_samples(&data, topology.input_size(), topology.output_size())?;
            let epochs = epochs.unwrap_or(config.epochs);
            info!("training on {} samples for {} epochs", x.nrows(), epochs);

            let (trained, errors) = network.fit(&x, &y, epochs, config.learning_rate)?;
            if let Some(error) = errors.last() {
                info!("final error: {:.6}", error);
            }

            if !config.save(&trained)? {
                warn!("no weights file configured, trained weights were not saved");
            }
        }
        Command::Predict { data, output } => {
            let (x, _) = read_samples(&data, topology.input_size(), 0)?;
            let predictions = network.predict_many(&x)?;
            match output {
                Some(path) => {
                    write_predictions(&predictions, &path)?;
                    info!("wrote {} predictions to {}", predictions.nrows(), path.display());
                }
                None => {
                    for (input, prediction) in x.outer_iter().zip(predictions.outer_iter()) {
                        println!("{} -> {}", input, prediction);
                    }
                }
            }
        }
    }

    Ok(())
}
