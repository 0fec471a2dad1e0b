use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use slither::game::GameConfig;
use slither::modes::{EvalConfig, EvalMode, TrainConfig, TrainMode, VisualizeMode};

#[derive(Parser)]
#[command(name = "slither")]
#[command(version, about = "Grid-snake agent trained with tabular Q-learning")]
struct Cli {
    /// Execution mode
    #[arg(long, default_value = "train")]
    mode: Mode,

    /// Number of episodes to run
    #[arg(long, default_value = "10000")]
    episodes: usize,

    /// Step ceiling per episode
    #[arg(long, default_value = "1000")]
    max_steps: usize,

    /// Model file to save (train) or load (eval, visualize)
    #[arg(long, default_value = "models/slither.json")]
    model: PathBuf,

    /// Grid width
    #[arg(long, default_value = "10")]
    width: usize,

    /// Grid height
    #[arg(long, default_value = "10")]
    height: usize,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Train an agent and save the value table
    Train,
    /// Run a trained agent without learning and report scores
    Eval,
    /// Watch a trained agent play in the terminal
    Visualize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let game_config = GameConfig::new(cli.width, cli.height);

    match cli.mode {
        Mode::Train => {
            let mut config = TrainConfig::new(cli.episodes, cli.model);
            config.max_steps_per_episode = cli.max_steps;
            config.seed = cli.seed;
            config.game_config = game_config;

            let mut train_mode = TrainMode::new(config)?;
            train_mode.run()?;
        }
        Mode::Eval => {
            let mut config = EvalConfig::new(cli.episodes, cli.model);
            config.max_steps_per_episode = cli.max_steps;
            config.seed = cli.seed;
            config.game_config = game_config;

            let mut eval_mode = EvalMode::new(config)?;
            eval_mode.run()?;
        }
        Mode::Visualize => {
            let mut visualize_mode = VisualizeMode::new(&cli.model, game_config)?;
            visualize_mode.run().await?;
        }
    }

    Ok(())
}
