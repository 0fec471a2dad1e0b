//! Evaluation mode: exploitation-only test runs
//!
//! Loads a trained model and plays it without learning: no Bellman updates,
//! no replay, no epsilon decay. A small residual epsilon is kept so the
//! agent cannot wedge itself into a deterministic loop forever; the step
//! ceiling catches whatever remains.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::game::GameConfig;
use crate::rl::{load_model, QLearningAgent, SnakeEnvironment};

/// Configuration for evaluation mode
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Number of evaluation episodes
    pub num_episodes: usize,

    /// Step ceiling per episode
    pub max_steps_per_episode: usize,

    /// Residual exploration rate during evaluation
    pub residual_epsilon: f32,

    /// Path of the trained model to load
    pub model_path: PathBuf,

    /// Optional RNG seed for reproducible evaluation boards
    pub seed: Option<u64>,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,
}

impl EvalConfig {
    pub fn new(num_episodes: usize, model_path: PathBuf) -> Self {
        Self {
            num_episodes,
            max_steps_per_episode: 1000,
            residual_epsilon: 0.01,
            model_path,
            seed: None,
            game_config: GameConfig::default(),
        }
    }
}

/// Summary of an evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub episodes: usize,
    pub mean_final_length: f32,
    pub mean_steps: f32,
    pub best_length: usize,
}

/// Evaluation mode
pub struct EvalMode {
    agent: QLearningAgent,
    env: SnakeEnvironment,
    config: EvalConfig,
}

impl EvalMode {
    /// Load the model and build the evaluation environment
    pub fn new(config: EvalConfig) -> Result<Self> {
        let (mut agent, metadata) = load_model(&config.model_path)
            .with_context(|| format!("Failed to load model from {:?}", config.model_path))?;

        println!("{}", "=".repeat(60));
        println!("Loaded Model Information");
        println!("{}", "=".repeat(60));
        println!("Model path: {:?}", config.model_path);
        println!("Episodes trained: {}", metadata.episodes_trained);
        println!("Training steps: {}", metadata.training_steps);
        println!("States discovered: {}", agent.table_len());
        println!("Version: {}", metadata.version);
        println!("{}", "=".repeat(60));
        println!();

        agent.set_epsilon(config.residual_epsilon);

        let env = match config.seed {
            Some(seed) => SnakeEnvironment::with_seed(config.game_config.clone(), seed),
            None => SnakeEnvironment::new(config.game_config.clone()),
        };

        Ok(Self { agent, env, config })
    }

    /// Run the evaluation episodes and print per-episode results
    pub fn run(&mut self) -> Result<EvalReport> {
        let mut total_length = 0;
        let mut total_steps = 0;
        let mut best_length = 0;

        for episode in 0..self.config.num_episodes {
            let (steps, length) = self.run_episode();
            total_length += length;
            total_steps += steps;
            best_length = best_length.max(length);

            println!(
                "Eval Episode {}/{} | Final Length: {} | Steps: {}",
                episode + 1,
                self.config.num_episodes,
                length,
                steps
            );
        }

        let report = EvalReport {
            episodes: self.config.num_episodes,
            mean_final_length: total_length as f32 / self.config.num_episodes as f32,
            mean_steps: total_steps as f32 / self.config.num_episodes as f32,
            best_length,
        };

        println!(
            "\nAverage - Length: {:.1} | Steps: {:.1} | Best: {}",
            report.mean_final_length, report.mean_steps, report.best_length
        );

        Ok(report)
    }

    /// Play one episode without learning; returns (steps, final length)
    fn run_episode(&mut self) -> (usize, usize) {
        let mut obs = self.env.reset();
        let mut steps = 0;

        loop {
            let action = self.agent.select_action(obs);
            let (next_obs, _reward, done) = self.env.step(action);
            steps += 1;

            if done || steps >= self.config.max_steps_per_episode {
                break;
            }
            obs = next_obs.expect("non-terminal step yields an observation");
        }

        (steps, self.env.state().length())
    }
}
