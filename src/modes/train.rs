//! Training mode for the Q-learning agent
//!
//! Runs the training loop: each episode interleaves perception, action
//! selection, an environment step, and a Bellman update, then replays
//! buffered experience and decays epsilon. Progress is logged on a rolling
//! window and checkpoints are saved periodically.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::game::GameConfig;
use crate::metrics::TrainingStats;
use crate::rl::{save_model, QLearningAgent, QLearningConfig, SnakeEnvironment};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Step ceiling per episode; terminates the episode, not the process
    pub max_steps_per_episode: usize,

    /// Replay draws applied at the end of each episode
    pub replays_per_episode: usize,

    /// Path to save the final trained model
    pub save_path: PathBuf,

    /// Save a checkpoint every N episodes
    pub checkpoint_frequency: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Optional RNG seed for reproducible runs
    pub seed: Option<u64>,

    /// Game configuration (grid size, rewards)
    pub game_config: GameConfig,

    /// Q-learning hyperparameters
    pub agent_config: QLearningConfig,
}

impl TrainConfig {
    /// Create a training configuration with defaults
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            max_steps_per_episode: 1000,
            replays_per_episode: 20,
            save_path,
            checkpoint_frequency: 1000,
            log_frequency: 100,
            seed: None,
            game_config: GameConfig::default(),
            agent_config: QLearningConfig::default(),
        }
    }
}

/// Training mode for the Q-learning agent
pub struct TrainMode {
    agent: QLearningAgent,
    env: SnakeEnvironment,
    stats: TrainingStats,
    config: TrainConfig,
    current_episode: usize,
    total_steps: usize,
}

impl TrainMode {
    /// Create a new training mode from its configuration
    pub fn new(config: TrainConfig) -> Result<Self> {
        config
            .game_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid game config: {}", e))?;
        config
            .agent_config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid agent config: {}", e))?;

        let (agent, env) = match config.seed {
            Some(seed) => (
                QLearningAgent::with_seed(config.agent_config.clone(), seed),
                // Offset so the agent and the board draw different streams.
                SnakeEnvironment::with_seed(config.game_config.clone(), seed.wrapping_add(1)),
            ),
            None => (
                QLearningAgent::new(config.agent_config.clone()),
                SnakeEnvironment::new(config.game_config.clone()),
            ),
        };

        // 100-episode rolling window for progress reporting
        let stats = TrainingStats::new(100);

        Ok(Self {
            agent,
            env,
            stats,
            config,
            current_episode: 0,
            total_steps: 0,
        })
    }

    /// Run the training loop
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for episode in 0..self.config.num_episodes {
            self.current_episode = episode;

            let (episode_reward, episode_steps, final_length) = self.run_episode();

            self.stats
                .record_episode(episode_reward, episode_steps, final_length);

            self.agent.replay(self.config.replays_per_episode);
            self.agent.decay_epsilon();

            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }

            if (episode + 1) % self.config.checkpoint_frequency == 0 {
                self.save_checkpoint()?;
            }
        }

        self.save_model()?;

        println!("\nTraining complete!");
        println!("Final model saved to: {:?}", self.config.save_path);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());
        println!(
            "States discovered: {} | Final epsilon: {:.3}",
            self.agent.table_len(),
            self.agent.epsilon()
        );

        Ok(())
    }

    /// Run a single training episode
    ///
    /// Returns (total reward, steps taken, final snake length).
    fn run_episode(&mut self) -> (f32, usize, usize) {
        let mut obs = self.env.reset();
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        loop {
            let action = self.agent.select_action(obs);
            let (next_obs, reward, done) = self.env.step(action);

            self.agent.update(obs, action, reward, next_obs);

            episode_reward += reward;
            episode_steps += 1;
            self.total_steps += 1;

            if done || episode_steps >= self.config.max_steps_per_episode {
                break;
            }
            // `next_obs` is Some exactly when the episode continues.
            obs = next_obs.expect("non-terminal step yields an observation");
        }

        (episode_reward, episode_steps, self.env.state().length())
    }

    /// Save a checkpoint of the current model
    fn save_checkpoint(&self) -> Result<()> {
        let checkpoint_path = self
            .config
            .save_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("checkpoint_ep{}.json", self.current_episode + 1));

        save_model(
            &self.agent,
            self.current_episode + 1,
            self.total_steps,
            &checkpoint_path,
        )
        .with_context(|| format!("Failed to save checkpoint to {:?}", checkpoint_path))?;

        println!("  Checkpoint saved: {:?}", checkpoint_path);

        Ok(())
    }

    /// Save the final trained model
    fn save_model(&self) -> Result<()> {
        save_model(
            &self.agent,
            self.config.num_episodes,
            self.total_steps,
            &self.config.save_path,
        )
        .with_context(|| format!("Failed to save final model to {:?}", self.config.save_path))?;

        Ok(())
    }

    /// Print training header information
    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("Tabular Q-Learning - Slither");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Game Config: {}x{} grid, {} good / {} bad apples",
            self.config.game_config.grid_width,
            self.config.game_config.grid_height,
            self.config.game_config.good_apple_count,
            self.config.game_config.bad_apple_count
        );
        println!("Agent Config:");
        println!("  Alpha: {}", self.config.agent_config.alpha);
        println!("  Gamma: {}", self.config.agent_config.gamma);
        println!(
            "  Epsilon: {} (decay {} / floor {})",
            self.config.agent_config.epsilon,
            self.config.agent_config.epsilon_decay,
            self.config.agent_config.epsilon_floor
        );
        println!(
            "  Replay: capacity {}, threshold {}, {} draws/episode",
            self.config.agent_config.replay_capacity,
            self.config.agent_config.replay_success_threshold,
            self.config.replays_per_episode
        );
        println!("Step cap: {} per episode", self.config.max_steps_per_episode);
        println!("Checkpoints: Every {} episodes", self.config.checkpoint_frequency);
        println!("Logging: Every {} episodes", self.config.log_frequency);
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }

    /// Print training progress
    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] {} | Eps: {:.3} | States: {}",
            episode,
            self.config.num_episodes,
            self.stats.format_summary(),
            self.agent.epsilon(),
            self.agent.table_len()
        );
    }
}
