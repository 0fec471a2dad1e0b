//! Reinforcement learning over the snake grid world
//!
//! Provides:
//! - Egocentric ray-cast observations compressed into categorical states
//! - A tabular Q-learning agent with epsilon-greedy exploration
//! - A bounded replay buffer for high-reward transitions
//! - An RL-shaped environment wrapper around the game engine
//! - JSON persistence for trained value tables

pub mod agent;
pub mod buffer;
pub mod config;
pub mod environment;
pub mod observation;
pub mod persistence;

pub use agent::QLearningAgent;
pub use buffer::{ReplayBuffer, Transition};
pub use config::QLearningConfig;
pub use environment::SnakeEnvironment;
pub use observation::{cast_ray, observe, HitKind, Observation, RayCategory, RayHit};
pub use persistence::{load_model, save_model, ModelMetadata};
