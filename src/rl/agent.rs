//! Tabular Q-learning agent
//!
//! The agent's entire state across calls is the sparse action-value table,
//! the replay buffer, the current epsilon, and its RNG. It owns no board
//! state; everything it knows about the world arrives as an [`Observation`].

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::buffer::{ReplayBuffer, Transition};
use super::config::QLearningConfig;
use super::observation::{Observation, RayCategory};
use crate::game::Direction;

/// Replay is skipped entirely below this many buffered entries
const MIN_REPLAY_ENTRIES: usize = 5;

/// Q-learning agent over the categorical observation space
pub struct QLearningAgent {
    /// Sparse action-value table; unseen pairs read as 0.0
    q_table: HashMap<(Observation, Direction), f32>,
    buffer: ReplayBuffer,
    config: QLearningConfig,
    epsilon: f32,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create an agent with an entropy-seeded RNG
    pub fn new(config: QLearningConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an agent with a fixed seed for reproducible runs
    pub fn with_seed(config: QLearningConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: QLearningConfig, rng: StdRng) -> Self {
        Self {
            q_table: HashMap::new(),
            buffer: ReplayBuffer::new(config.replay_capacity),
            epsilon: config.epsilon,
            config,
            rng,
        }
    }

    /// Value-table lookup; total over its implicit domain, defaulting to 0.0
    pub fn q_value(&self, state: Observation, action: Direction) -> f32 {
        self.q_table.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Highest action value available from a state
    pub fn max_q(&self, state: Observation) -> f32 {
        Direction::ALL
            .iter()
            .map(|&action| self.q_value(state, action))
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Pick an action for the given observation
    ///
    /// Directions whose category is not immediately dangerous form the safe
    /// set; when every direction is immediately dangerous the full set is
    /// used so an action is always returned. With probability epsilon the
    /// agent explores, steering toward visible food with probability
    /// `food_bias`; otherwise it exploits the table, breaking ties uniformly
    /// at random.
    pub fn select_action(&mut self, state: Observation) -> Direction {
        let mut safe: Vec<Direction> = Direction::ALL
            .iter()
            .copied()
            .filter(|&d| state.category(d) != RayCategory::DangerImm)
            .collect();
        if safe.is_empty() {
            safe = Direction::ALL.to_vec();
        }

        if self.rng.gen::<f32>() < self.epsilon {
            let food: Vec<Direction> = safe
                .iter()
                .copied()
                .filter(|&d| state.category(d).is_food())
                .collect();
            if !food.is_empty() && self.rng.gen::<f32>() < self.config.food_bias {
                return *food.choose(&mut self.rng).expect("food set is non-empty");
            }
            return *safe.choose(&mut self.rng).expect("safe set is non-empty");
        }

        let best = safe
            .iter()
            .map(|&d| self.q_value(state, d))
            .fold(f32::NEG_INFINITY, f32::max);
        let maximizers: Vec<Direction> = safe
            .iter()
            .copied()
            .filter(|&d| self.q_value(state, d) == best)
            .collect();
        *maximizers
            .choose(&mut self.rng)
            .expect("at least one maximizer exists")
    }

    /// Bellman update from one observed transition
    ///
    /// `next_state` of `None` is the terminal sentinel: the target collapses
    /// to the raw reward. Transitions that clear the success threshold are
    /// buffered for replay.
    pub fn update(
        &mut self,
        state: Observation,
        action: Direction,
        reward: f32,
        next_state: Option<Observation>,
    ) {
        self.apply_bellman(state, action, reward, next_state);

        if reward >= self.config.replay_success_threshold {
            self.buffer.push(Transition {
                state,
                action,
                reward,
                next_state,
            });
        }
    }

    /// Re-apply Bellman updates to buffered transitions
    ///
    /// A no-op until the buffer holds a minimum number of entries. Roughly
    /// the first half of the draws comes from the reward-sorted top half of
    /// the buffer, the remainder uniformly at random. Replay never adds new
    /// buffer entries.
    pub fn replay(&mut self, num_replays: usize) {
        if self.buffer.len() < MIN_REPLAY_ENTRIES {
            return;
        }

        let biased_draws = num_replays / 2;
        for i in 0..num_replays {
            let drawn = if i < biased_draws {
                self.buffer.sample_top_half(&mut self.rng)
            } else {
                self.buffer.sample_uniform(&mut self.rng)
            };
            let Some(t) = drawn else { break };
            self.apply_bellman(t.state, t.action, t.reward, t.next_state);
        }
    }

    /// Multiply epsilon by the decay factor, clamped to the floor
    pub fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_floor);
    }

    fn apply_bellman(
        &mut self,
        state: Observation,
        action: Direction,
        reward: f32,
        next_state: Option<Observation>,
    ) {
        let target = match next_state {
            None => reward,
            Some(next) => reward + self.config.gamma * self.max_q(next),
        };
        let old = self.q_value(state, action);
        self.q_table
            .insert((state, action), old + self.config.alpha * (target - old));
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Override epsilon, e.g. for exploitation-only evaluation
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon;
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Number of (state, action) pairs the table has touched
    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }

    /// Read access to the full table, for persistence and inspection
    pub fn table(&self) -> &HashMap<(Observation, Direction), f32> {
        &self.q_table
    }

    /// Replace the table wholesale, e.g. when loading a saved model
    pub fn load_table(&mut self, table: HashMap<(Observation, Direction), f32>) {
        self.q_table = table;
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}
