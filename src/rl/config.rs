//! Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the tabular Q-learning agent
///
/// # Example
///
/// ```rust
/// use slither::rl::QLearningConfig;
///
/// // Use default hyperparameters
/// let config = QLearningConfig::default();
///
/// // Or customize specific parameters
/// let config = QLearningConfig {
///     alpha: 0.2,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QLearningConfig {
    /// Learning rate: step size toward the Bellman target
    ///
    /// Default: 0.1
    pub alpha: f32,

    /// Discount factor for future rewards
    ///
    /// Values closer to 1.0 make the agent more far-sighted.
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Initial exploration probability
    ///
    /// Default: 1.0 (fully exploratory before any decay)
    pub epsilon: f32,

    /// Minimum exploration rate; decay never pushes epsilon below this
    ///
    /// Default: 0.01
    pub epsilon_floor: f32,

    /// Per-episode multiplier applied by `decay_epsilon`
    ///
    /// Default: 0.98
    pub epsilon_decay: f32,

    /// Probability of steering an exploratory move toward visible food
    ///
    /// Default: 0.7
    pub food_bias: f32,

    /// Maximum number of buffered replay transitions
    ///
    /// Default: 100
    pub replay_capacity: usize,

    /// Minimum reward for a transition to enter the replay buffer
    ///
    /// Default: 10.0 (the good-apple reward; the maximum single-step reward
    /// on the default board)
    pub replay_success_threshold: f32,
}

impl QLearningConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// Checks that all hyperparameters are in valid ranges.
    ///
    /// # Example
    ///
    /// ```rust
    /// use slither::rl::QLearningConfig;
    ///
    /// let mut config = QLearningConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.alpha = -0.1;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err(format!("alpha must be in (0, 1], got {}", self.alpha));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(format!("epsilon must be in [0, 1], got {}", self.epsilon));
        }

        if !(0.0..=1.0).contains(&self.epsilon_floor) {
            return Err(format!(
                "epsilon_floor must be in [0, 1], got {}",
                self.epsilon_floor
            ));
        }

        if self.epsilon_floor > self.epsilon {
            return Err(format!(
                "epsilon_floor ({}) cannot exceed epsilon ({})",
                self.epsilon_floor, self.epsilon
            ));
        }

        if self.epsilon_decay <= 0.0 || self.epsilon_decay > 1.0 {
            return Err(format!(
                "epsilon_decay must be in (0, 1], got {}",
                self.epsilon_decay
            ));
        }

        if !(0.0..=1.0).contains(&self.food_bias) {
            return Err(format!(
                "food_bias must be in [0, 1], got {}",
                self.food_bias
            ));
        }

        if self.replay_capacity == 0 {
            return Err("replay_capacity must be at least 1".to_string());
        }

        Ok(())
    }
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 1.0,
            epsilon_floor: 0.01,
            epsilon_decay: 0.98,
            food_bias: 0.7,
            replay_capacity: 100,
            replay_success_threshold: 10.0,
        }
    }
}
