use super::observation::{observe, Observation};
use crate::game::{Direction, GameConfig, GameEngine, GameState};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine behind the RL-shaped interface the agent trains
/// against: categorical observations in, (observation, reward, done) out.
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new environment with an entropy-seeded engine
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Create an environment with a fixed seed for reproducible episodes
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut engine = GameEngine::with_seed(config, seed);
        let state = engine.reset();
        Self { engine, state }
    }

    /// Reset the board and return the initial observation
    pub fn reset(&mut self) -> Observation {
        self.state = self.engine.reset();
        observe(&self.state)
    }

    /// Apply one action
    ///
    /// Returns `(next_observation, reward, done)`; the observation is `None`
    /// exactly when the episode terminated, which is the agent's terminal
    /// sentinel for the Bellman target.
    pub fn step(&mut self, direction: Direction) -> (Option<Observation>, f32, bool) {
        let result = self.engine.step(&mut self.state, direction);

        if result.terminated {
            (None, result.reward, true)
        } else {
            (Some(observe(&self.state)), result.reward, false)
        }
    }

    /// Observe the current board without stepping
    pub fn observe(&self) -> Observation {
        observe(&self.state)
    }

    /// Current game state, for renderers and tests
    pub fn state(&self) -> &GameState {
        &self.state
    }
}
