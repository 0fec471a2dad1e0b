use serde::{Deserialize, Serialize};

/// Configuration for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Number of good apples kept on the board
    pub good_apple_count: usize,
    /// Number of bad apples kept on the board
    pub bad_apple_count: usize,

    // Rewards (for RL)
    /// Reward for eating a good apple
    pub good_apple_reward: f32,
    /// Reward for eating a bad apple and surviving the shrink
    pub bad_apple_reward: f32,
    /// Penalty for dying (wall, self-collision, or shrinking away)
    pub death_penalty: f32,
    /// Bonus for ending a plain move within Manhattan distance 2 of a good apple
    pub proximity_bonus_close: f32,
    /// Bonus for ending a plain move within Manhattan distance 4 of a good apple
    pub proximity_bonus_near: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_height: 10,
            initial_snake_length: 3,
            good_apple_count: 2,
            bad_apple_count: 1,
            good_apple_reward: 10.0,
            bad_apple_reward: -1.0,
            death_penalty: -10.0,
            proximity_bonus_close: 0.5,
            proximity_bonus_near: 0.2,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    ///
    /// Returns `Ok(())` if all parameters are valid, `Err(String)` with an
    /// error message otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width < 5 || self.grid_height < 5 {
            return Err(format!(
                "grid must be at least 5x5, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.grid_width.min(self.grid_height) {
            return Err(format!(
                "initial_snake_length ({}) does not fit in a {}x{} grid",
                self.initial_snake_length, self.grid_width, self.grid_height
            ));
        }

        let cells = self.grid_width * self.grid_height;
        let occupied = self.initial_snake_length + self.good_apple_count + self.bad_apple_count;
        if occupied >= cells {
            return Err(format!(
                "snake and apples ({}) would fill the {}-cell board",
                occupied, cells
            ));
        }

        Ok(())
    }
}
