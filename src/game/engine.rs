use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::Direction,
    config::GameConfig,
    state::{Cell, GameState, Position, Snake},
};

/// How many segments of length a bad apple costs
const BAD_APPLE_SHRINK: usize = 2;

/// Type of collision that ended the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Snake shrank to nothing after a bad apple
    Starved,
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate a good apple this step
    pub ate_good_apple: bool,
    /// Whether the snake ate a bad apple this step
    pub ate_bad_apple: bool,
    /// Type of collision if one occurred
    pub collision: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn terminal(reward: f32, collision: CollisionType) -> Self {
        Self {
            reward,
            terminated: true,
            info: StepInfo {
                ate_good_apple: false,
                ate_bad_apple: collision == CollisionType::Starved,
                collision: Some(collision),
            },
        }
    }
}

/// The game engine that owns the movement, collision, and reward rules
///
/// The engine holds the RNG so that board randomness (snake spawn, apple
/// placement) is reproducible from a seed.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with a fixed seed for reproducible runs
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to a fresh initial state
    ///
    /// Spawns the snake at a random cell, extended behind the head in a
    /// randomly chosen direction that keeps the whole body in bounds, then
    /// places the configured number of good and bad apples on empty cells.
    pub fn reset(&mut self) -> GameState {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;
        let reach = (self.config.initial_snake_length - 1) as i32;

        let anchor = Position::new(
            self.rng.gen_range(0..width),
            self.rng.gen_range(0..height),
        );

        // The anchor becomes the tail; the head sits `reach` cells along the
        // travel direction. Any cell has at least one in-bounds direction on
        // a board validated against the snake length.
        let mut candidates = Vec::new();
        for dir in Direction::ALL {
            let (dx, dy) = dir.delta();
            let head = anchor.moved_by(dx * reach, dy * reach);
            if head.x >= 0 && head.x < width && head.y >= 0 && head.y < height {
                candidates.push((dir, head));
            }
        }
        let &(direction, head) = candidates
            .choose(&mut self.rng)
            .expect("every cell has an in-bounds spawn direction");

        let snake = Snake::new(head, direction, self.config.initial_snake_length);
        let mut state = GameState::new(snake, self.config.grid_width, self.config.grid_height);

        for _ in 0..self.config.good_apple_count {
            self.spawn_apple(&mut state, Cell::GoodApple);
        }
        for _ in 0..self.config.bad_apple_count {
            self.spawn_apple(&mut state, Cell::BadApple);
        }

        state
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, direction: Direction) -> StepResult {
        if state.game_over {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo {
                    ate_good_apple: false,
                    ate_bad_apple: false,
                    collision: None,
                },
            };
        }

        let new_head = state.snake.head().moved_in_direction(direction);
        state.steps += 1;
        state.snake.direction = direction;

        // The board is inspected before any tail removal, so moving into the
        // cell the tail is about to vacate still counts as a collision.
        let target = match state.cell_at(new_head) {
            None => {
                state.game_over = true;
                return StepResult::terminal(self.config.death_penalty, CollisionType::Wall);
            }
            Some(Cell::Snake) => {
                state.game_over = true;
                return StepResult::terminal(
                    self.config.death_penalty,
                    CollisionType::SelfCollision,
                );
            }
            Some(cell) => cell,
        };

        state.snake.body.insert(0, new_head);
        state.set_cell(new_head, Cell::Snake);

        let (reward, ate_good, ate_bad) = match target {
            Cell::GoodApple => {
                // Growth tick: the tail stays put.
                self.spawn_apple(state, Cell::GoodApple);
                (self.config.good_apple_reward, true, false)
            }
            Cell::BadApple => {
                let new_length = state.snake.len() as i32 - 1 - BAD_APPLE_SHRINK as i32;
                if new_length <= 0 {
                    state.game_over = true;
                    return StepResult::terminal(
                        self.config.death_penalty,
                        CollisionType::Starved,
                    );
                }
                while state.snake.len() > new_length as usize {
                    let tail = state.snake.body.pop().expect("length checked above");
                    state.set_cell(tail, Cell::Empty);
                }
                self.spawn_apple(state, Cell::BadApple);
                (self.config.bad_apple_reward, false, true)
            }
            // Only Empty remains; Snake returned above.
            _ => {
                let tail = state.snake.body.pop().expect("snake is never empty");
                state.set_cell(tail, Cell::Empty);
                (self.proximity_bonus(state, new_head), false, false)
            }
        };

        StepResult {
            reward,
            terminated: false,
            info: StepInfo {
                ate_good_apple: ate_good,
                ate_bad_apple: ate_bad,
                collision: None,
            },
        }
    }

    /// Small bonus for ending a plain move near a good apple
    fn proximity_bonus(&self, state: &GameState, head: Position) -> f32 {
        let nearest = state
            .cells_of(Cell::GoodApple)
            .iter()
            .map(|apple| head.manhattan_distance(*apple))
            .min();

        match nearest {
            Some(d) if d <= 2 => self.config.proximity_bonus_close,
            Some(d) if d <= 4 => self.config.proximity_bonus_near,
            _ => 0.0,
        }
    }

    /// Place an apple on a random empty cell by rejection sampling
    ///
    /// Terminates because the board is far larger than the occupied cells
    /// under any reachable snake length; a fully occupied board would spin
    /// here forever, but cannot occur (see tests).
    fn spawn_apple(&mut self, state: &mut GameState, apple: Cell) {
        loop {
            let pos = Position::new(
                self.rng.gen_range(0..state.grid_width as i32),
                self.rng.gen_range(0..state.grid_height as i32),
            );
            if state.cell_at(pos) == Some(Cell::Empty) {
                state.set_cell(pos, apple);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    /// Build a state with the snake laid out explicitly and no apples
    fn bare_state(head: Position, direction: Direction, length: usize) -> GameState {
        GameState::new(Snake::new(head, direction, length), 10, 10)
    }

    fn count(state: &GameState, cell: Cell) -> usize {
        state.cells_of(cell).len()
    }

    #[test]
    fn test_reset_spawns_snake_and_apples() {
        let mut engine = engine();
        let state = engine.reset();

        assert!(!state.is_game_over());
        assert_eq!(state.steps, 0);
        assert_eq!(state.length(), 3);
        assert!(state.snake.is_contiguous());
        assert_eq!(count(&state, Cell::Snake), 3);
        assert_eq!(count(&state, Cell::GoodApple), 2);
        assert_eq!(count(&state, Cell::BadApple), 1);
    }

    #[test]
    fn test_reset_is_reproducible_from_seed() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        assert_eq!(a.reset(), b.reset());
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(0, 5), Direction::Left, 3);

        let result = engine.step(&mut state, Direction::Left);

        assert_eq!(result.reward, -10.0);
        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::Wall));
        assert!(state.is_game_over());
    }

    #[test]
    fn test_self_collision_on_reversal() {
        let mut engine = engine();
        // Head at (5,5), neck at (4,5); reversing left bites the neck.
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);

        let result = engine.step(&mut state, Direction::Left);

        assert_eq!(result.reward, -10.0);
        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_tail_cell_still_collides() {
        let mut engine = engine();
        // Snake curled into a 2x2 square: the head is adjacent to its own
        // tail. The board is inspected before the tail vacates, so moving
        // onto the tail cell is a self-collision.
        let snake = Snake {
            body: vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(4, 4),
                Position::new(4, 5),
            ],
            direction: Direction::Down,
        };
        let mut state = GameState::new(snake, 10, 10);

        let result = engine.step(&mut state, Direction::Left);

        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::SelfCollision));
    }

    #[test]
    fn test_plain_move_keeps_length_and_frees_tail() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        let old_tail = state.snake.tail();

        let result = engine.step(&mut state, Direction::Right);

        assert!(!result.terminated);
        assert_eq!(state.length(), 3);
        assert_eq!(state.head_position(), Position::new(6, 5));
        assert_eq!(state.cell_at(old_tail), Some(Cell::Empty));
        assert_eq!(count(&state, Cell::Snake), 3);
    }

    #[test]
    fn test_plain_move_reward_without_nearby_apple() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        // Good apple 9 cells away from the new head (6,5).
        state.set_cell(Position::new(0, 1), Cell::GoodApple);

        let result = engine.step(&mut state, Direction::Right);

        assert_eq!(result.reward, 0.0);
        assert!(!result.terminated);
    }

    #[test]
    fn test_proximity_bonus_bands() {
        let mut engine = engine();

        // Distance 2 from the new head (6,5) -> close bonus.
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        state.set_cell(Position::new(8, 5), Cell::GoodApple);
        assert_eq!(engine.step(&mut state, Direction::Right).reward, 0.5);

        // Distance 4 -> near bonus.
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        state.set_cell(Position::new(8, 3), Cell::GoodApple);
        assert_eq!(engine.step(&mut state, Direction::Right).reward, 0.2);

        // Distance 5 -> nothing.
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        state.set_cell(Position::new(9, 3), Cell::GoodApple);
        assert_eq!(engine.step(&mut state, Direction::Right).reward, 0.0);
    }

    #[test]
    fn test_good_apple_grows_without_dropping_tail() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 3);
        state.set_cell(Position::new(6, 5), Cell::GoodApple);
        let old_tail = state.snake.tail();

        let result = engine.step(&mut state, Direction::Right);

        assert_eq!(result.reward, 10.0);
        assert!(!result.terminated);
        assert!(result.info.ate_good_apple);
        assert_eq!(state.length(), 4);
        // Growth tick: the tail cell is still occupied.
        assert_eq!(state.cell_at(old_tail), Some(Cell::Snake));
        // A replacement good apple was spawned.
        assert_eq!(count(&state, Cell::GoodApple), 1);
    }

    #[test]
    fn test_bad_apple_shrinks_by_two() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 5);
        state.set_cell(Position::new(6, 5), Cell::BadApple);

        let result = engine.step(&mut state, Direction::Right);

        assert_eq!(result.reward, -1.0);
        assert!(!result.terminated);
        assert!(result.info.ate_bad_apple);
        assert_eq!(state.length(), 3);
        assert_eq!(count(&state, Cell::Snake), 3);
        assert_eq!(count(&state, Cell::BadApple), 1);
    }

    #[test]
    fn test_bad_apple_kills_short_snake() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 1);
        state.set_cell(Position::new(6, 5), Cell::BadApple);

        let result = engine.step(&mut state, Direction::Right);

        assert_eq!(result.reward, -10.0);
        assert!(result.terminated);
        assert_eq!(result.info.collision, Some(CollisionType::Starved));
        assert!(state.is_game_over());
    }

    #[test]
    fn test_bad_apple_kills_length_two() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(5, 5), Direction::Right, 2);
        state.set_cell(Position::new(6, 5), Cell::BadApple);

        let result = engine.step(&mut state, Direction::Right);

        assert!(result.terminated);
        assert_eq!(result.reward, -10.0);
    }

    #[test]
    fn test_apple_invariant_over_many_steps() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3);
        let mut state = engine.reset();

        // Walk a fixed sweep; after every non-terminal step the board must
        // hold exactly 2 good apples, 1 bad apple, and `length` snake cells.
        let sweep = [
            Direction::Up,
            Direction::Left,
            Direction::Down,
            Direction::Left,
            Direction::Up,
            Direction::Right,
        ];
        for dir in sweep.iter().cycle().take(60) {
            let result = engine.step(&mut state, *dir);
            if result.terminated {
                break;
            }
            assert_eq!(count(&state, Cell::GoodApple), 2);
            assert_eq!(count(&state, Cell::BadApple), 1);
            assert_eq!(count(&state, Cell::Snake), state.length());
            assert!(state.snake.is_contiguous());
        }
    }

    #[test]
    fn test_step_after_game_over_is_inert() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(0, 5), Direction::Left, 3);
        engine.step(&mut state, Direction::Left);
        assert!(state.is_game_over());

        let steps_before = state.steps;
        let result = engine.step(&mut state, Direction::Right);

        assert!(result.terminated);
        assert_eq!(result.reward, 0.0);
        assert_eq!(state.steps, steps_before);
    }

    #[test]
    fn test_spawn_succeeds_on_nearly_full_board() {
        let mut engine = engine();
        let mut state = bare_state(Position::new(0, 0), Direction::Right, 1);

        // Flood everything except two cells; rejection sampling must land on
        // one of them.
        for y in 0..10 {
            for x in 0..10 {
                let pos = Position::new(x, y);
                if pos != Position::new(9, 9) && pos != Position::new(9, 8) {
                    state.set_cell(pos, Cell::Snake);
                }
            }
        }

        engine.spawn_apple(&mut state, Cell::GoodApple);
        let apples = state.cells_of(Cell::GoodApple);
        assert_eq!(apples.len(), 1);
        assert!(apples[0] == Position::new(9, 9) || apples[0] == Position::new(9, 8));
    }
}
