//! Categorical perception over the board
//!
//! The agent never sees absolute coordinates. For each compass direction a
//! ray is cast outward from the head and the first thing it hits is bucketed
//! into a coarse distance band. Distinct boards collapse onto the same
//! observation on purpose; that compression is what keeps the value table
//! small enough to learn.

use serde::{Deserialize, Serialize};

use crate::game::{Cell, Direction, GameState};

/// What a ray ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Board edge
    Wall,
    /// Snake body segment
    Body,
    GoodApple,
    BadApple,
}

/// First obstacle along one direction, with its 1-indexed step distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayHit {
    pub kind: HitKind,
    pub distance: u32,
}

/// Distance-banded classification of a ray hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RayCategory {
    DangerImm,
    DangerNear,
    DangerFar,
    FoodClose,
    FoodNear,
    FoodFar,
    BadClose,
    BadFar,
    /// Nothing before the visibility horizon. Unreachable on a walled board
    /// (the edge always terminates a ray) but part of the encoding domain,
    /// so tables learned on open-board variants still round-trip.
    Safe,
}

impl RayCategory {
    /// Bucket a hit by kind and distance band
    pub fn classify(hit: Option<RayHit>) -> Self {
        let Some(hit) = hit else {
            return RayCategory::Safe;
        };
        match hit.kind {
            HitKind::Wall | HitKind::Body => match hit.distance {
                0..=1 => RayCategory::DangerImm,
                2..=3 => RayCategory::DangerNear,
                _ => RayCategory::DangerFar,
            },
            HitKind::GoodApple => match hit.distance {
                0..=2 => RayCategory::FoodClose,
                3..=5 => RayCategory::FoodNear,
                _ => RayCategory::FoodFar,
            },
            HitKind::BadApple => match hit.distance {
                0..=2 => RayCategory::BadClose,
                _ => RayCategory::BadFar,
            },
        }
    }

    /// Whether this category marks a good apple somewhere along the ray
    pub fn is_food(&self) -> bool {
        matches!(
            self,
            RayCategory::FoodClose | RayCategory::FoodNear | RayCategory::FoodFar
        )
    }
}

/// The agent-facing state: one category per compass direction
///
/// Used as the value-table key; equality and hashing are over the full
/// 4-tuple in (up, down, left, right) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub up: RayCategory,
    pub down: RayCategory,
    pub left: RayCategory,
    pub right: RayCategory,
}

impl Observation {
    /// Category seen in the given direction
    pub fn category(&self, direction: Direction) -> RayCategory {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Cast a ray from the snake's head and report the first obstacle
///
/// Steps cell by cell; the board edge always terminates the ray as a wall
/// hit, so on a bounded board this never runs off the end. Distances are
/// counted from the head, 1-indexed.
pub fn cast_ray(state: &GameState, direction: Direction) -> RayHit {
    let (dx, dy) = direction.delta();
    let mut pos = state.head_position();
    let mut distance = 0u32;

    loop {
        pos = pos.moved_by(dx, dy);
        distance += 1;
        match state.cell_at(pos) {
            None => {
                return RayHit {
                    kind: HitKind::Wall,
                    distance,
                }
            }
            Some(Cell::Snake) => {
                return RayHit {
                    kind: HitKind::Body,
                    distance,
                }
            }
            Some(Cell::GoodApple) => {
                return RayHit {
                    kind: HitKind::GoodApple,
                    distance,
                }
            }
            Some(Cell::BadApple) => {
                return RayHit {
                    kind: HitKind::BadApple,
                    distance,
                }
            }
            Some(Cell::Empty) => continue,
        }
    }
}

/// Encode the current board as the agent's categorical observation
///
/// Pure: reads the state, mutates nothing, and is idempotent for a fixed
/// board.
pub fn observe(state: &GameState) -> Observation {
    Observation {
        up: RayCategory::classify(Some(cast_ray(state, Direction::Up))),
        down: RayCategory::classify(Some(cast_ray(state, Direction::Down))),
        left: RayCategory::classify(Some(cast_ray(state, Direction::Left))),
        right: RayCategory::classify(Some(cast_ray(state, Direction::Right))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Snake};

    /// Horizontal snake with its head at (x, y), no apples
    fn state_with_head(x: i32, y: i32) -> GameState {
        GameState::new(Snake::new(Position::new(x, y), Direction::Right, 3), 10, 10)
    }

    #[test]
    fn test_wall_distances() {
        // Head at (5, 0): the wall is one step up, ten steps down.
        let state = state_with_head(5, 0);

        let up = cast_ray(&state, Direction::Up);
        assert_eq!(up.kind, HitKind::Wall);
        assert_eq!(up.distance, 1);

        let down = cast_ray(&state, Direction::Down);
        assert_eq!(down.kind, HitKind::Wall);
        assert_eq!(down.distance, 10);
    }

    #[test]
    fn test_body_terminates_ray_before_wall() {
        // Body occupies (4, 5) and (3, 5) left of the head at (5, 5).
        let state = state_with_head(5, 5);

        let left = cast_ray(&state, Direction::Left);
        assert_eq!(left.kind, HitKind::Body);
        assert_eq!(left.distance, 1);
    }

    #[test]
    fn test_apples_terminate_rays() {
        let mut state = state_with_head(5, 5);
        state.set_cell(Position::new(5, 2), Cell::GoodApple);
        state.set_cell(Position::new(9, 5), Cell::BadApple);

        let up = cast_ray(&state, Direction::Up);
        assert_eq!(up.kind, HitKind::GoodApple);
        assert_eq!(up.distance, 3);

        let right = cast_ray(&state, Direction::Right);
        assert_eq!(right.kind, HitKind::BadApple);
        assert_eq!(right.distance, 4);
    }

    #[test]
    fn test_danger_bands() {
        let hit = |d| Some(RayHit { kind: HitKind::Wall, distance: d });
        assert_eq!(RayCategory::classify(hit(1)), RayCategory::DangerImm);
        assert_eq!(RayCategory::classify(hit(2)), RayCategory::DangerNear);
        assert_eq!(RayCategory::classify(hit(3)), RayCategory::DangerNear);
        assert_eq!(RayCategory::classify(hit(4)), RayCategory::DangerFar);

        let body = |d| Some(RayHit { kind: HitKind::Body, distance: d });
        assert_eq!(RayCategory::classify(body(1)), RayCategory::DangerImm);
        assert_eq!(RayCategory::classify(body(7)), RayCategory::DangerFar);
    }

    #[test]
    fn test_food_bands() {
        let hit = |d| Some(RayHit { kind: HitKind::GoodApple, distance: d });
        assert_eq!(RayCategory::classify(hit(1)), RayCategory::FoodClose);
        assert_eq!(RayCategory::classify(hit(2)), RayCategory::FoodClose);
        assert_eq!(RayCategory::classify(hit(3)), RayCategory::FoodNear);
        assert_eq!(RayCategory::classify(hit(5)), RayCategory::FoodNear);
        assert_eq!(RayCategory::classify(hit(6)), RayCategory::FoodFar);
    }

    #[test]
    fn test_bad_bands_and_safe() {
        let hit = |d| Some(RayHit { kind: HitKind::BadApple, distance: d });
        assert_eq!(RayCategory::classify(hit(2)), RayCategory::BadClose);
        assert_eq!(RayCategory::classify(hit(3)), RayCategory::BadFar);

        assert_eq!(RayCategory::classify(None), RayCategory::Safe);
    }

    #[test]
    fn test_observe_fixed_board() {
        // Head at (5, 5) facing right: body to the left at distance 1, walls
        // six steps up/down... plus a good apple planted two cells right.
        let mut state = state_with_head(5, 5);
        state.set_cell(Position::new(7, 5), Cell::GoodApple);

        let obs = observe(&state);
        assert_eq!(obs.up, RayCategory::DangerFar);
        assert_eq!(obs.down, RayCategory::DangerFar);
        assert_eq!(obs.left, RayCategory::DangerImm);
        assert_eq!(obs.right, RayCategory::FoodClose);
    }

    #[test]
    fn test_observe_is_deterministic_and_pure() {
        let mut state = state_with_head(2, 3);
        state.set_cell(Position::new(2, 8), Cell::BadApple);
        let before = state.clone();

        let first = observe(&state);
        let second = observe(&state);

        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn test_category_lookup_matches_fields() {
        let obs = Observation {
            up: RayCategory::DangerImm,
            down: RayCategory::FoodFar,
            left: RayCategory::BadClose,
            right: RayCategory::Safe,
        };
        assert_eq!(obs.category(Direction::Up), RayCategory::DangerImm);
        assert_eq!(obs.category(Direction::Down), RayCategory::FoodFar);
        assert_eq!(obs.category(Direction::Left), RayCategory::BadClose);
        assert_eq!(obs.category(Direction::Right), RayCategory::Safe);
    }

    #[test]
    fn test_is_food() {
        assert!(RayCategory::FoodClose.is_food());
        assert!(RayCategory::FoodNear.is_food());
        assert!(RayCategory::FoodFar.is_food());
        assert!(!RayCategory::DangerImm.is_food());
        assert!(!RayCategory::BadClose.is_food());
        assert!(!RayCategory::Safe.is_food());
    }
}
