//! Bounded replay buffer for high-reward transitions
//!
//! The agent stashes transitions that cleared the success threshold and
//! later re-applies Bellman updates to them. The buffer is a plain FIFO:
//! once full, the oldest entry is evicted. Sampling supports a uniform draw
//! and a draw biased toward the highest-reward half of the buffer.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;

use super::observation::Observation;
use crate::game::Direction;

/// One stored transition; `next_state` is `None` at episode end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: Observation,
    pub action: Direction,
    pub reward: f32,
    pub next_state: Option<Observation>,
}

/// FIFO buffer of successful transitions with bounded capacity
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    entries: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    /// Create a buffer holding at most `capacity` transitions
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest when full
    pub fn push(&mut self, transition: Transition) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(transition);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries in arrival order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.iter()
    }

    /// Draw one entry uniformly at random
    pub fn sample_uniform(&self, rng: &mut StdRng) -> Option<Transition> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.entries.len());
        self.entries.get(idx).copied()
    }

    /// Draw one entry from the reward-sorted top half of the buffer
    ///
    /// The top half always has at least one entry for a non-empty buffer.
    pub fn sample_top_half(&self, rng: &mut StdRng) -> Option<Transition> {
        if self.entries.is_empty() {
            return None;
        }

        let mut ranked: Vec<usize> = (0..self.entries.len()).collect();
        ranked.sort_by(|&a, &b| {
            self.entries[b]
                .reward
                .partial_cmp(&self.entries[a].reward)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let half = ranked.len().div_ceil(2);
        let idx = ranked[rng.gen_range(0..half)];
        self.entries.get(idx).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::observation::RayCategory;
    use rand::SeedableRng;

    fn obs() -> Observation {
        Observation {
            up: RayCategory::DangerFar,
            down: RayCategory::DangerFar,
            left: RayCategory::DangerImm,
            right: RayCategory::FoodClose,
        }
    }

    fn transition(reward: f32) -> Transition {
        Transition {
            state: obs(),
            action: Direction::Right,
            reward,
            next_state: Some(obs()),
        }
    }

    #[test]
    fn test_push_and_len() {
        let mut buffer = ReplayBuffer::new(10);
        assert!(buffer.is_empty());

        buffer.push(transition(10.0));
        buffer.push(transition(11.0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_capacity_bound_and_arrival_order() {
        let mut buffer = ReplayBuffer::new(100);

        // Feed well past capacity; only the most recent 100 survive, in
        // arrival order.
        for i in 0..250 {
            buffer.push(transition(i as f32));
        }

        assert_eq!(buffer.len(), 100);
        let rewards: Vec<f32> = buffer.iter().map(|t| t.reward).collect();
        assert_eq!(rewards[0], 150.0);
        assert_eq!(rewards[99], 249.0);
        assert!(rewards.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sampling_empty_buffer() {
        let buffer = ReplayBuffer::new(10);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(buffer.sample_uniform(&mut rng).is_none());
        assert!(buffer.sample_top_half(&mut rng).is_none());
    }

    #[test]
    fn test_top_half_sampling_prefers_high_rewards() {
        let mut buffer = ReplayBuffer::new(10);
        for reward in [1.0, 2.0, 3.0, 10.0, 20.0, 30.0] {
            buffer.push(transition(reward));
        }

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let drawn = buffer.sample_top_half(&mut rng).unwrap();
            assert!(drawn.reward >= 10.0, "drew {} from the bottom half", drawn.reward);
        }
    }

    #[test]
    fn test_top_half_of_single_entry() {
        let mut buffer = ReplayBuffer::new(10);
        buffer.push(transition(5.0));

        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(buffer.sample_top_half(&mut rng).unwrap().reward, 5.0);
    }
}
