//! Session state and core simulation types
//!
//! A session is one attempt at play, from launch to crash.

use serde::{Deserialize, Serialize};

use super::entities::{Avatar, Obstacle};
use super::spawner::Spawner;
use crate::tuning::Tuning;
use crate::variants::Variant;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Live play: physics, spawning and collisions run
    Active,
    /// Crashed: frozen, waiting for restart or menu
    Terminal,
}

/// What ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Left the screen through the top or bottom edge
    OutOfBounds,
    /// Hit a pipe
    Obstacle { id: u32 },
}

/// Side effects produced by a tick, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Flap,
    Spawned { id: u32, with_coin: bool },
    Crash(CrashCause),
    Scored { id: u32, score: u32 },
    Collected { id: u32 },
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct Session {
    /// Seed the spawner was started with
    pub seed: u64,
    pub tuning: Tuning,
    pub avatar: Avatar,
    /// Active obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Coins picked up during this session
    pub coins_earned: u32,
    pub phase: SessionPhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) spawner: Spawner,
    next_id: u32,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning, variant: Variant) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            avatar: Avatar::new(&tuning, variant),
            tuning,
            obstacles: Vec::new(),
            score: 0,
            coins_earned: 0,
            phase: SessionPhase::Active,
            time_ticks: 0,
            spawner: Spawner::new(seed),
            next_id: 1,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a freshly spawned obstacle at the right edge
    pub fn spawn_obstacle(&mut self) -> &Obstacle {
        let id = self.next_entity_id();
        let obstacle = self.spawner.spawn(id, &self.tuning);
        log::debug!(
            "Spawned obstacle {} (gap top {}, coin {})",
            id,
            obstacle.gap_top,
            obstacle.coin.is_some()
        );
        self.obstacles.push(obstacle);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Place a hand-built obstacle (tests, scripted scenarios)
    pub fn push_obstacle(&mut self, x: f32, gap_top: f32, with_coin: bool) -> u32 {
        let id = self.next_entity_id();
        self.obstacles
            .push(Obstacle::new(id, x, gap_top, with_coin, &self.tuning));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(5, Tuning::default(), Variant::Owl);
        assert!(session.is_active());
        assert_eq!(session.score, 0);
        assert_eq!(session.coins_earned, 0);
        assert!(session.obstacles.is_empty());
        assert_eq!(session.avatar.x, 50.0);
        assert_eq!(session.avatar.y, 300.0);
        assert_eq!(session.avatar.variant, Variant::Owl);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut session = Session::new(5, Tuning::default(), Variant::Classic);
        let a = session.push_obstacle(400.0, 200.0, false);
        let b = session.spawn_obstacle().id;
        assert_ne!(a, b);
        assert_eq!(session.obstacles.len(), 2);
    }
}
