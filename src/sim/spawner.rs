//! Timed obstacle spawning
//!
//! Accumulates simulated time and fires once per `spawn_period`. The first
//! obstacle appears one full period after the session starts.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::Obstacle;
use crate::tuning::Tuning;

/// Most obstacles a single poll may release; any larger backlog is dropped
const MAX_SPAWNS_PER_POLL: u32 = 2;

/// Seeded obstacle generator
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    elapsed: f32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            elapsed: 0.0,
        }
    }

    /// Advance the timer by `dt`; returns how many spawns are due
    pub fn poll(&mut self, dt: f32, period: f32) -> u32 {
        if !(period > 0.0) {
            return 0;
        }
        self.elapsed += dt;
        let mut due = 0;
        // Tolerance absorbs float drift from summing SIM_DT
        while self.elapsed + 1e-4 >= period {
            if due == MAX_SPAWNS_PER_POLL {
                self.elapsed = 0.0;
                break;
            }
            self.elapsed -= period;
            due += 1;
        }
        due
    }

    /// Build a new obstacle at the right screen edge
    pub fn spawn(&mut self, id: u32, tuning: &Tuning) -> Obstacle {
        let (lo, hi) = tuning.gap_top_range();
        let gap_top = if hi > lo {
            self.rng.random_range(lo..=hi).round()
        } else {
            lo
        };
        let with_coin = self.rng.random_bool(tuning.coin_chance);
        Obstacle::new(id, tuning.screen_width, gap_top, with_coin, tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_fires_every_period() {
        let mut spawner = Spawner::new(1);
        let mut fired_at = Vec::new();
        for tick in 1..=300 {
            if spawner.poll(SIM_DT, 1.5) > 0 {
                fired_at.push(tick);
            }
        }
        assert_eq!(fired_at, vec![90, 180, 270]);
    }

    #[test]
    fn test_degenerate_period_is_bounded() {
        let mut spawner = Spawner::new(1);
        assert_eq!(spawner.poll(SIM_DT, 1e-6), MAX_SPAWNS_PER_POLL);
        // Too small to change `elapsed` when subtracted
        assert_eq!(spawner.poll(SIM_DT, 1e-30), MAX_SPAWNS_PER_POLL);
        assert_eq!(spawner.poll(SIM_DT, 0.0), 0);
        assert_eq!(spawner.poll(SIM_DT, f32::NAN), 0);
    }

    #[test]
    fn test_gap_within_range() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(42);
        for id in 0..500 {
            let obstacle = spawner.spawn(id, &tuning);
            assert!(obstacle.gap_top >= 100.0 && obstacle.gap_top <= 330.0);
            assert_eq!(obstacle.x, 400.0);
            assert!(obstacle.gap_bottom() <= tuning.screen_height);
        }
    }

    #[test]
    fn test_coin_roughly_half() {
        let tuning = Tuning::default();
        let mut spawner = Spawner::new(7);
        let with_coin = (0..1000)
            .filter(|&id| spawner.spawn(id, &tuning).coin.is_some())
            .count();
        assert!((400..600).contains(&with_coin), "coins: {}", with_coin);
    }

    #[test]
    fn test_degenerate_range_clamps() {
        let tuning = Tuning {
            gap_height: 550.0,
            ..Default::default()
        };
        let mut spawner = Spawner::new(3);
        let obstacle = spawner.spawn(1, &tuning);
        assert_eq!(obstacle.gap_top, 25.0);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let tuning = Tuning::default();
        let mut a = Spawner::new(99);
        let mut b = Spawner::new(99);
        for id in 0..20 {
            let oa = a.spawn(id, &tuning);
            let ob = b.spawn(id, &tuning);
            assert_eq!(oa.gap_top, ob.gap_top);
            assert_eq!(oa.coin.is_some(), ob.coin.is_some());
        }
    }
}
