//! Data-driven game balance
//!
//! All gameplay constants live here so the engine is one parameterized core.
//! Physics values are per tick at the fixed 60 Hz rate.

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, SIM_DT};

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen_width: f32,
    pub screen_height: f32,

    // === Avatar ===
    /// Fixed horizontal position of the avatar's left edge
    pub avatar_x: f32,
    /// Starting vertical position of the avatar's top edge
    pub avatar_start_y: f32,
    pub avatar_width: f32,
    pub avatar_height: f32,
    /// Downward acceleration (px/tick²)
    pub gravity: f32,
    /// Velocity set by a flap (px/tick, negative is up)
    pub flap_velocity: f32,
    /// Inset applied to each side of the avatar box for collisions
    pub hit_inset: f32,

    // === Obstacles ===
    /// Horizontal scroll speed (px/tick)
    pub scroll_speed: f32,
    /// Seconds between obstacle spawns
    pub spawn_period: f32,
    pub pipe_width: f32,
    /// Vertical opening between the two pipes
    pub gap_height: f32,
    /// Minimum distance between the gap and either screen edge
    pub gap_margin: f32,

    // === Coins ===
    pub coin_radius: f32,
    /// Probability that a new obstacle carries a coin
    pub coin_chance: f64,
    /// Oscillation phase advance per tick (radians)
    pub coin_bob_speed: f32,
    /// Oscillation amplitude (px)
    pub coin_bob_amplitude: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            avatar_x: 50.0,
            avatar_start_y: SCREEN_HEIGHT / 2.0,
            avatar_width: 50.0,
            avatar_height: 40.0,
            gravity: 0.25,
            flap_velocity: -6.0,
            hit_inset: 5.0,

            scroll_speed: 3.0,
            spawn_period: 1.5,
            pipe_width: 70.0,
            gap_height: 170.0,
            gap_margin: 100.0,

            coin_radius: 15.0,
            coin_chance: 0.5,
            coin_bob_speed: 0.1,
            coin_bob_amplitude: 5.0,
        }
    }
}

impl Tuning {
    /// Clamp values that would make the playfield degenerate
    pub fn sanitized(mut self) -> Self {
        if !(self.screen_width > 0.0) {
            self.screen_width = SCREEN_WIDTH;
        }
        if !(self.screen_height > 0.0) {
            self.screen_height = SCREEN_HEIGHT;
        }
        self.gap_height = self.gap_height.clamp(0.0, self.screen_height);
        self.gap_margin = self.gap_margin.max(0.0);
        self.hit_inset = self
            .hit_inset
            .clamp(0.0, self.avatar_width.min(self.avatar_height) / 2.0);
        if !(self.spawn_period > 0.0) {
            self.spawn_period = Tuning::default().spawn_period;
        }
        self.spawn_period = self.spawn_period.max(self.min_spawn_period());
        self.coin_chance = self.coin_chance.clamp(0.0, 1.0);
        self.coin_radius = self.coin_radius.max(0.0);
        self
    }

    /// Shortest spawn period: one tick, and at least a pipe width of scrolling
    /// between consecutive obstacles
    pub fn min_spawn_period(&self) -> f32 {
        let ticks = if self.scroll_speed > 0.0 && self.pipe_width > 0.0 {
            (self.pipe_width / self.scroll_speed).max(1.0)
        } else {
            1.0
        };
        ticks * SIM_DT
    }

    /// Inclusive range the gap top is drawn from
    ///
    /// Collapses to the centered position when the margins leave no room.
    pub fn gap_top_range(&self) -> (f32, f32) {
        let lo = self.gap_margin;
        let hi = self.screen_height - self.gap_height - self.gap_margin;
        if hi >= lo {
            (lo, hi)
        } else {
            let centered = ((self.screen_height - self.gap_height) / 2.0).max(0.0);
            (centered, centered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gap_range() {
        let tuning = Tuning::default();
        assert_eq!(tuning.gap_top_range(), (100.0, 330.0));
    }

    #[test]
    fn test_degenerate_gap_range_clamps() {
        let tuning = Tuning {
            gap_height: 500.0,
            ..Default::default()
        };
        let (lo, hi) = tuning.gap_top_range();
        assert_eq!(lo, hi);
        assert_eq!(lo, 50.0);
    }

    #[test]
    fn test_sanitized_gap_fits_screen() {
        let tuning = Tuning {
            gap_height: 900.0,
            spawn_period: 0.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tuning.gap_height, tuning.screen_height);
        assert_eq!(tuning.spawn_period, 1.5);
        assert_eq!(tuning.gap_top_range(), (0.0, 0.0));
    }

    #[test]
    fn test_tiny_spawn_period_is_floored() {
        let tuning = Tuning {
            spawn_period: 1e-6,
            ..Default::default()
        }
        .sanitized();
        // 70 px pipe at 3 px/tick needs 70/3 ticks
        let floor = 70.0 / 3.0 * SIM_DT;
        assert!((tuning.spawn_period - floor).abs() < 1e-6);

        let stalled = Tuning {
            spawn_period: 1e-30,
            scroll_speed: 0.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(stalled.spawn_period, SIM_DT);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"gravity": 0.5}"#).unwrap();
        assert_eq!(tuning.gravity, 0.5);
        assert_eq!(tuning.pipe_width, 70.0);
    }
}
