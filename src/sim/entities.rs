//! Avatar, obstacles and coins
//!
//! Per-tick update rules. Values are calibrated per tick at `SIM_DT`; `advance`
//! scales by `dt / SIM_DT` so a full tick applies the constants exactly once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;
use crate::variants::Variant;

/// The player-controlled flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    /// Left edge (constant for the whole session)
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Vertical velocity (px/tick, positive is down)
    pub velocity: f32,
    pub width: f32,
    pub height: f32,
    /// Visual identity
    pub variant: Variant,
}

impl Avatar {
    pub fn new(tuning: &Tuning, variant: Variant) -> Self {
        Self {
            x: tuning.avatar_x,
            y: tuning.avatar_start_y,
            velocity: 0.0,
            width: tuning.avatar_width,
            height: tuning.avatar_height,
            variant,
        }
    }

    /// Flap: replace the current velocity with the upward impulse
    pub fn flap(&mut self, flap_velocity: f32) {
        self.velocity = flap_velocity;
    }

    /// Apply gravity, then move by the new velocity
    pub fn advance(&mut self, gravity: f32, dt: f32) {
        let steps = dt / SIM_DT;
        self.velocity += gravity * steps;
        self.y += self.velocity * steps;
    }

    /// Nominal bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Bounding box shrunk by `inset` on each side (forgiving collisions)
    pub fn hit_region(&self, inset: f32) -> Rect {
        self.bounds().inset(inset)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// A coin riding in the middle of an obstacle's gap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    /// Center of the un-oscillated hit region
    pub center: Vec2,
    pub radius: f32,
    /// Oscillation phase (radians)
    pub phase: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            phase: 0.0,
            collected: false,
        }
    }

    /// Vertical oscillation offset (bounded by `amplitude`)
    pub fn bob_offset(&self, amplitude: f32) -> f32 {
        self.phase.sin() * amplitude
    }

    /// Hit region including the oscillation offset
    pub fn hit_region(&self, amplitude: f32) -> Rect {
        Rect::around(self.center, self.radius).translated(Vec2::new(0.0, self.bob_offset(amplitude)))
    }
}

/// A pipe pair with a vertical opening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Bottom of the top pipe
    pub gap_top: f32,
    pub gap_height: f32,
    /// Bottom of the playfield (extent of the bottom pipe)
    pub floor: f32,
    /// Set once the avatar has cleared the trailing edge
    pub passed: bool,
    pub coin: Option<Collectible>,
}

impl Obstacle {
    /// Create an obstacle at `x`, optionally carrying a coin centered in its gap
    pub fn new(id: u32, x: f32, gap_top: f32, with_coin: bool, tuning: &Tuning) -> Self {
        let width = tuning.pipe_width;
        let gap_height = tuning.gap_height;
        let coin = with_coin.then(|| {
            Collectible::new(
                Vec2::new(x + width / 2.0, gap_top + gap_height / 2.0),
                tuning.coin_radius,
            )
        });
        Self {
            id,
            x,
            width,
            gap_top,
            gap_height,
            floor: tuning.screen_height,
            passed: false,
            coin,
        }
    }

    /// Scroll left; the coin follows and advances its oscillation
    pub fn advance(&mut self, scroll_speed: f32, bob_speed: f32) {
        self.x -= scroll_speed;
        if let Some(coin) = &mut self.coin {
            coin.center.x -= scroll_speed;
            coin.phase += bob_speed;
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap_height
    }

    pub fn gap_center(&self) -> f32 {
        self.gap_top + self.gap_height / 2.0
    }

    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_top)
    }

    pub fn bottom_rect(&self) -> Rect {
        let y = self.gap_bottom();
        Rect::new(self.x, y, self.width, (self.floor - y).max(0.0))
    }

    /// Fully scrolled past the left screen edge
    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flap_overrides_velocity() {
        let tuning = Tuning::default();
        let mut avatar = Avatar::new(&tuning, Variant::Classic);
        avatar.velocity = 9.0;
        avatar.flap(tuning.flap_velocity);
        assert_eq!(avatar.velocity, -6.0);
        avatar.flap(tuning.flap_velocity);
        assert_eq!(avatar.velocity, -6.0);
    }

    #[test]
    fn test_obstacle_rects() {
        let tuning = Tuning::default();
        let obstacle = Obstacle::new(1, 400.0, 200.0, false, &tuning);
        assert_eq!(obstacle.top_rect(), Rect::new(400.0, 0.0, 70.0, 200.0));
        assert_eq!(obstacle.bottom_rect(), Rect::new(400.0, 370.0, 70.0, 230.0));
        assert_eq!(obstacle.right(), 470.0);
    }

    #[test]
    fn test_coin_centered_in_gap_and_follows() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(1, 400.0, 200.0, true, &tuning);
        let coin = obstacle.coin.as_ref().unwrap();
        assert_eq!(coin.center, Vec2::new(435.0, 285.0));

        obstacle.advance(3.0, 0.1);
        let coin = obstacle.coin.as_ref().unwrap();
        assert_eq!(obstacle.x, 397.0);
        assert_eq!(coin.center.x, 432.0);
        assert_eq!(coin.center.y, 285.0);
        assert!((coin.phase - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_offscreen_only_when_fully_left() {
        let tuning = Tuning::default();
        let mut obstacle = Obstacle::new(1, -70.0, 200.0, false, &tuning);
        assert!(!obstacle.is_offscreen());
        obstacle.advance(3.0, 0.0);
        assert!(obstacle.is_offscreen());
    }

    proptest! {
        #[test]
        fn prop_advance_is_semi_implicit_euler(
            y in -1000.0f32..1000.0,
            v in -20.0f32..20.0,
            g in 0.0f32..2.0,
        ) {
            let tuning = Tuning::default();
            let mut avatar = Avatar::new(&tuning, Variant::Classic);
            avatar.y = y;
            avatar.velocity = v;
            avatar.advance(g, SIM_DT);
            prop_assert_eq!(avatar.velocity, v + g);
            prop_assert_eq!(avatar.y, y + (v + g));
        }

        #[test]
        fn prop_coin_bob_is_bounded(phase in -100.0f32..100.0, amplitude in 0.0f32..20.0) {
            let mut coin = Collectible::new(Vec2::new(10.0, 10.0), 15.0);
            coin.phase = phase;
            prop_assert!(coin.bob_offset(amplitude).abs() <= amplitude + 1e-4);
        }
    }
}
