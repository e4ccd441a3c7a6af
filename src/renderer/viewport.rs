//! Letterboxed mapping between the 400x600 logical screen and the surface

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Surface size in pixels, with the logical screen scaled to fit and centered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Logical-to-surface scale factor
    pub fn scale(&self) -> f32 {
        (self.width / SCREEN_WIDTH).min(self.height / SCREEN_HEIGHT)
    }

    /// Top-left of the playfield on the surface
    pub fn origin(&self) -> Vec2 {
        let s = self.scale();
        Vec2::new(
            (self.width - SCREEN_WIDTH * s) / 2.0,
            (self.height - SCREEN_HEIGHT * s) / 2.0,
        )
    }

    /// Logical point -> normalized device coordinates (y up)
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        let px = self.origin() + p * self.scale();
        Vec2::new(px.x / self.width * 2.0 - 1.0, 1.0 - px.y / self.height * 2.0)
    }

    /// Surface pixel -> logical point (may fall outside the playfield)
    pub fn to_game(&self, px: Vec2) -> Vec2 {
        (px - self.origin()) / self.scale()
    }
}
