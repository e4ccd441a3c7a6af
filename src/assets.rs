//! Asset registry
//!
//! Decoding happens in the platform layer; the game only sees optional handles.
//! `None` always has a defined fallback: procedural shapes for sprites, silence
//! for sounds.

use std::collections::HashMap;

use crate::variants::Variant;

/// RGBA8 image held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// Row-major pixels
    pub pixels: Vec<[u8; 4]>,
}

impl Sprite {
    /// Solid-color sprite
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Wrap a tightly packed RGBA byte buffer; `None` if the length is wrong
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Flip left-right (selfie view)
    pub fn mirrored(&self) -> Self {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for y in 0..self.height {
            for x in (0..self.width).rev() {
                pixels.push(self.pixel(x, y));
            }
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Copy a sub-rectangle, clipped to the image
    pub fn cropped(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let x0 = x.min(self.width);
        let y0 = y.min(self.height);
        let x1 = x.saturating_add(width).min(self.width);
        let y1 = y.saturating_add(height).min(self.height);
        let mut pixels = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
        for row in y0..y1 {
            for col in x0..x1 {
                pixels.push(self.pixel(col, row));
            }
        }
        Self {
            width: x1 - x0,
            height: y1 - y0,
            pixels,
        }
    }

    /// Nearest-neighbor resample
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if self.is_empty() || width == 0 || height == 0 {
            return Self {
                width,
                height,
                pixels: vec![[0; 4]; (width * height) as usize],
            };
        }
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                pixels.push(self.pixel(sx, sy));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Make everything outside the inscribed circle transparent
    pub fn circle_masked(&self) -> Self {
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;
        let r = cx.min(cy);
        let mut out = self.clone();
        for y in 0..self.height {
            for x in 0..self.width {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy > r * r {
                    out.pixels[(y * self.width + x) as usize][3] = 0;
                }
            }
        }
        out
    }
}

/// Image slots the game can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    Avatar(Variant),
    Coin,
    Background,
}

impl SpriteKey {
    /// File name the platform loaders look for
    pub fn file_name(self) -> Option<&'static str> {
        match self {
            SpriteKey::Avatar(variant) => variant.info().sprite_file,
            SpriteKey::Coin => Some("coin.jpg"),
            SpriteKey::Background => Some("background.png"),
        }
    }

    /// Every slot, for startup loading
    pub fn all() -> impl Iterator<Item = SpriteKey> {
        Variant::ALL
            .into_iter()
            .map(SpriteKey::Avatar)
            .chain([SpriteKey::Coin, SpriteKey::Background])
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Flap,
    Score,
    Crash,
    Collect,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Flap,
        SoundEffect::Score,
        SoundEffect::Crash,
        SoundEffect::Collect,
    ];
}

/// A playable sound
pub trait SoundHandle {
    /// Start playback at `volume` (0.0 - 1.0)
    fn play(&self, volume: f32);
}

/// Source of optional visual and audio assets
pub trait AssetProvider {
    fn sprite(&self, key: SpriteKey) -> Option<&Sprite>;
    fn sound(&self, effect: SoundEffect) -> Option<&dyn SoundHandle>;
}

/// Owned asset registry, populated once at startup
#[derive(Default)]
pub struct Assets {
    sprites: HashMap<SpriteKey, Sprite>,
    sounds: HashMap<SoundEffect, Box<dyn SoundHandle>>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_sprite(&mut self, key: SpriteKey, sprite: Sprite) {
        self.sprites.insert(key, sprite);
    }

    pub fn insert_sound(&mut self, effect: SoundEffect, sound: Box<dyn SoundHandle>) {
        self.sounds.insert(effect, sound);
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }
}

impl AssetProvider for Assets {
    fn sprite(&self, key: SpriteKey) -> Option<&Sprite> {
        self.sprites.get(&key)
    }

    fn sound(&self, effect: SoundEffect) -> Option<&dyn SoundHandle> {
        self.sounds.get(&effect).map(|s| s.as_ref())
    }
}

/// Play a sound if the provider has one
pub fn play(assets: &dyn AssetProvider, effect: SoundEffect, volume: f32) {
    if volume <= 0.0 {
        return;
    }
    match assets.sound(effect) {
        Some(sound) => sound.play(volume),
        None => log::trace!("No sound for {:?}, skipping", effect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSound(Rc<Cell<u32>>);

    impl SoundHandle for CountingSound {
        fn play(&self, _volume: f32) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn checker(w: u32, h: u32) -> Sprite {
        let pixels = (0..w * h)
            .map(|i| {
                let x = i % w;
                [x as u8, (i / w) as u8, 0, 255]
            })
            .collect();
        Sprite {
            width: w,
            height: h,
            pixels,
        }
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Sprite::from_rgba(2, 2, &[0; 16]).is_some());
        assert!(Sprite::from_rgba(2, 2, &[0; 15]).is_none());
    }

    #[test]
    fn test_mirrored() {
        let sprite = checker(3, 1).mirrored();
        assert_eq!(sprite.pixel(0, 0)[0], 2);
        assert_eq!(sprite.pixel(2, 0)[0], 0);
    }

    #[test]
    fn test_cropped_clips() {
        let sprite = checker(10, 10).cropped(8, 8, 5, 5);
        assert_eq!((sprite.width, sprite.height), (2, 2));
        assert_eq!(sprite.pixel(0, 0), [8, 8, 0, 255]);
    }

    #[test]
    fn test_resized_nearest() {
        let sprite = checker(4, 4).resized(2, 2);
        assert_eq!(sprite.pixel(1, 1), [2, 2, 0, 255]);
    }

    #[test]
    fn test_circle_mask_corners_transparent() {
        let sprite = Sprite::filled(10, 10, [255; 4]).circle_masked();
        assert_eq!(sprite.pixel(0, 0)[3], 0);
        assert_eq!(sprite.pixel(9, 9)[3], 0);
        assert_eq!(sprite.pixel(5, 5)[3], 255);
    }

    #[test]
    fn test_missing_assets_fall_back() {
        let assets = Assets::new();
        assert!(assets.sprite(SpriteKey::Coin).is_none());
        // No sound registered: silently skipped
        play(&assets, SoundEffect::Crash, 1.0);
    }

    #[test]
    fn test_registered_sound_plays() {
        let count = Rc::new(Cell::new(0));
        let mut assets = Assets::new();
        assets.insert_sound(SoundEffect::Score, Box::new(CountingSound(count.clone())));
        play(&assets, SoundEffect::Score, 0.5);
        play(&assets, SoundEffect::Flap, 0.5);
        play(&assets, SoundEffect::Score, 0.0);
        assert_eq!(count.get(), 1);
        assert_eq!(assets.sound_count(), 1);
    }

    #[test]
    fn test_sprite_keys_cover_catalog() {
        assert_eq!(SpriteKey::all().count(), Variant::ALL.len() + 2);
        assert_eq!(
            SpriteKey::Avatar(Variant::Eagle).file_name(),
            Some("bird_eagle.jpg")
        );
    }
}
