//! Native platform: files on disk
//!
//! - Progress record as JSON in the user data directory, written via a temp
//!   file and renamed into place
//! - Sprites decoded from an asset directory with the `image` crate
//! - Background "video" as a numbered image sequence

use std::fs;
use std::path::{Path, PathBuf};

use crate::assets::{Assets, Sprite, SpriteKey};
use crate::media::LoopingFrames;
use crate::persistence::{self, ProgressStore, StoreError};
use crate::progress::Progress;

/// Save file name (kept from the first release)
pub const SAVE_FILE: &str = "flap_shop_save.json";

/// Per-user data directory (falls back to the working directory)
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flap-shop")
}

/// Progress stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the default data directory
    pub fn in_data_dir() -> Self {
        Self::new(data_dir().join(SAVE_FILE))
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self) -> Progress {
        match fs::read_to_string(&self.path) {
            Ok(json) => persistence::decode_or_default(Some(&json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                persistence::decode_or_default(None)
            }
            Err(e) => {
                log::warn!("Could not read {} ({}), starting fresh", self.path.display(), e);
                Progress::default()
            }
        }
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StoreError> {
        let json = persistence::encode(progress)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Target size a sprite slot is scaled to after decoding
fn sprite_size(key: SpriteKey) -> (u32, u32) {
    match key {
        SpriteKey::Avatar(_) => (50, 40),
        SpriteKey::Coin => (30, 30),
        SpriteKey::Background => (400, 600),
    }
}

/// Decode an image file into a sprite
pub fn decode_sprite(path: &Path) -> Option<Sprite> {
    match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            Sprite::from_rgba(rgba.width(), rgba.height(), rgba.as_raw())
        }
        Err(e) => {
            log::warn!("Error loading image {}: {}", path.display(), e);
            None
        }
    }
}

/// Load every known sprite slot from `dir`; missing files are skipped
pub fn load_assets(dir: &Path) -> Assets {
    let mut assets = Assets::new();
    for key in SpriteKey::all() {
        let Some(file) = key.file_name() else {
            continue;
        };
        let path = dir.join(file);
        if !path.exists() {
            log::info!("{} not found, using fallback for {:?}", path.display(), key);
            continue;
        }
        if let Some(sprite) = decode_sprite(&path) {
            let (w, h) = sprite_size(key);
            assets.insert_sprite(key, sprite.resized(w, h));
        }
    }
    log::info!("Loaded {} sprites from {}", assets.sprite_count(), dir.display());
    assets
}

/// Load `dir/<name>/*.png|jpg` sorted by file name as a looping feed
pub fn load_frame_sequence(dir: &Path) -> Option<LoopingFrames> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        })
        .collect();
    paths.sort();

    let frames: Vec<Sprite> = paths
        .iter()
        .filter_map(|p| decode_sprite(p))
        .map(|s| s.resized(400, 600))
        .collect();
    if frames.is_empty() {
        log::info!("No background frames in {}", dir.display());
        return None;
    }
    log::info!("Loaded {} background frames", frames.len());
    Some(LoopingFrames::new(frames))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::FrameSource;
    use crate::variants::Variant;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nested").join(SAVE_FILE));
        assert_eq!(store.load(), Progress::default());

        let mut progress = Progress::new(20, [0], 0);
        progress.select(Variant::Eagle);
        store.save(&progress).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, progress);
        store.save(&loaded).unwrap();
        assert_eq!(store.load(), loaded);
    }

    #[test]
    fn test_file_store_corrupt_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE);
        fs::write(&path, "coins=3").unwrap();
        let store = JsonFileStore::new(&path);
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn test_file_store_reads_original_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SAVE_FILE);
        fs::write(&path, r#"{"coins": 9, "unlocked": [0, 5], "current": 5}"#).unwrap();
        let progress = JsonFileStore::new(&path).load();
        assert_eq!(progress.coins(), 9);
        assert_eq!(progress.equipped(), Variant::Penguin);
    }

    #[test]
    fn test_unreadable_save_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the save path cannot be read as a file
        let path = dir.path().join(SAVE_FILE);
        fs::create_dir(&path).unwrap();
        assert_eq!(JsonFileStore::new(&path).load(), Progress::default());
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // Parent "directory" is a regular file
        let mut store = JsonFileStore::new(blocker.join(SAVE_FILE));
        assert!(store.save(&Progress::default()).is_err());
    }

    #[test]
    fn test_load_assets_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let assets = load_assets(&dir.path().join("nope"));
        assert_eq!(assets.sprite_count(), 0);
    }

    #[test]
    fn test_load_assets_scales_sprites() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(8, 8, image::Rgba([1, 2, 3, 255]))
            .save(dir.path().join("bird_classic.png"))
            .unwrap();
        let assets = load_assets(dir.path());
        use crate::assets::AssetProvider;
        let sprite = assets.sprite(SpriteKey::Avatar(Variant::Classic)).unwrap();
        assert_eq!((sprite.width, sprite.height), (50, 40));
        assert_eq!(sprite.pixel(0, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_frame_sequence_sorted() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([2, 0, 0, 255]))
            .save(dir.path().join("frame_002.png"))
            .unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 0, 0, 255]))
            .save(dir.path().join("frame_001.png"))
            .unwrap();
        let mut feed = load_frame_sequence(dir.path()).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed.poll_frame().unwrap().pixel(0, 0)[0], 1);
        assert_eq!(feed.poll_frame().unwrap().pixel(0, 0)[0], 2);
    }
}
