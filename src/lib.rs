//! Flap Shop - A side-scrolling flappy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, scoring)
//! - `app`: Screen flow (menu, shop, capture, play) and the session controller
//! - `progress` / `persistence`: Player progress and the store contract
//! - `renderer`: Vertex generation and the WebGPU pipeline
//! - `platform`: Native/browser implementations of storage, assets and media
//! - `tuning` / `settings`: Data-driven game balance and user preferences

pub mod app;
pub mod assets;
pub mod media;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod variants;

#[cfg(target_arch = "wasm32")]
pub mod audio;

pub use app::{App, Command, Key, Screen};
pub use progress::{Progress, ShopOutcome};
pub use settings::Settings;
pub use tuning::Tuning;
pub use variants::Variant;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the tuning constants are calibrated for)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical screen dimensions (pixels, origin top-left, y down)
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Height of the white header bar drawn over menus and play
    pub const HEADER_HEIGHT: f32 = 60.0;
}
