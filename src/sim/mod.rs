//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entities;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{remove_offscreen, resolve};
pub use entities::{Avatar, Collectible, Obstacle};
pub use rect::Rect;
pub use spawner::Spawner;
pub use state::{CrashCause, GameEvent, Session, SessionPhase};
pub use tick::{TickInput, tick};
