//! Platform abstraction layer
//!
//! Concrete implementations of the external interfaces:
//! - Storage (JSON file on native, LocalStorage on web)
//! - Asset decoding (image files on native)
//! - Camera / background video frames (image sequence on native, `<video>` on web)

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed for a new session when settings do not pin one
pub fn clock_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}
