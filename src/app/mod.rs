//! Application screen flow
//!
//! `Menu` (initial) -> `Play` / `Shop` / `Capture` and back. The app owns the
//! player's progress, the progress store, assets and media sources, and lends
//! them to the active screen each frame.

pub mod layout;
pub mod session;

use glam::Vec2;

use crate::assets::{self, AssetProvider, Sprite};
use crate::media::{FrameSource, avatar_from_frame};
use crate::persistence::{ProgressStore, save_best_effort};
use crate::platform::clock_seed;
use crate::progress::{Progress, ShopOutcome};
use crate::settings::Settings;
use crate::sim::Session;
use crate::variants::Variant;

pub use session::{SessionController, sound_for};

/// Current screen
#[derive(Debug, Clone)]
pub enum Screen {
    Menu,
    Shop,
    Capture,
    Play(SessionController),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu => "menu",
            Screen::Shop => "shop",
            Screen::Capture => "capture",
            Screen::Play(_) => "play",
        }
    }
}

/// User intents, from clicks or keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    OpenShop,
    OpenCapture,
    /// Shop -> Menu
    Back,
    SelectVariant(Variant),
    /// Take the camera snapshot
    Capture,
    /// Leave capture without a snapshot
    Cancel,
    Flap,
    Restart,
    ToMenu,
    ToggleAutopilot,
    ToggleMute,
    ToggleFps,
    ToggleBackgroundFeed,
    Quit,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Escape,
    A,
    /// Mute
    M,
    /// FPS counter
    F,
    /// Background video
    B,
}

/// The whole game outside of rendering
pub struct App {
    screen: Screen,
    progress: Progress,
    store: Box<dyn ProgressStore>,
    assets: Box<dyn AssetProvider>,
    settings: Settings,
    /// Camera snapshot replacing the variant sprite until the app closes
    custom_avatar: Option<Sprite>,
    background_feed: Option<Box<dyn FrameSource>>,
    camera: Option<Box<dyn FrameSource>>,
    background_frame: Option<Sprite>,
    camera_frame: Option<Sprite>,
    /// Settings changed since the front end last persisted them
    settings_changed: bool,
    quit: bool,
}

impl App {
    /// Create the app on the menu, loading progress from `store`
    pub fn new(
        store: Box<dyn ProgressStore>,
        assets: Box<dyn AssetProvider>,
        settings: Settings,
    ) -> Self {
        let progress = store.load();
        log::info!(
            "App ready: {} coins, {} unlocked, {} equipped",
            progress.coins(),
            progress.unlocked().count(),
            progress.equipped().name()
        );
        Self {
            screen: Screen::Menu,
            progress,
            store,
            assets,
            settings,
            custom_avatar: None,
            background_feed: None,
            camera: None,
            background_frame: None,
            camera_frame: None,
            settings_changed: false,
            quit: false,
        }
    }

    pub fn with_background_feed(mut self, feed: Box<dyn FrameSource>) -> Self {
        self.background_feed = Some(feed);
        self
    }

    pub fn with_camera(mut self, camera: Box<dyn FrameSource>) -> Self {
        self.camera = Some(camera);
        self
    }

    // === Accessors ===

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &dyn ProgressStore {
        self.store.as_ref()
    }

    pub fn assets(&self) -> &dyn AssetProvider {
        self.assets.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn custom_avatar(&self) -> Option<&Sprite> {
        self.custom_avatar.as_ref()
    }

    /// Latest background video frame (only when the feed is enabled)
    pub fn background_frame(&self) -> Option<&Sprite> {
        if self.settings.background_feed {
            self.background_frame.as_ref()
        } else {
            None
        }
    }

    pub fn camera_frame(&self) -> Option<&Sprite> {
        self.camera_frame.as_ref()
    }

    /// Session being played, if any
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Play(controller) => Some(controller.session()),
            _ => None,
        }
    }

    pub fn controller(&self) -> Option<&SessionController> {
        match &self.screen {
            Screen::Play(controller) => Some(controller),
            _ => None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// True once after any settings toggle; the caller persists them
    pub fn take_settings_changed(&mut self) -> bool {
        std::mem::take(&mut self.settings_changed)
    }

    // === Input ===

    /// Command for a key on the current screen
    pub fn command_for_key(&self, key: Key) -> Option<Command> {
        match (&self.screen, key) {
            (_, Key::M) => Some(Command::ToggleMute),
            (_, Key::F) => Some(Command::ToggleFps),
            (_, Key::B) => Some(Command::ToggleBackgroundFeed),
            (Screen::Menu, Key::Escape) => Some(Command::Quit),
            (Screen::Shop, Key::Escape) => Some(Command::Back),
            (Screen::Capture, Key::Space) => Some(Command::Capture),
            (Screen::Capture, Key::Escape) => Some(Command::Cancel),
            (Screen::Play(_), Key::A) => Some(Command::ToggleAutopilot),
            (Screen::Play(c), Key::Space) if c.is_terminal() => Some(Command::Restart),
            (Screen::Play(c), Key::Escape) if c.is_terminal() => Some(Command::ToMenu),
            (Screen::Play(_), Key::Space) => Some(Command::Flap),
            _ => None,
        }
    }

    /// Command for a click at `point` (logical screen coordinates)
    pub fn command_at(&self, point: Vec2) -> Option<Command> {
        match &self.screen {
            Screen::Menu => {
                if layout::PLAY_BUTTON.contains(point) {
                    Some(Command::Start)
                } else if layout::SHOP_BUTTON.contains(point) {
                    Some(Command::OpenShop)
                } else if layout::CAPTURE_MENU_BUTTON.contains(point) {
                    Some(Command::OpenCapture)
                } else {
                    None
                }
            }
            Screen::Shop => {
                if layout::SHOP_BACK_BUTTON.contains(point) {
                    Some(Command::Back)
                } else {
                    layout::shop_button_at(point).map(Command::SelectVariant)
                }
            }
            Screen::Capture => {
                if layout::CAPTURE_BUTTON.contains(point) {
                    Some(Command::Capture)
                } else if layout::CANCEL_BUTTON.contains(point) {
                    Some(Command::Cancel)
                } else {
                    None
                }
            }
            Screen::Play(c) if c.is_terminal() => {
                if layout::RESTART_BUTTON.contains(point) {
                    Some(Command::Restart)
                } else if layout::MENU_BUTTON.contains(point) {
                    Some(Command::ToMenu)
                } else {
                    None
                }
            }
            Screen::Play(_) => Some(Command::Flap),
        }
    }

    pub fn key(&mut self, key: Key) -> bool {
        match self.command_for_key(key) {
            Some(command) => self.handle(command),
            None => false,
        }
    }

    pub fn click(&mut self, point: Vec2) -> bool {
        match self.command_at(point) {
            Some(command) => self.handle(command),
            None => false,
        }
    }

    /// Apply a command; returns false when it does not apply to the current screen
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => {
                log::info!("Quit requested");
                self.stop_camera();
                self.quit = true;
                return true;
            }
            Command::ToggleMute | Command::ToggleFps | Command::ToggleBackgroundFeed => {
                self.toggle_setting(command);
                return true;
            }
            _ => {}
        }

        match (&mut self.screen, command) {
            (Screen::Menu, Command::Start) => {
                let controller = SessionController::new(
                    self.next_seed(),
                    self.settings.tuning.clone(),
                    self.progress.equipped(),
                );
                self.set_screen(Screen::Play(controller));
            }
            (Screen::Menu, Command::OpenShop) => self.set_screen(Screen::Shop),
            (Screen::Menu, Command::OpenCapture) => {
                self.camera_frame = None;
                if let Some(camera) = self.camera.as_mut() {
                    camera.start();
                } else {
                    log::info!("No camera source; capture will wait");
                }
                self.set_screen(Screen::Capture);
            }
            (Screen::Shop, Command::Back) => self.set_screen(Screen::Menu),
            (Screen::Shop, Command::SelectVariant(variant)) => self.select_variant(variant),
            (Screen::Capture, Command::Capture) => {
                let Some(face) = self.camera_frame.as_ref().and_then(avatar_from_frame) else {
                    log::debug!("No camera frame yet, still waiting");
                    return false;
                };
                log::info!("Custom avatar captured");
                self.custom_avatar = Some(face);
                self.stop_camera();
                self.set_screen(Screen::Menu);
            }
            (Screen::Capture, Command::Cancel) => {
                self.stop_camera();
                self.set_screen(Screen::Menu);
            }
            (Screen::Play(c), Command::Flap) => c.request_flap(),
            (Screen::Play(c), Command::ToggleAutopilot) => c.toggle_autopilot(),
            (Screen::Play(c), Command::Restart) if c.is_terminal() => {
                let seed = self.settings.seed.unwrap_or_else(clock_seed);
                c.restart(seed);
            }
            (Screen::Play(c), Command::ToMenu) if c.is_terminal() => self.set_screen(Screen::Menu),
            (screen, command) => {
                log::trace!("{:?} ignored on {}", command, screen.name());
                return false;
            }
        }
        true
    }

    fn select_variant(&mut self, variant: Variant) {
        let outcome = self.progress.select(variant);
        match outcome {
            ShopOutcome::Purchased { price } => {
                log::info!("Bought {} for {} coins", variant.name(), price)
            }
            ShopOutcome::Equipped => log::info!("Equipped {}", variant.name()),
            ShopOutcome::AlreadyEquipped => {}
            ShopOutcome::InsufficientFunds { price, balance } => {
                log::debug!("{} costs {}, have {}", variant.name(), price, balance)
            }
        }
        if outcome.changed() {
            save_best_effort(self.store.as_mut(), &self.progress);
        }
    }

    fn toggle_setting(&mut self, command: Command) {
        let settings = &mut self.settings;
        let (name, value) = match command {
            Command::ToggleMute => {
                settings.muted = !settings.muted;
                ("muted", settings.muted)
            }
            Command::ToggleFps => {
                settings.show_fps = !settings.show_fps;
                ("show_fps", settings.show_fps)
            }
            Command::ToggleBackgroundFeed => {
                settings.background_feed = !settings.background_feed;
                ("background_feed", settings.background_feed)
            }
            _ => return,
        };
        log::info!("Setting {}: {}", name, value);
        self.settings_changed = true;
    }

    fn next_seed(&self) -> u64 {
        self.settings.seed.unwrap_or_else(clock_seed)
    }

    fn stop_camera(&mut self) {
        if let Some(camera) = self.camera.as_mut() {
            camera.stop();
        }
        self.camera_frame = None;
    }

    fn set_screen(&mut self, screen: Screen) {
        log::info!("Screen: {} -> {}", self.screen.name(), screen.name());
        self.screen = screen;
    }

    // === Frame update ===

    /// Poll media and advance the active session by a frame delta
    pub fn update(&mut self, dt: f32) {
        if self.settings.background_feed {
            if let Some(frame) = self.background_feed.as_mut().and_then(|f| f.poll_frame()) {
                self.background_frame = Some(frame);
            }
        }

        if matches!(self.screen, Screen::Capture) {
            if let Some(frame) = self.camera.as_mut().and_then(|c| c.poll_frame()) {
                self.camera_frame = Some(frame);
            }
        }

        if let Screen::Play(controller) = &mut self.screen {
            let events = controller.update(dt, &mut self.progress, self.store.as_mut());
            let volume = self.settings.effect_volume();
            for effect in events.iter().filter_map(sound_for) {
                assets::play(self.assets.as_ref(), effect, volume);
            }
        }
    }
}
