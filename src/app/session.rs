//! Session controller
//!
//! Wraps a `Session` with the fixed-timestep accumulator, input coalescing and
//! the side effects the pure simulation does not perform (currency and saves).

use crate::assets::SoundEffect;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::persistence::{ProgressStore, save_best_effort};
use crate::progress::Progress;
use crate::sim::{CrashCause, GameEvent, Session, TickInput, tick};
use crate::tuning::Tuning;
use crate::variants::Variant;

/// Drives one session at a fixed rate
#[derive(Debug, Clone)]
pub struct SessionController {
    session: Session,
    accumulator: f32,
    /// Flap requested since the last tick
    pending_flap: bool,
    autopilot: bool,
}

impl SessionController {
    pub fn new(seed: u64, tuning: Tuning, variant: Variant) -> Self {
        log::info!("Session started ({}, seed {})", variant.name(), seed);
        Self {
            session: Session::new(seed, tuning, variant),
            accumulator: 0.0,
            pending_flap: false,
            autopilot: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_terminal(&self) -> bool {
        !self.session.is_active()
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.autopilot != on {
            log::info!("Autopilot: {}", on);
        }
        self.autopilot = on;
    }

    pub fn toggle_autopilot(&mut self) {
        self.set_autopilot(!self.autopilot);
    }

    /// Queue a flap; several requests before the next tick count once
    pub fn request_flap(&mut self) {
        if self.session.is_active() {
            self.pending_flap = true;
        }
    }

    /// Fresh session with the same variant and tuning
    pub fn restart(&mut self, seed: u64) {
        let variant = self.session.avatar.variant;
        let tuning = self.session.tuning.clone();
        let autopilot = self.autopilot;
        *self = Self::new(seed, tuning, variant);
        self.autopilot = autopilot;
    }

    /// Advance by a frame delta, running as many fixed ticks as are due
    ///
    /// Coin pickups are credited to `progress` and saved immediately.
    pub fn update(
        &mut self,
        dt: f32,
        progress: &mut Progress,
        store: &mut dyn ProgressStore,
    ) -> Vec<GameEvent> {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                flap: std::mem::take(&mut self.pending_flap),
                autopilot: self.autopilot,
            };
            let tick_events = tick(&mut self.session, &input, SIM_DT);
            for event in &tick_events {
                self.apply(event, progress, store);
            }
            events.extend(tick_events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn apply(&self, event: &GameEvent, progress: &mut Progress, store: &mut dyn ProgressStore) {
        match *event {
            GameEvent::Collected { id } => {
                progress.add_coins(1);
                log::debug!("Coin from obstacle {} ({} total)", id, progress.coins());
                save_best_effort(store, progress);
            }
            GameEvent::Scored { score, .. } => log::debug!("Score {}", score),
            GameEvent::Crash(cause) => {
                let what = match cause {
                    CrashCause::OutOfBounds => "left the screen".to_string(),
                    CrashCause::Obstacle { id } => format!("hit obstacle {}", id),
                };
                log::info!(
                    "Session over: {} (score {}, coins {})",
                    what,
                    self.session.score,
                    self.session.coins_earned
                );
            }
            GameEvent::Flap | GameEvent::Spawned { .. } => {}
        }
    }
}

/// Sound played for a simulation event
pub fn sound_for(event: &GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Flap => Some(SoundEffect::Flap),
        GameEvent::Scored { .. } => Some(SoundEffect::Score),
        GameEvent::Crash(_) => Some(SoundEffect::Crash),
        GameEvent::Collected { .. } => Some(SoundEffect::Collect),
        GameEvent::Spawned { .. } => None,
    }
}
