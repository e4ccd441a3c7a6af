//! Audio using the Web Audio API
//!
//! Procedurally generated sound effects registered into the asset registry,
//! so no sound files are needed in the browser.

use std::rc::Rc;

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::assets::{Assets, SoundEffect, SoundHandle};

/// One procedural effect bound to the shared audio context
pub struct Tone {
    ctx: Rc<AudioContext>,
    effect: SoundEffect,
}

impl SoundHandle for Tone {
    fn play(&self, volume: f32) {
        let ctx = self.ctx.as_ref();

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match self.effect {
            SoundEffect::Flap => play_flap(ctx, volume),
            SoundEffect::Score => play_score(ctx, volume),
            SoundEffect::Crash => play_crash(ctx, volume),
            SoundEffect::Collect => play_collect(ctx, volume),
        }
    }
}

/// Register a tone for every effect; leaves the registry silent if audio is unavailable
pub fn register_tones(assets: &mut Assets) {
    let ctx = match AudioContext::new() {
        Ok(ctx) => Rc::new(ctx),
        Err(_) => {
            log::warn!("Failed to create AudioContext - audio disabled");
            return;
        }
    };
    for effect in SoundEffect::ALL {
        assets.insert_sound(
            effect,
            Box::new(Tone {
                ctx: ctx.clone(),
                effect,
            }),
        );
    }
    log::info!("Audio ready ({} tones)", assets.sound_count());
}

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Flap - short upward chirp
fn play_flap(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.1)
        .ok();
    osc.frequency().set_value_at_time(300.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(700.0, t + 0.08)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.12).ok();
}

/// Score - two-note ding
fn play_score(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();
    for (i, freq) in [880.0, 1320.0].into_iter().enumerate() {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Sine) else {
            continue;
        };
        let start = t + i as f64 * 0.07;
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().set_value_at_time(vol * 0.3, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + 0.15)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + 0.18).ok();
    }
}

/// Crash - falling buzz over a low thump
fn play_crash(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = create_osc(ctx, 400.0, OscillatorType::Sawtooth) {
        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.4)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.45).ok();
    }

    if let Some((osc, gain)) = create_osc(ctx, 70.0, OscillatorType::Sine) {
        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }
}

/// Collect - bright coin arpeggio
fn play_collect(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();
    for (i, freq) in [988.0, 1319.0, 1976.0].into_iter().enumerate() {
        let Some((osc, gain)) = create_osc(ctx, freq, OscillatorType::Square) else {
            continue;
        };
        let start = t + i as f64 * 0.05;
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().set_value_at_time(vol * 0.15, start).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, start + 0.1)
            .ok();
        osc.start_with_when(start).ok();
        osc.stop_with_when(start + 0.12).ok();
    }
}
