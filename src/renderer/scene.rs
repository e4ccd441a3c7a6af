//! Scene building
//!
//! Turns the app state into an ordered list of draw commands: runs of solid
//! geometry interleaved with sprite quads. Text is drawn by the DOM overlay.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors, with_alpha};
use crate::app::{App, Screen, layout};
use crate::assets::{Sprite, SpriteKey};
use crate::consts::{HEADER_HEIGHT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{Avatar, Obstacle, Rect, Session};
use crate::variants::Variant;

/// Pipe cap size
const CAP_HEIGHT: f32 = 25.0;
const CAP_OVERHANG: f32 = 6.0;
/// Alpha of the white wash over live video
const VIDEO_OVERLAY_ALPHA: f32 = 30.0 / 255.0;
const SEGMENTS: u32 = 24;

/// Texture identity for the GPU cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteSlot {
    /// Static asset, uploaded once
    Asset(SpriteKey),
    CustomAvatar,
    /// Dynamic frames, re-uploaded every frame
    BackgroundFrame,
    CameraFrame,
}

impl SpriteSlot {
    pub fn is_dynamic(self) -> bool {
        matches!(self, SpriteSlot::BackgroundFrame | SpriteSlot::CameraFrame)
    }
}

/// One draw step
#[derive(Debug)]
pub enum DrawCmd<'a> {
    Shapes(Vec<Vertex>),
    Sprite {
        slot: SpriteSlot,
        sprite: &'a Sprite,
        rect: Rect,
        tint: [f32; 4],
        flip_x: bool,
    },
}

/// Ordered draw list for one frame
#[derive(Debug, Default)]
pub struct Scene<'a> {
    pub commands: Vec<DrawCmd<'a>>,
}

impl<'a> Scene<'a> {
    /// Append solid geometry, merging with a preceding shape run
    pub fn shapes(&mut self, vertices: Vec<Vertex>) {
        if let Some(DrawCmd::Shapes(run)) = self.commands.last_mut() {
            run.extend(vertices);
        } else {
            self.commands.push(DrawCmd::Shapes(vertices));
        }
    }

    pub fn sprite(&mut self, slot: SpriteSlot, sprite: &'a Sprite, rect: Rect) {
        self.commands.push(DrawCmd::Sprite {
            slot,
            sprite,
            rect,
            tint: colors::WHITE,
            flip_x: false,
        });
    }

    /// Total vertices this scene produces
    pub fn vertex_count(&self) -> usize {
        self.commands
            .iter()
            .map(|cmd| match cmd {
                DrawCmd::Shapes(v) => v.len(),
                DrawCmd::Sprite { .. } => 6,
            })
            .sum()
    }
}

/// Build the draw list for the current screen
pub fn build(app: &App) -> Scene<'_> {
    let mut scene = Scene::default();
    match app.screen() {
        Screen::Menu => menu(&mut scene, app),
        Screen::Shop => shop(&mut scene, app),
        Screen::Capture => capture(&mut scene, app),
        Screen::Play(controller) => play(&mut scene, app, controller.session()),
    }
    scene
}

/// Video frame with a light wash, else the background image, else flat fill
fn background<'a>(scene: &mut Scene<'a>, app: &'a App) {
    let full = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    if let Some(frame) = app.background_frame() {
        scene.sprite(SpriteSlot::BackgroundFrame, frame, full);
        scene.shapes(shapes::rect(full, with_alpha(colors::WHITE, VIDEO_OVERLAY_ALPHA)));
    } else if let Some(image) = app.assets().sprite(SpriteKey::Background) {
        scene.sprite(SpriteSlot::Asset(SpriteKey::Background), image, full);
    } else {
        scene.shapes(shapes::rect(full, colors::BACKGROUND));
    }
}

fn header(scene: &mut Scene<'_>, color: [f32; 4]) {
    let mut v = shapes::rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, HEADER_HEIGHT), color);
    v.extend(shapes::rect(
        Rect::new(0.0, HEADER_HEIGHT - 1.0, SCREEN_WIDTH, 2.0),
        colors::HEADER_LINE,
    ));
    scene.shapes(v);
}

/// Button body with its drop shadow
fn button(r: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut v = shapes::rounded_rect(r.translated(Vec2::new(0.0, 2.0)), 8.0, colors::SHADOW);
    v.extend(shapes::rounded_rect(r, 8.0, color));
    v
}

fn menu<'a>(scene: &mut Scene<'a>, app: &'a App) {
    background(scene, app);
    header(scene, colors::WHITE);

    let mut v = button(layout::PLAY_BUTTON, colors::BRAND);
    v.extend(button(layout::SHOP_BUTTON, colors::WHITE));
    v.extend(button(layout::CAPTURE_MENU_BUTTON, colors::WHITE));
    // Coin balance pill
    v.extend(shapes::rounded_rect(
        Rect::new(20.0, SCREEN_HEIGHT - 60.0, 120.0, 40.0),
        20.0,
        colors::WHITE,
    ));
    scene.shapes(v);

    if let Some(face) = app.custom_avatar() {
        let r = Rect::around(layout::CAPTURE_MENU_BUTTON.center() + Vec2::new(60.0, 0.0), 20.0);
        scene.sprite(SpriteSlot::CustomAvatar, face, r);
    }
}

fn shop<'a>(scene: &mut Scene<'a>, app: &'a App) {
    scene.shapes(shapes::rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT),
        colors::BACKGROUND,
    ));
    header(scene, colors::WHITE);
    scene.shapes(shapes::rect(
        Rect::new(0.0, HEADER_HEIGHT, SCREEN_WIDTH, 40.0),
        colors::WHITE,
    ));

    let progress = app.progress();
    for variant in Variant::ALL {
        let card = layout::shop_card(variant);
        scene.shapes(shapes::rounded_rect(card, 12.0, colors::CARD));

        let preview_center = Vec2::new(card.x + 40.0, card.center().y);
        match app.assets().sprite(SpriteKey::Avatar(variant)) {
            Some(sprite) => scene.sprite(
                SpriteSlot::Asset(SpriteKey::Avatar(variant)),
                sprite,
                Rect::new(preview_center.x - 20.0, preview_center.y - 16.0, 40.0, 32.0),
            ),
            None => scene.shapes(shapes::circle(preview_center, 20.0, variant.color(), SEGMENTS)),
        }

        let btn = layout::shop_card_button(variant);
        let v = if progress.is_equipped(variant) {
            button(btn, colors::BACKGROUND)
        } else if progress.is_unlocked(variant) {
            button(btn, colors::GREEN)
        } else {
            let mut v = button(btn, colors::WHITE);
            v.extend(shapes::rect_outline(btn, 1.0, colors::GREEN));
            v
        };
        scene.shapes(v);
    }

    scene.shapes(button(layout::SHOP_BACK_BUTTON, colors::BRAND));
}

fn capture<'a>(scene: &mut Scene<'a>, app: &'a App) {
    let full = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    match app.camera_frame() {
        Some(frame) => scene.commands.push(DrawCmd::Sprite {
            slot: SpriteSlot::CameraFrame,
            sprite: frame,
            rect: full,
            tint: colors::WHITE,
            flip_x: true,
        }),
        None => scene.shapes(shapes::rect(full, colors::BLACK)),
    }

    let radius = crate::media::CAPTURE_BOX / 2.0;
    let mut v = shapes::ring(
        layout::CAPTURE_CIRCLE_CENTER,
        radius - 3.0,
        radius,
        colors::WHITE,
        48,
    );
    v.extend(shapes::rect(
        Rect::new(0.0, 0.0, SCREEN_WIDTH, HEADER_HEIGHT),
        colors::BRAND,
    ));
    v.extend(button(layout::CAPTURE_BUTTON, colors::BRAND));
    v.extend(button(layout::CANCEL_BUTTON, colors::WHITE));
    scene.shapes(v);
}

fn play<'a>(scene: &mut Scene<'a>, app: &'a App, session: &Session) {
    background(scene, app);
    header(scene, colors::WHITE);

    for obstacle in &session.obstacles {
        scene.shapes(pipe(obstacle, true));
        scene.shapes(pipe(obstacle, false));
        coin(scene, app, obstacle, session.tuning.coin_bob_amplitude);
    }

    avatar(scene, app, &session.avatar);

    if session.is_active() {
        // Score pill
        scene.shapes(shapes::rounded_rect(
            Rect::new(SCREEN_WIDTH - 120.0, 70.0, 100.0, 30.0),
            15.0,
            colors::WHITE,
        ));
    } else {
        let mut v = shapes::rounded_rect(layout::GAME_OVER_CARD, 15.0, colors::WHITE);
        v.extend(button(layout::RESTART_BUTTON, colors::BRAND));
        v.extend(button(layout::MENU_BUTTON, colors::WHITE));
        scene.shapes(v);
    }
}

/// One pipe half: body, highlight stripe, border and cap at the gap side
fn pipe(obstacle: &Obstacle, top: bool) -> Vec<Vertex> {
    let r = if top {
        obstacle.top_rect()
    } else {
        obstacle.bottom_rect()
    };
    let mut v = shapes::rect(r, colors::PIPE_BODY);
    v.extend(shapes::rect(
        Rect::new(r.x + 5.0, r.y, 10.0, r.h),
        colors::PIPE_HIGHLIGHT,
    ));
    v.extend(shapes::rect_outline(r, 2.0, colors::BRAND));

    let cap_y = if top { r.bottom() - CAP_HEIGHT } else { r.top() };
    let cap = Rect::new(
        r.x - CAP_OVERHANG,
        cap_y,
        r.w + CAP_OVERHANG * 2.0,
        CAP_HEIGHT,
    );
    v.extend(shapes::rect(cap, colors::BRAND));
    v.extend(shapes::rect(Rect::new(cap.x, cap.y, cap.w, 2.0), colors::PIPE_CAP_LINE));
    v.extend(shapes::rect_outline(cap, 1.0, colors::BLACK));
    v
}

fn coin<'a>(scene: &mut Scene<'a>, app: &'a App, obstacle: &Obstacle, amplitude: f32) {
    let Some(coin) = obstacle.coin.as_ref().filter(|c| !c.collected) else {
        return;
    };
    let region = coin.hit_region(amplitude);
    match app.assets().sprite(SpriteKey::Coin) {
        Some(sprite) => scene.sprite(SpriteSlot::Asset(SpriteKey::Coin), sprite, region),
        None => {
            let c = region.center();
            let r = coin.radius;
            let mut v = shapes::circle(c, r, colors::GOLD_DARK, SEGMENTS);
            v.extend(shapes::circle(c, r - 2.0, colors::GOLD, SEGMENTS));
            v.extend(shapes::circle(c - Vec2::splat(5.0), 3.0, colors::WHITE, 8));
            v.extend(shapes::ring(c, r - 1.0, r, colors::BRAND, SEGMENTS));
            scene.shapes(v);
        }
    }
}

/// Custom face with a white ring, else the variant sprite, else a block in the variant color
fn avatar<'a>(scene: &mut Scene<'a>, app: &'a App, avatar: &Avatar) {
    let bounds = avatar.bounds();
    if let Some(face) = app.custom_avatar() {
        let side = face.width.min(face.height) as f32;
        scene.sprite(
            SpriteSlot::CustomAvatar,
            face,
            Rect::new(bounds.x, bounds.y, side, side),
        );
        let radius = bounds.w / 2.0;
        scene.shapes(shapes::ring(
            bounds.center(),
            radius - 2.0,
            radius,
            colors::WHITE,
            SEGMENTS,
        ));
    } else if let Some(sprite) = app.assets().sprite(SpriteKey::Avatar(avatar.variant)) {
        scene.sprite(SpriteSlot::Asset(SpriteKey::Avatar(avatar.variant)), sprite, bounds);
    } else {
        scene.shapes(shapes::rect(bounds, avatar.variant.color()));
    }
}
