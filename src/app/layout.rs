//! Screen layout in logical 400x600 coordinates
//!
//! Shared by the renderer (where to draw) and the app (what a click hits).

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::Rect;
use crate::variants::Variant;

// Menu
pub const PLAY_BUTTON: Rect = Rect::new(20.0, 200.0, 360.0, 100.0);
pub const SHOP_BUTTON: Rect = Rect::new(20.0, 320.0, 175.0, 80.0);
pub const CAPTURE_MENU_BUTTON: Rect = Rect::new(205.0, 320.0, 175.0, 80.0);

// Shop
pub const SHOP_FIRST_CARD_Y: f32 = 110.0;
pub const SHOP_CARD_HEIGHT: f32 = 62.0;
/// Six cards must end above the back button
pub const SHOP_CARD_SPACING: f32 = 70.0;
pub const SHOP_BUTTON_SIZE: Vec2 = Vec2::new(80.0, 30.0);
pub const SHOP_BACK_BUTTON: Rect = Rect::new(20.0, SCREEN_HEIGHT - 60.0, 360.0, 45.0);

// Capture
pub const CAPTURE_BUTTON: Rect = Rect::new(70.0, SCREEN_HEIGHT - 100.0, 120.0, 50.0);
pub const CANCEL_BUTTON: Rect = Rect::new(210.0, SCREEN_HEIGHT - 100.0, 120.0, 50.0);
pub const CAPTURE_CIRCLE_CENTER: Vec2 = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);

// Game over
pub const GAME_OVER_CARD: Rect = Rect::new(20.0, 150.0, 360.0, 340.0);
pub const RESTART_BUTTON: Rect = Rect::new(20.0, 360.0, 360.0, 50.0);
pub const MENU_BUTTON: Rect = Rect::new(20.0, 420.0, 360.0, 50.0);

/// Full card rect for a shop row
pub fn shop_card(variant: Variant) -> Rect {
    let y = SHOP_FIRST_CARD_Y + variant.index() as f32 * SHOP_CARD_SPACING;
    Rect::new(20.0, y, SCREEN_WIDTH - 40.0, SHOP_CARD_HEIGHT)
}

/// ADD / EQUIP button inside a shop card (right-aligned, vertically centered)
pub fn shop_card_button(variant: Variant) -> Rect {
    let card = shop_card(variant);
    Rect::new(
        card.right() - SHOP_BUTTON_SIZE.x - 10.0,
        card.y + (card.h - SHOP_BUTTON_SIZE.y) / 2.0,
        SHOP_BUTTON_SIZE.x,
        SHOP_BUTTON_SIZE.y,
    )
}

/// Variant whose card button contains `point`
pub fn shop_button_at(point: Vec2) -> Option<Variant> {
    Variant::ALL
        .into_iter()
        .find(|&v| shop_card_button(v).contains(point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_cards_fit_above_back_button() {
        let last = shop_card(Variant::Penguin);
        assert!(last.bottom() <= SHOP_BACK_BUTTON.top());
    }

    #[test]
    fn test_shop_button_hit() {
        let button = shop_card_button(Variant::Dragon);
        assert_eq!(shop_button_at(button.center()), Some(Variant::Dragon));
        // Card body outside the button does nothing
        let card = shop_card(Variant::Dragon);
        assert_eq!(shop_button_at(Vec2::new(card.x + 10.0, card.center().y)), None);
    }

    #[test]
    fn test_buttons_do_not_overlap() {
        assert!(!SHOP_BUTTON.intersects(&CAPTURE_MENU_BUTTON));
        assert!(!CAPTURE_BUTTON.intersects(&CANCEL_BUTTON));
        assert!(!RESTART_BUTTON.intersects(&MENU_BUTTON));
    }
}
