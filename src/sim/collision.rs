//! Collision detection and scoring
//!
//! Runs once per tick after movement. Obstacles are processed oldest first and
//! every effect found in a tick is applied; a crash only freezes later ticks.

use super::state::{CrashCause, GameEvent, Session, SessionPhase};

/// Resolve bounds, pipe hits, scoring and coin pickups for the current tick
pub fn resolve(session: &mut Session, events: &mut Vec<GameEvent>) {
    if !session.is_active() {
        return;
    }

    let tuning = &session.tuning;
    let avatar = &session.avatar;
    let mut crash: Option<CrashCause> = None;

    if avatar.y >= tuning.screen_height || avatar.y <= 0.0 {
        crash = Some(CrashCause::OutOfBounds);
    }

    let hit_region = avatar.hit_region(tuning.hit_inset);
    let avatar_x = avatar.x;
    let bob_amplitude = tuning.coin_bob_amplitude;

    for obstacle in &mut session.obstacles {
        if crash.is_none()
            && (hit_region.intersects(&obstacle.top_rect())
                || hit_region.intersects(&obstacle.bottom_rect()))
        {
            crash = Some(CrashCause::Obstacle { id: obstacle.id });
        }

        if !obstacle.passed && avatar_x > obstacle.right() {
            obstacle.passed = true;
            session.score += 1;
            events.push(GameEvent::Scored {
                id: obstacle.id,
                score: session.score,
            });
        }

        if let Some(coin) = &mut obstacle.coin {
            if !coin.collected && hit_region.intersects(&coin.hit_region(bob_amplitude)) {
                coin.collected = true;
                session.coins_earned += 1;
                events.push(GameEvent::Collected { id: obstacle.id });
            }
        }
    }

    if let Some(cause) = crash {
        session.phase = SessionPhase::Terminal;
        events.push(GameEvent::Crash(cause));
    }
}

/// Drop every obstacle that has fully left the screen
pub fn remove_offscreen(session: &mut Session) {
    session.obstacles.retain(|o| !o.is_offscreen());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use crate::variants::Variant;

    fn session() -> Session {
        Session::new(1, Tuning::default(), Variant::Classic)
    }

    #[test]
    fn test_bounds_crash_top_and_bottom() {
        for y in [0.0, -3.0, 600.0, 640.0] {
            let mut s = session();
            s.avatar.y = y;
            let mut events = Vec::new();
            resolve(&mut s, &mut events);
            assert_eq!(s.phase, SessionPhase::Terminal, "y = {}", y);
            assert_eq!(events, vec![GameEvent::Crash(CrashCause::OutOfBounds)]);
        }
    }

    #[test]
    fn test_inside_gap_no_crash() {
        let mut s = session();
        let id = s.push_obstacle(40.0, 200.0, false);
        s.avatar.y = 210.0;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        assert!(s.is_active());
        assert!(events.is_empty());
        assert_eq!(s.obstacles[0].id, id);
    }

    #[test]
    fn test_pipe_hit_uses_contracted_region() {
        let mut s = session();
        s.push_obstacle(40.0, 200.0, false);
        // Nominal box (196..236) overlaps the top pipe; inset box (201..231) does not
        s.avatar.y = 196.0;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        assert!(s.is_active());

        s.avatar.y = 190.0;
        resolve(&mut s, &mut events);
        assert_eq!(s.phase, SessionPhase::Terminal);
        assert!(matches!(
            events.last(),
            Some(GameEvent::Crash(CrashCause::Obstacle { .. }))
        ));
    }

    #[test]
    fn test_score_once_per_obstacle() {
        let mut s = session();
        let id = s.push_obstacle(-25.0, 200.0, false);
        s.avatar.y = 250.0;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        resolve(&mut s, &mut events);
        assert_eq!(s.score, 1);
        assert_eq!(events, vec![GameEvent::Scored { id, score: 1 }]);
    }

    #[test]
    fn test_not_scored_at_exact_edge() {
        let mut s = session();
        // Right edge at exactly x = 50
        s.push_obstacle(-20.0, 200.0, false);
        s.avatar.y = 250.0;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        assert_eq!(s.score, 0);
        assert!(!s.obstacles[0].passed);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut s = session();
        // Coin centered at (75, 285)
        let id = s.push_obstacle(40.0, 200.0, true);
        s.avatar.y = 265.0;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        resolve(&mut s, &mut events);
        assert_eq!(s.coins_earned, 1);
        assert_eq!(events, vec![GameEvent::Collected { id }]);
        assert!(s.obstacles[0].coin.as_ref().unwrap().collected);
    }

    #[test]
    fn test_crash_and_pickup_same_tick() {
        let mut s = session();
        s.push_obstacle(40.0, 200.0, true);
        s.avatar.y = 265.0;
        // A second pipe directly on the avatar
        s.push_obstacle(40.0, 400.0, false);
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        assert_eq!(s.phase, SessionPhase::Terminal);
        assert_eq!(s.coins_earned, 1);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::Collected { .. }));
        assert!(matches!(events[1], GameEvent::Crash(_)));
    }

    #[test]
    fn test_terminal_freezes_scoring() {
        let mut s = session();
        s.push_obstacle(-25.0, 200.0, true);
        s.phase = SessionPhase::Terminal;
        let mut events = Vec::new();
        resolve(&mut s, &mut events);
        assert_eq!(s.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_remove_offscreen() {
        let mut s = session();
        s.push_obstacle(-71.0, 200.0, false);
        s.push_obstacle(-70.0, 200.0, false);
        s.push_obstacle(100.0, 200.0, false);
        remove_offscreen(&mut s);
        assert_eq!(s.obstacles.len(), 2);
        assert_eq!(s.obstacles[0].x, -70.0);
    }
}
