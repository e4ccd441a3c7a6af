//! Camera and background video frames
//!
//! Frame sources are polled once per tick and must never block: `None` means
//! "no frame right now" and the caller falls back to a static background.

use std::cell::Cell;

use crate::assets::Sprite;
use crate::consts::SCREEN_WIDTH;

/// Side of the square captured from the center of the camera view (screen px)
pub const CAPTURE_BOX: f32 = 200.0;
/// Side of the finished custom avatar (px)
pub const CUSTOM_AVATAR_SIZE: u32 = 40;

/// A non-blocking frame source
pub trait FrameSource {
    /// Latest frame, or `None` if nothing is readable yet
    fn poll_frame(&mut self) -> Option<Sprite>;

    /// Acquire the device (camera) if the source needs one
    fn start(&mut self) {}

    /// Release the device
    fn stop(&mut self) {}
}

/// Bookkeeping for an asynchronous device request (camera permission)
///
/// A request answered after `cancel`, or superseded by a newer one, must be
/// released by the caller instead of being used.
#[derive(Debug, Default)]
pub struct RequestGate {
    generation: Cell<u32>,
    pending: Cell<bool>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a request; `None` while another one is still outstanding
    pub fn begin(&self) -> Option<u32> {
        if self.pending.get() {
            return None;
        }
        self.pending.set(true);
        Some(self.generation.get())
    }

    /// Invalidate any outstanding request
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.pending.set(false);
    }

    /// Close request `ticket`; false means the answer is stale
    pub fn settle(&self, ticket: u32) -> bool {
        if ticket != self.generation.get() {
            return false;
        }
        self.pending.set(false);
        true
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }
}

/// Plays a fixed list of frames on a loop (decoded image sequence)
#[derive(Debug, Clone, Default)]
pub struct LoopingFrames {
    frames: Vec<Sprite>,
    cursor: usize,
}

impl LoopingFrames {
    pub fn new(frames: Vec<Sprite>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for LoopingFrames {
    fn poll_frame(&mut self) -> Option<Sprite> {
        if self.frames.is_empty() {
            return None;
        }
        // Rewind at the end, like a looping video
        let frame = self.frames[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.frames.len();
        Some(frame)
    }
}

/// Turn a raw camera frame into a round custom avatar
///
/// The frame is mirrored, a centered square covering `CAPTURE_BOX` of the
/// 400 px wide screen is cut out, masked to a circle and shrunk to 40x40.
pub fn avatar_from_frame(frame: &Sprite) -> Option<Sprite> {
    if frame.is_empty() {
        return None;
    }
    let mirrored = frame.mirrored();
    let max_side = frame.width.min(frame.height) as f32;
    let side = (frame.width as f32 * CAPTURE_BOX / SCREEN_WIDTH)
        .round()
        .clamp(1.0, max_side) as u32;
    let x = (frame.width - side) / 2;
    let y = (frame.height - side) / 2;
    let face = mirrored
        .cropped(x, y, side, side)
        .resized(CUSTOM_AVATAR_SIZE, CUSTOM_AVATAR_SIZE)
        .circle_masked();
    Some(face)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looping_frames_rewind() {
        let mut source = LoopingFrames::new(vec![
            Sprite::filled(1, 1, [1, 0, 0, 255]),
            Sprite::filled(1, 1, [2, 0, 0, 255]),
        ]);
        let seq: Vec<u8> = (0..5)
            .map(|_| source.poll_frame().unwrap().pixels[0][0])
            .collect();
        assert_eq!(seq, vec![1, 2, 1, 2, 1]);
    }

    #[test]
    fn test_empty_source_yields_nothing() {
        let mut source = LoopingFrames::default();
        assert!(source.poll_frame().is_none());
    }

    #[test]
    fn test_request_answered_in_time_is_used() {
        let gate = RequestGate::new();
        let ticket = gate.begin().unwrap();
        assert!(gate.is_pending());
        assert!(gate.settle(ticket));
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_request_answered_after_cancel_is_stale() {
        let gate = RequestGate::new();
        let ticket = gate.begin().unwrap();
        gate.cancel();
        assert!(!gate.settle(ticket));
        assert!(!gate.is_pending());
    }

    #[test]
    fn test_no_second_request_while_pending() {
        let gate = RequestGate::new();
        let first = gate.begin().unwrap();
        assert!(gate.begin().is_none());

        // Cancel then reopen: only the newer answer counts
        gate.cancel();
        let second = gate.begin().unwrap();
        assert!(!gate.settle(first));
        assert!(gate.is_pending());
        assert!(gate.settle(second));
    }

    #[test]
    fn test_avatar_from_frame_shape() {
        let frame = Sprite::filled(400, 600, [10, 20, 30, 255]);
        let face = avatar_from_frame(&frame).unwrap();
        assert_eq!((face.width, face.height), (40, 40));
        assert_eq!(face.pixel(20, 20), [10, 20, 30, 255]);
        assert_eq!(face.pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_avatar_takes_center_of_frame() {
        // Left half red, right half blue; mirroring swaps them
        let mut frame = Sprite::filled(640, 480, [255, 0, 0, 255]);
        for y in 0..480 {
            for x in 320..640 {
                frame.pixels[(y * 640 + x) as usize] = [0, 0, 255, 255];
            }
        }
        let face = avatar_from_frame(&frame).unwrap();
        assert_eq!(face.pixel(5, 20), [0, 0, 255, 255]);
        assert_eq!(face.pixel(34, 20), [255, 0, 0, 255]);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let frame = Sprite::filled(0, 0, [0; 4]);
        assert!(avatar_from_frame(&frame).is_none());
    }
}
