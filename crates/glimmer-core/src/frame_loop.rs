//! Recurring per-frame task with explicit start and stop.

use crate::Theme;

/// Arms and disarms a renderer's recurring frame callback.
///
/// The host calls [`Renderer::tick`] once per refresh; a frame only runs while
/// the loop is armed, and running it re-arms the loop for the next refresh.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    /// Whether a frame is scheduled for the next refresh.
    armed: bool,
    /// Frames completed since creation.
    frames: u64,
}

impl FrameLoop {
    /// Create a disarmed loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the loop. Starting an armed loop does nothing.
    pub fn start(&mut self) {
        self.armed = true;
    }

    /// Disarm the loop. Returns `true` when a pending frame was cancelled.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.armed, false)
    }

    /// Whether a frame will run on the next refresh.
    pub fn is_running(&self) -> bool {
        self.armed
    }

    /// Number of frames completed.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Record a finished frame. The loop stays armed for the next refresh.
    pub fn complete_frame(&mut self) {
        self.frames += 1;
    }
}

/// A continuously redrawn effect bound to its own surface.
pub trait Renderer {
    /// Paint exactly one frame.
    fn render_frame(&mut self);

    /// The viewport changed size (logical pixels).
    fn on_resize(&mut self, width: f32, height: f32);

    /// The active theme changed.
    fn on_theme_change(&mut self, theme: Theme);

    /// The loop scheduling this renderer's frames.
    fn frame_loop(&self) -> &FrameLoop;

    /// Mutable access to the frame loop.
    fn frame_loop_mut(&mut self) -> &mut FrameLoop;

    /// Arm the recurring frame.
    fn start(&mut self) {
        self.frame_loop_mut().start();
    }

    /// Cancel the pending frame, if any.
    fn stop(&mut self) -> bool {
        self.frame_loop_mut().stop()
    }

    /// Whether frames are currently scheduled.
    fn is_running(&self) -> bool {
        self.frame_loop().is_running()
    }

    /// Called by the host once per refresh. Returns whether a frame was drawn.
    fn tick(&mut self) -> bool {
        if !self.frame_loop().is_running() {
            return false;
        }
        self.render_frame();
        self.frame_loop_mut().complete_frame();
        true
    }
}
