//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    /// Update the timer against an explicit clock reading
    pub fn update_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instant of the most recent update
    pub fn last_frame(&self) -> Instant {
        self.last_frame
    }
}

/// Frames-per-second counter averaged over one-second windows
///
/// The reported value only changes once a full second has been observed, so a
/// HUD reading it does not flicker every frame.
pub struct FrameCounter {
    window_start: Instant,
    frames_in_window: u32,
    fps: f32,
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCounter {
    const WINDOW: Duration = Duration::from_secs(1);

    /// Create a counter with an empty window starting now
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a counter whose first window starts at `start`
    pub fn starting_at(start: Instant) -> Self {
        Self {
            window_start: start,
            frames_in_window: 0,
            fps: 0.0,
        }
    }

    /// Record one frame
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record one frame at an explicit clock reading
    pub fn tick_at(&mut self, now: Instant) {
        self.frames_in_window += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Self::WINDOW {
            self.fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
            self.frames_in_window = 0;
            self.window_start = now;
        }
    }

    /// FPS measured over the last completed window
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Time budget for one frame at the given target rate
///
/// Returns `None` for an unlimited (or zero) target.
pub fn frame_budget(target_fps: Option<u32>) -> Option<Duration> {
    match target_fps {
        Some(fps) if fps > 0 => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
        _ => None,
    }
}
