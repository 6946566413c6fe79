//! Fixed-rate sprite animation.
//!
//! A `FrameAnimator` splits one looping cycle of `length` seconds into
//! `frame_count` equal slices. The current frame is derived from the owned
//! timer on demand; nothing but the timer's elapsed time is stored.

use serde::Deserialize;

use crate::timer::PeriodicTimer;

/// Declarative animation definition, as it appears in resource manifests.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AnimationSpec {
    pub frame_count: u32,
    /// Seconds per full cycle.
    pub length: f32,
}

impl AnimationSpec {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_count == 0 {
            return Err("Animation validation failed: frame_count must be >= 1".to_string());
        }
        if !(self.length > 0.0) {
            return Err(format!(
                "Animation validation failed: length must be > 0, got {}",
                self.length
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnimator {
    timer: PeriodicTimer,
    frame_count: u32,
}

impl FrameAnimator {
    /// `frame_count` must be at least 1 and `length` positive.
    pub fn new(frame_count: u32, length: f32) -> Self {
        debug_assert!(frame_count >= 1, "animator needs at least one frame");
        Self {
            timer: PeriodicTimer::new(length),
            frame_count,
        }
    }

    pub fn from_spec(spec: AnimationSpec) -> Self {
        Self::new(spec.frame_count, spec.length)
    }

    pub fn step(&mut self, dt: f32) {
        self.timer.step(dt);
    }

    pub fn current_frame(&self) -> u32 {
        let slice = self.timer.length() / self.frame_count as f32;
        let frame = (self.timer.elapsed() / slice).floor();
        (frame.max(0.0) as u32).min(self.frame_count - 1)
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn length(&self) -> f32 {
        self.timer.length()
    }

    pub fn timer(&self) -> &PeriodicTimer {
        &self.timer
    }
}
