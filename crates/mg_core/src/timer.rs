//! Fixed-period timer driven by variable frame deltas.
//!
//! `step` wraps `elapsed` at most once per call. A delta spanning several
//! periods leaves `elapsed >= length` until later steps catch up; callers that
//! need every period accounted for must step with smaller slices.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicTimer {
    length: f32,
    elapsed: f32,
    fired: bool,
}

impl PeriodicTimer {
    pub fn new(length: f32) -> Self {
        debug_assert!(length > 0.0, "timer length must be positive, got {length}");
        Self {
            length,
            elapsed: 0.0,
            fired: false,
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.fired = false;
        self.elapsed += dt;

        if self.elapsed >= self.length {
            self.elapsed -= self.length;
            self.fired = true;
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.fired = false;
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// True only for the step in which `elapsed` wrapped.
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
