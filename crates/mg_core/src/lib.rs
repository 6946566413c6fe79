pub mod animation;
pub mod input;
pub mod timer;

pub use animation::FrameAnimator;
pub use input::{InputState, Key};
pub use timer::PeriodicTimer;
