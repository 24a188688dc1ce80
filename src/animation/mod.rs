//! Spring engine: physics, timing curves, per-value controllers, the frame
//! loop that ticks them, and the animated values handed to views.

mod animatable;
mod controller;
pub mod frame_loop;
mod spring;
mod timing;
mod value;

pub use animatable::Animatable;
pub use controller::{AdvanceResult, SpringController};
pub use frame_loop::AnimationId;
pub use spring::{SpringConfig, SpringState};
pub use timing::TimingFunction;
pub use value::{AnimatedValue, Interpolated};

/// How a value travels to a new target.
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration in milliseconds; ignored by springs, which run until at rest
    pub duration_ms: f32,
    pub timing: TimingFunction,
    /// Delay before the motion starts in milliseconds
    pub delay_ms: f32,
}

impl Transition {
    pub fn new(duration_ms: f32, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    pub fn spring(config: SpringConfig) -> Self {
        Self::new(0.0, TimingFunction::Spring(config))
    }

    pub fn delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::spring(SpringConfig::DEFAULT)
    }
}

impl From<SpringConfig> for Transition {
    fn from(config: SpringConfig) -> Self {
        Self::spring(config)
    }
}
