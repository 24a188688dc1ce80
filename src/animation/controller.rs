use super::{Animatable, SpringState, TimingFunction, Transition};

/// Outcome of advancing a controller by one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Not running, still in its delay, or the value did not move
    NoChange,
    /// The value moved
    Changed(T),
    /// The animation came to rest on its target this frame
    Settled(T),
}

impl<T> AdvanceResult<T> {
    pub fn is_changed(&self) -> bool {
        !matches!(self, AdvanceResult::NoChange)
    }
}

/// Drives one animated value from its current value to a target.
///
/// Time is supplied by the caller through [`advance`](Self::advance), so the
/// same controller runs off a real clock or a fixed test step.
pub struct SpringController<T: Animatable> {
    current: T,
    start: T,
    target: T,
    transition: Transition,
    spring: SpringState,
    /// Seconds since the current run started, delay included
    elapsed: f32,
    running: bool,
}

impl<T: Animatable> SpringController<T> {
    pub fn new(initial: T, transition: Transition) -> Self {
        Self {
            current: initial.clone(),
            start: initial.clone(),
            target: initial,
            transition,
            spring: SpringState::new(),
            elapsed: 0.0,
            running: false,
        }
    }

    /// Start animating towards `target` from wherever the value is now.
    ///
    /// Heading for the target already set is a no-op, so re-running a
    /// reactive target with an unchanged value does not restart the motion.
    pub fn animate_to(&mut self, target: T) {
        if target == self.target {
            return;
        }
        self.start = self.current.clone();
        self.target = target;
        self.spring = SpringState::new();
        self.elapsed = 0.0;
        self.running = self.start != self.target;
    }

    /// Jump to `value` without animating.
    pub fn set_immediate(&mut self, value: T) {
        self.current = value.clone();
        self.start = value.clone();
        self.target = value;
        self.running = false;
    }

    /// Freeze at the current value.
    pub fn stop(&mut self) {
        self.target = self.current.clone();
        self.running = false;
    }

    pub fn advance(&mut self, dt: f32) -> AdvanceResult<T> {
        if !self.running {
            return AdvanceResult::NoChange;
        }

        let delay = self.transition.delay_ms / 1000.0;
        let before = self.elapsed;
        self.elapsed += dt.max(0.0);
        if self.elapsed <= delay {
            return AdvanceResult::NoChange;
        }
        // Only the part of this frame past the delay moves the value.
        let active_dt = self.elapsed - before.max(delay);

        let (t, done) = match &self.transition.timing {
            TimingFunction::Spring(config) => {
                let position = self.spring.step(active_dt, config);
                (position, self.spring.is_settled(config.precision))
            }
            timing => {
                let duration = self.transition.duration_ms / 1000.0;
                let progress = if duration > 0.0 {
                    (self.elapsed - delay) / duration
                } else {
                    1.0
                };
                (timing.evaluate(progress), progress >= 1.0)
            }
        };

        if done {
            self.running = false;
            self.current = self.target.clone();
            return AdvanceResult::Settled(self.current.clone());
        }

        let value = T::lerp(&self.start, &self.target, t);
        if value == self.current {
            return AdvanceResult::NoChange;
        }
        self.current = value.clone();
        AdvanceResult::Changed(value)
    }

    pub fn is_animating(&self) -> bool {
        self.running
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}
