//! `use_spring`: bind a spring to a reactive target.
//!
//! ```ignore
//! let length = create_signal(0.0f32);
//! let dash = use_spring(SpringProps::new(length).config(SpringConfig::MOLASSES));
//! let offset = dash.value().interpolate(move |d| length.get() - d);
//! ```
//!
//! The target is read inside an effect, so any signal it reads retargets the
//! spring. The spring ticks on the frame loop only while it moves, and the
//! effect and the frame-loop registration are torn down with the current
//! owner.

use std::cell::RefCell;
use std::rc::Rc;

use crate::animation::{
    AdvanceResult, Animatable, AnimatedValue, AnimationId, SpringConfig, SpringController,
    Transition, frame_loop,
};
use crate::reactive::{
    Effect, IntoMaybeDyn, MaybeDyn, Signal, create_effect, create_signal, current_owner,
    on_cleanup,
};

type RestCallback<T> = Rc<dyn Fn(&T)>;

/// Input of [`use_spring`].
pub struct SpringProps<T: Animatable> {
    to: MaybeDyn<T>,
    from: Option<T>,
    transition: Transition,
    immediate: bool,
    on_rest: Option<RestCallback<T>>,
}

impl<T: Animatable> SpringProps<T> {
    /// Animate towards `to`, a fixed value, a signal or a closure.
    pub fn new(to: impl IntoMaybeDyn<T>) -> Self {
        Self {
            to: to.into_maybe_dyn(),
            from: None,
            transition: Transition::default(),
            immediate: false,
            on_rest: None,
        }
    }

    /// Start from `from` and animate to the target right away. Without it
    /// the spring starts at rest on the initial target.
    pub fn from(mut self, from: T) -> Self {
        self.from = Some(from);
        self
    }

    pub fn config(mut self, config: SpringConfig) -> Self {
        self.transition = Transition::spring(config);
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Jump to every new target instead of animating.
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Called each time the spring comes to rest.
    pub fn on_rest(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.on_rest = Some(Rc::new(f));
        self
    }
}

struct SpringShared<T: Animatable> {
    controller: RefCell<SpringController<T>>,
    value: Signal<T>,
    immediate: bool,
}

impl<T: Animatable> SpringShared<T> {
    fn retarget(&self, animation: AnimationId, target: T) {
        if self.immediate {
            self.controller.borrow_mut().set_immediate(target.clone());
            self.value.set(target);
            return;
        }

        let moving = {
            let mut controller = self.controller.borrow_mut();
            controller.animate_to(target);
            controller.is_animating()
        };
        if moving {
            log::debug!("spring {:?} retargeted", animation);
            frame_loop::schedule(animation);
        }
    }

    /// One frame of motion; returns whether the spring is still moving.
    fn tick(&self, dt: f32, on_rest: Option<&RestCallback<T>>) -> bool {
        let result = self.controller.borrow_mut().advance(dt);
        match result {
            AdvanceResult::NoChange => {}
            AdvanceResult::Changed(value) => self.value.set(value),
            AdvanceResult::Settled(value) => {
                self.value.set(value.clone());
                if let Some(on_rest) = on_rest {
                    on_rest(&value);
                }
            }
        }
        // on_rest may have retargeted the spring.
        self.controller.borrow().is_animating()
    }
}

struct SpringInner<T: Animatable> {
    shared: Rc<SpringShared<T>>,
    animation: AnimationId,
    owned: bool,
    _effect: Effect,
}

impl<T: Animatable> Drop for SpringInner<T> {
    fn drop(&mut self) {
        // Owned springs are cancelled by their owner's cleanup instead.
        if !self.owned {
            frame_loop::cancel(self.animation);
        }
    }
}

/// Handle returned by [`use_spring`].
pub struct SpringHandle<T: Animatable> {
    inner: Rc<SpringInner<T>>,
}

impl<T: Animatable> Clone for SpringHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Animatable> SpringHandle<T> {
    pub fn value(&self) -> AnimatedValue<T> {
        AnimatedValue::new(self.inner.shared.value)
    }

    /// Animate to `target` imperatively.
    pub fn set(&self, target: T) {
        self.inner.shared.retarget(self.inner.animation, target);
    }

    /// Freeze the value where it is.
    pub fn stop(&self) {
        self.inner.shared.controller.borrow_mut().stop();
    }

    pub fn is_animating(&self) -> bool {
        self.inner.shared.controller.borrow().is_animating()
    }

    pub fn target(&self) -> T {
        self.inner.shared.controller.borrow().target().clone()
    }
}

/// Create a spring-driven value following `props.to`.
pub fn use_spring<T: Animatable>(props: SpringProps<T>) -> SpringHandle<T> {
    let SpringProps {
        to,
        from,
        transition,
        immediate,
        on_rest,
    } = props;

    let initial = from.unwrap_or_else(|| to.get());
    let shared = Rc::new(SpringShared {
        controller: RefCell::new(SpringController::new(initial.clone(), transition)),
        value: create_signal(initial),
        immediate,
    });

    let animation = frame_loop::register({
        let shared = shared.clone();
        move |dt| shared.tick(dt, on_rest.as_ref())
    });
    let owned = current_owner().is_some();
    on_cleanup(move || frame_loop::cancel(animation));

    let effect = create_effect({
        let shared = shared.clone();
        move || {
            let target = to.get();
            shared.retarget(animation, target);
        }
    });

    SpringHandle {
        inner: Rc::new(SpringInner {
            shared,
            animation,
            owned,
            _effect: effect,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{dispose_owner, with_owner};
    use std::cell::Cell;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_frames(max: usize) -> usize {
        for frame in 0..max {
            if !frame_loop::tick(FRAME) {
                return frame + 1;
            }
        }
        max
    }

    #[test]
    fn test_static_target_starts_at_rest() {
        let spring = use_spring(SpringProps::new(5.0f32));
        assert_eq!(spring.value().get(), 5.0);
        assert!(!spring.is_animating());
        assert!(!frame_loop::has_active_animations());
    }

    #[test]
    fn test_from_animates_immediately() {
        let spring = use_spring(SpringProps::new(10.0f32).from(0.0));
        assert!(spring.is_animating());

        run_frames(600);
        assert_eq!(spring.value().get(), 10.0);
    }

    #[test]
    fn test_signal_target_retargets_spring() {
        let length = create_signal(0.0f32);
        let spring = use_spring(SpringProps::new(length).config(SpringConfig::MOLASSES));
        assert_eq!(spring.value().get(), 0.0);

        length.set(72.0);
        assert!(spring.is_animating());
        assert_eq!(spring.target(), 72.0);

        frame_loop::tick(FRAME);
        let first = spring.value().get();
        assert!(first > 0.0 && first < 72.0);

        let frames = run_frames(600);
        assert!(frames < 600, "molasses spring never settled");
        assert_eq!(spring.value().get(), 72.0);
    }

    #[test]
    fn test_immediate_skips_frames() {
        let target = create_signal(1.0f32);
        let spring = use_spring(SpringProps::new(target).immediate(true));

        target.set(3.0);
        assert_eq!(spring.value().get(), 3.0);
        assert!(!frame_loop::has_active_animations());
    }

    #[test]
    fn test_on_rest_fires_once_per_settle() {
        let rests = Rc::new(Cell::new(0));
        let counter = rests.clone();
        let spring = use_spring(
            SpringProps::new(1.0f32)
                .from(0.0)
                .config(SpringConfig::STIFF)
                .on_rest(move |_| counter.set(counter.get() + 1)),
        );

        run_frames(600);
        assert_eq!(rests.get(), 1);

        spring.set(2.0);
        run_frames(600);
        assert_eq!(rests.get(), 2);
    }

    #[test]
    fn test_stop_ends_motion() {
        let spring = use_spring(SpringProps::new(100.0f32).from(0.0));
        frame_loop::tick(FRAME);
        spring.stop();

        let frozen = spring.value().get();
        assert!(!frame_loop::tick(FRAME));
        assert_eq!(spring.value().get(), frozen);
    }

    #[test]
    fn test_dispose_owner_cancels_spring() {
        let target = create_signal(0.0f32);
        let (value, owner) = with_owner(|| {
            use_spring(SpringProps::new(target).config(SpringConfig::SLOW)).value()
        });

        target.set(50.0);
        assert!(frame_loop::has_active_animations());

        dispose_owner(owner);
        assert!(!frame_loop::has_active_animations());
        assert!(value.signal().is_disposed());

        // The effect is gone too: no new schedule.
        target.set(10.0);
        assert!(!frame_loop::has_active_animations());
    }

    #[test]
    fn test_dropping_unowned_handle_cancels_spring() {
        let spring = use_spring(SpringProps::new(1.0f32).from(0.0));
        assert!(frame_loop::has_active_animations());
        drop(spring);
        assert!(!frame_loop::has_active_animations());
    }
}
