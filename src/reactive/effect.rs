use super::owner::{effect_has_owner, register_effect};
use super::runtime::{EffectId, run_effect, with_runtime};

/// A side effect that re-runs whenever a signal it read changes.
///
/// Effects created inside an owner scope live until the owner is disposed.
/// Unowned effects are disposed when the handle is dropped.
pub struct Effect {
    id: EffectId,
}

impl Effect {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let id = with_runtime(|rt| rt.allocate_effect(Box::new(f)));
        register_effect(id);
        run_effect(id);
        Self { id }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if !effect_has_owner(self.id) {
            let callback = with_runtime(|rt| rt.dispose_effect(self.id));
            drop(callback);
        }
    }
}

pub fn create_effect<F>(f: F) -> Effect
where
    F: FnMut() + 'static,
{
    Effect::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{batch, create_signal};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_effect_tracks_latest_dependencies() {
        let use_a = create_signal(true);
        let a = create_signal(1);
        let b = create_signal(10);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        let _effect = create_effect(move || {
            let value = if use_a.get() { a.get() } else { b.get() };
            log.borrow_mut().push(value);
        });

        use_a.set(false);
        // `a` is no longer a dependency
        a.set(2);
        b.set(20);

        assert_eq!(*seen.borrow(), vec![1, 10, 20]);
    }

    #[test]
    fn test_batch_runs_effect_once() {
        let x = create_signal(0);
        let y = create_signal(0);
        let runs = Rc::new(RefCell::new(0));

        let counter = runs.clone();
        let _effect = create_effect(move || {
            x.get();
            y.get();
            *counter.borrow_mut() += 1;
        });

        batch(|| {
            x.set(1);
            y.set(1);
        });

        assert_eq!(*runs.borrow(), 2);
    }

    #[test]
    fn test_effect_may_write_other_signals() {
        let source = create_signal(2.0f32);
        let doubled = create_signal(0.0f32);
        let _effect = create_effect(move || doubled.set(source.get() * 2.0));

        source.set(8.0);
        assert_eq!(doubled.get(), 16.0);
    }

    #[test]
    fn test_dropping_unowned_effect_stops_it() {
        let signal = create_signal(0);
        let runs = Rc::new(RefCell::new(0));

        let counter = runs.clone();
        let effect = create_effect(move || {
            signal.get();
            *counter.borrow_mut() += 1;
        });
        drop(effect);

        signal.set(1);
        assert_eq!(*runs.borrow(), 1);
    }
}
