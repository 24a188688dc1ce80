//! Owner scopes for automatic teardown.
//!
//! Every signal, effect and cleanup callback created while an owner is
//! current belongs to that owner. Disposing the owner tears all of it down,
//! children first. A mounted story runs inside one owner, so unmounting it
//! cancels its springs and drops its state in one call.
//!
//! ```ignore
//! let (value, owner) = with_owner(|| {
//!     let length = create_signal(0.0);
//!     on_cleanup(|| log::debug!("story unmounted"));
//!     length
//! });
//! dispose_owner(owner);
//! assert!(value.is_disposed());
//! ```

use std::cell::RefCell;

use super::runtime::{EffectId, SignalId, with_runtime};
use super::storage::dispose_signal;

pub type OwnerId = usize;

#[derive(Default)]
struct Owner {
    signals: Vec<SignalId>,
    effects: Vec<EffectId>,
    cleanups: Vec<Box<dyn FnOnce()>>,
    children: Vec<OwnerId>,
}

thread_local! {
    static CURRENT_OWNER: RefCell<Option<OwnerId>> = const { RefCell::new(None) };
    static OWNERS: RefCell<Vec<Option<Owner>>> = const { RefCell::new(Vec::new()) };
}

fn with_current_owner<F>(f: F)
where
    F: FnOnce(&mut Owner),
{
    let Some(owner_id) = current_owner() else {
        return;
    };
    OWNERS.with(|owners| {
        if let Some(Some(owner)) = owners.borrow_mut().get_mut(owner_id) {
            f(owner);
        }
    });
}

fn enter(owner_id: OwnerId) -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| current.borrow_mut().replace(owner_id))
}

fn leave(prev: Option<OwnerId>) {
    CURRENT_OWNER.with(|current| *current.borrow_mut() = prev);
}

/// Run `f` inside a new owner scope, nested under the current one.
pub fn with_owner<T>(f: impl FnOnce() -> T) -> (T, OwnerId) {
    let parent = current_owner();
    let owner_id = OWNERS.with(|owners| {
        let mut owners = owners.borrow_mut();
        let id = owners.len();
        owners.push(Some(Owner::default()));
        if let Some(parent_id) = parent
            && let Some(Some(parent_owner)) = owners.get_mut(parent_id)
        {
            parent_owner.children.push(id);
        }
        id
    });

    let prev = enter(owner_id);
    let result = f();
    leave(prev);

    (result, owner_id)
}

/// Re-enter an existing owner, so resources created by `f` belong to it.
///
/// Used to run mount callbacks after the initial paint. Does nothing but run
/// `f` unowned if the owner has already been disposed.
pub fn run_in_owner<T>(owner_id: OwnerId, f: impl FnOnce() -> T) -> T {
    let alive = OWNERS.with(|owners| matches!(owners.borrow().get(owner_id), Some(Some(_))));
    if !alive {
        return f();
    }
    let prev = enter(owner_id);
    let result = f();
    leave(prev);
    result
}

pub fn current_owner() -> Option<OwnerId> {
    CURRENT_OWNER.with(|current| *current.borrow())
}

/// Dispose an owner: children first, then cleanups (last registered runs
/// first), then effects, then signals. Disposing twice is a no-op.
pub fn dispose_owner(id: OwnerId) {
    let owner = OWNERS.with(|owners| owners.borrow_mut().get_mut(id).and_then(Option::take));
    let Some(owner) = owner else {
        return;
    };

    for child_id in owner.children {
        dispose_owner(child_id);
    }

    for cleanup in owner.cleanups.into_iter().rev() {
        cleanup();
    }

    let callbacks: Vec<_> = with_runtime(|rt| {
        for signal_id in &owner.signals {
            rt.forget_signal(*signal_id);
        }
        owner
            .effects
            .iter()
            .filter_map(|effect_id| rt.dispose_effect(*effect_id))
            .collect()
    });
    drop(callbacks);

    for signal_id in owner.signals {
        dispose_signal(signal_id);
    }
}

/// Register a callback to run when the current owner is disposed.
///
/// Outside an owner scope the callback is dropped without running.
pub fn on_cleanup(f: impl FnOnce() + 'static) {
    with_current_owner(|owner| owner.cleanups.push(Box::new(f)));
}

pub(crate) fn register_signal(id: SignalId) {
    with_current_owner(|owner| owner.signals.push(id));
}

pub(crate) fn register_effect(id: EffectId) {
    with_current_owner(|owner| owner.effects.push(id));
}

pub(crate) fn effect_has_owner(id: EffectId) -> bool {
    OWNERS.with(|owners| {
        owners
            .borrow()
            .iter()
            .flatten()
            .any(|owner| owner.effects.contains(&id))
    })
}
