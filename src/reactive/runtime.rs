use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::new());
}

pub type SignalId = usize;
pub type EffectId = usize;

pub type EffectCallback = Box<dyn FnMut()>;

/// Per-thread dependency graph between signals and effects.
///
/// Effect callbacks are taken out of the runtime while they run, so a
/// callback is free to read and write signals (which re-enter the runtime)
/// without tripping over the `RefCell` borrow.
#[derive(Default)]
pub struct Runtime {
    current_effect: Option<EffectId>,
    pending_effects: Vec<EffectId>,
    effect_callbacks: Vec<Option<EffectCallback>>,
    effect_disposed: Vec<bool>,
    effect_dependencies: Vec<HashSet<SignalId>>,
    signal_subscribers: HashMap<SignalId, HashSet<EffectId>>,
    batch_depth: usize,
    flushing: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_effect(&mut self, callback: EffectCallback) -> EffectId {
        let id = self.effect_callbacks.len();
        self.effect_callbacks.push(Some(callback));
        self.effect_disposed.push(false);
        self.effect_dependencies.push(HashSet::new());
        id
    }

    pub fn track_read(&mut self, signal_id: SignalId) {
        if let Some(effect_id) = self.current_effect {
            self.signal_subscribers
                .entry(signal_id)
                .or_default()
                .insert(effect_id);
            self.effect_dependencies[effect_id].insert(signal_id);
        }
    }

    /// Queue every effect subscribed to `signal_id`, keeping first-queued order.
    fn queue_subscribers(&mut self, signal_id: SignalId) {
        let Some(subscribers) = self.signal_subscribers.get(&signal_id) else {
            return;
        };
        let mut subscribers: Vec<_> = subscribers.iter().copied().collect();
        subscribers.sort_unstable();
        for effect_id in subscribers {
            if !self.pending_effects.contains(&effect_id) {
                self.pending_effects.push(effect_id);
            }
        }
    }

    fn take_next_pending(&mut self) -> Option<EffectId> {
        if self.pending_effects.is_empty() {
            None
        } else {
            Some(self.pending_effects.remove(0))
        }
    }

    fn begin_run(&mut self, effect_id: EffectId) -> Option<(EffectCallback, Option<EffectId>)> {
        if self.effect_disposed.get(effect_id).copied().unwrap_or(true) {
            return None;
        }
        // A callback that is already running has been taken out; skip re-entry.
        let callback = self.effect_callbacks[effect_id].take()?;

        let old_deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in old_deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }

        let prev_effect = self.current_effect.replace(effect_id);
        Some((callback, prev_effect))
    }

    fn end_run(
        &mut self,
        effect_id: EffectId,
        callback: EffectCallback,
        prev_effect: Option<EffectId>,
    ) {
        self.current_effect = prev_effect;
        if !self.effect_disposed[effect_id] {
            self.effect_callbacks[effect_id] = Some(callback);
        }
    }

    /// Dispose an effect, handing back its callback so the caller can drop
    /// it once the runtime borrow is released.
    pub fn dispose_effect(&mut self, effect_id: EffectId) -> Option<EffectCallback> {
        if effect_id >= self.effect_callbacks.len() {
            return None;
        }
        let deps = std::mem::take(&mut self.effect_dependencies[effect_id]);
        for signal_id in deps {
            if let Some(subscribers) = self.signal_subscribers.get_mut(&signal_id) {
                subscribers.remove(&effect_id);
            }
        }
        self.effect_disposed[effect_id] = true;
        self.pending_effects.retain(|id| *id != effect_id);
        self.effect_callbacks[effect_id].take()
    }

    /// Drop all subscriptions of a disposed signal.
    pub fn forget_signal(&mut self, signal_id: SignalId) {
        if let Some(subscribers) = self.signal_subscribers.remove(&signal_id) {
            for effect_id in subscribers {
                self.effect_dependencies[effect_id].remove(&signal_id);
            }
        }
    }
}

pub fn with_runtime<F, R>(f: F) -> R
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| f(&mut rt.borrow_mut()))
}

/// Access the runtime if it is not already borrowed.
///
/// Signals go through this so that a write issued while the runtime is
/// borrowed (for example from a `Drop` impl) is skipped instead of panicking.
pub fn try_with_runtime<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Runtime) -> R,
{
    RUNTIME.with(|rt| rt.try_borrow_mut().ok().map(|mut runtime| f(&mut runtime)))
}

/// Run an effect with dependency tracking.
pub fn run_effect(effect_id: EffectId) {
    let Some((mut callback, prev_effect)) = with_runtime(|rt| rt.begin_run(effect_id)) else {
        return;
    };
    callback();
    with_runtime(|rt| rt.end_run(effect_id, callback, prev_effect));
}

/// Queue subscribers of a written signal and flush unless batching.
pub fn notify_write(signal_id: SignalId) {
    let should_flush = try_with_runtime(|rt| {
        rt.queue_subscribers(signal_id);
        rt.batch_depth == 0 && !rt.flushing
    });
    if should_flush == Some(true) {
        flush_effects();
    }
}

pub fn flush_effects() {
    let started = with_runtime(|rt| !std::mem::replace(&mut rt.flushing, true));
    if !started {
        return;
    }
    while let Some(effect_id) = with_runtime(|rt| rt.take_next_pending()) {
        run_effect(effect_id);
    }
    with_runtime(|rt| rt.flushing = false);
}

/// Defer effect execution until `f` returns; effects queued inside run once.
pub fn batch<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    with_runtime(|rt| rt.batch_depth += 1);
    let result = f();
    let should_flush = with_runtime(|rt| {
        rt.batch_depth -= 1;
        rt.batch_depth == 0 && !rt.flushing
    });
    if should_flush {
        flush_effects();
    }
    result
}
