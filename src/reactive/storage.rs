use std::any::Any;
use std::sync::{Arc, OnceLock, RwLock};
use std::thread::{self, ThreadId};

use super::runtime::SignalId;

type SignalValue = Arc<RwLock<Box<dyn Any + Send + Sync>>>;

static STORAGE: OnceLock<RwLock<SignalStorage>> = OnceLock::new();

/// A live value and the thread that created it.
#[derive(Clone)]
struct Slot {
    value: SignalValue,
    home: ThreadId,
}

/// Arena of type-erased signal values shared by all threads.
struct SignalStorage {
    values: Vec<Option<Slot>>,
}

fn with_storage<F, R>(f: F) -> R
where
    F: FnOnce(&mut SignalStorage) -> R,
{
    let storage = STORAGE.get_or_init(|| RwLock::new(SignalStorage { values: Vec::new() }));
    f(&mut storage.write().expect("signal storage poisoned"))
}

fn with_storage_read<F, R>(f: F) -> R
where
    F: FnOnce(&SignalStorage) -> R,
{
    let storage = STORAGE.get_or_init(|| RwLock::new(SignalStorage { values: Vec::new() }));
    f(&storage.read().expect("signal storage poisoned"))
}

fn slot(id: SignalId) -> Slot {
    with_storage_read(|storage| storage.values.get(id).cloned().flatten())
        .expect("Signal disposed")
}

pub fn create_signal_value<T: Send + Sync + 'static>(value: T) -> SignalId {
    with_storage(|storage| {
        let id = storage.values.len();
        let boxed: Box<dyn Any + Send + Sync> = Box::new(value);
        storage.values.push(Some(Slot {
            value: Arc::new(RwLock::new(boxed)),
            home: thread::current().id(),
        }));
        id
    })
}

pub fn get_signal_value<T: Clone + Send + Sync + 'static>(id: SignalId) -> T {
    with_signal_value(id, T::clone)
}

pub fn with_signal_value<T: Send + Sync + 'static, R>(id: SignalId, f: impl FnOnce(&T) -> R) -> R {
    let arc = slot(id).value;
    let guard = arc.read().expect("signal lock poisoned");
    f(guard.downcast_ref::<T>().expect("Type mismatch"))
}

/// Replace the value, returning whether it differed from the old one.
pub fn replace_signal_value<T: PartialEq + Send + Sync + 'static>(id: SignalId, value: T) -> bool {
    let arc = slot(id).value;
    let mut guard = arc.write().expect("signal lock poisoned");
    let current = guard.downcast_mut::<T>().expect("Type mismatch");
    if *current == value {
        return false;
    }
    *current = value;
    true
}

/// Mutate the value in place, returning whether it changed.
pub fn update_signal_value<T: Clone + PartialEq + Send + Sync + 'static>(
    id: SignalId,
    f: impl FnOnce(&mut T),
) -> bool {
    let arc = slot(id).value;
    let mut guard = arc.write().expect("signal lock poisoned");
    let value = guard.downcast_mut::<T>().expect("Type mismatch");
    let old = value.clone();
    f(value);
    *value != old
}

/// The thread whose runtime owns the signal's subscribers.
pub fn signal_home(id: SignalId) -> ThreadId {
    slot(id).home
}

pub fn is_signal_alive(id: SignalId) -> bool {
    with_storage_read(|storage| matches!(storage.values.get(id), Some(Some(_))))
}

pub fn dispose_signal(id: SignalId) {
    with_storage(|storage| {
        if let Some(value) = storage.values.get_mut(id) {
            *value = None;
        }
    });
}
