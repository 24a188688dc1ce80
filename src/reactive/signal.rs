use std::marker::PhantomData;

use super::invalidation::{FrameRequest, request_frame_on};
use super::owner::register_signal;
use super::runtime::{SignalId, notify_write, try_with_runtime};
use super::storage::{
    create_signal_value, get_signal_value, is_signal_alive, replace_signal_value, signal_home,
    update_signal_value, with_signal_value,
};

/// A reactive value.
///
/// Signals are `Copy` handles into a shared value arena, so they can be
/// captured by any number of closures. Reading a signal inside an effect
/// subscribes the effect; writing a different value re-runs subscribers and
/// requests a repaint.
///
/// Values live in a lock-protected arena and may be written from any thread.
/// Effects only run on the thread that created them, and the repaint is
/// requested from that thread's frame driver.
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("id", &self.id).finish()
    }
}

impl<T: Send + Sync + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        let id = create_signal_value(value);
        register_signal(id);
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Whether the owning scope has been disposed.
    pub fn is_disposed(&self) -> bool {
        !is_signal_alive(self.id)
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        try_with_runtime(|rt| rt.track_read(self.id));
        with_signal_value(self.id, f)
    }

    pub fn split(self) -> (ReadSignal<T>, WriteSignal<T>) {
        (
            ReadSignal {
                id: self.id,
                _marker: PhantomData,
            },
            WriteSignal {
                id: self.id,
                _marker: PhantomData,
            },
        )
    }

    pub fn writer(&self) -> WriteSignal<T> {
        WriteSignal {
            id: self.id,
            _marker: PhantomData,
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Signal<T> {
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.id));
        get_signal_value(self.id)
    }

    pub fn get_untracked(&self) -> T {
        get_signal_value(self.id)
    }
}

impl<T: PartialEq + Send + Sync + 'static> Signal<T> {
    /// Sets the value, only notifying subscribers if it actually changed.
    pub fn set(&self, value: T) {
        if replace_signal_value(self.id, value) {
            changed(self.id);
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    /// Updates the value in place, only notifying subscribers if it changed.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        if update_signal_value(self.id, f) {
            changed(self.id);
        }
    }
}

fn changed(id: SignalId) {
    notify_write(id);
    request_frame_on(signal_home(id), FrameRequest::PAINT);
}

/// Read-only handle to a signal.
pub struct ReadSignal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ReadSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ReadSignal<T> {}

impl<T: Clone + Send + Sync + 'static> ReadSignal<T> {
    pub fn get(&self) -> T {
        try_with_runtime(|rt| rt.track_read(self.id));
        get_signal_value(self.id)
    }

    pub fn get_untracked(&self) -> T {
        get_signal_value(self.id)
    }
}

/// Write-only handle to a signal, safe to hand to another thread.
pub struct WriteSignal<T> {
    id: SignalId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for WriteSignal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WriteSignal<T> {}

impl<T: PartialEq + Send + Sync + 'static> WriteSignal<T> {
    pub fn set(&self, value: T) {
        if replace_signal_value(self.id, value) {
            changed(self.id);
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> WriteSignal<T> {
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        if update_signal_value(self.id, f) {
            changed(self.id);
        }
    }
}

pub fn create_signal<T: Send + Sync + 'static>(value: T) -> Signal<T> {
    Signal::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{create_effect, take_frame_request};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_create_signal_and_get() {
        let signal = create_signal(42);
        assert_eq!(signal.get(), 42);
    }

    #[test]
    fn test_update_with_closure() {
        let signal = create_signal(5);
        signal.update(|v| *v += 10);
        assert_eq!(signal.get(), 15);
    }

    #[test]
    fn test_with_for_borrowing() {
        let signal = create_signal(String::from("hello"));
        assert_eq!(signal.with(|s| s.len()), 5);
    }

    #[test]
    fn test_split_into_read_write_handles() {
        let (read, write) = create_signal(7).split();
        assert_eq!(read.get(), 7);
        write.set(14);
        assert_eq!(read.get(), 14);
    }

    #[test]
    fn test_set_only_notifies_on_change() {
        let signal = create_signal(5.0f32);
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let _effect = create_effect(move || {
            signal.get();
            counter.set(counter.get() + 1);
        });
        assert_eq!(runs.get(), 1);

        signal.set(5.0);
        assert_eq!(runs.get(), 1);

        signal.set(6.0);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_writer_from_background_thread() {
        let signal = create_signal(0u32);
        let writer = signal.writer();
        take_frame_request();

        std::thread::spawn(move || writer.set(9))
            .join()
            .expect("writer thread panicked");
        assert_eq!(signal.get(), 9);
        assert!(take_frame_request().contains(FrameRequest::PAINT));
    }
}
