use std::rc::Rc;

use super::signal::{ReadSignal, Signal};

/// A value that is either fixed or recomputed on every read.
///
/// Spring targets and scene attributes accept both plain values and signals
/// through this type.
pub enum MaybeDyn<T: 'static> {
    Static(T),
    Dynamic(Rc<dyn Fn() -> T>),
}

impl<T: Clone + 'static> MaybeDyn<T> {
    /// Current value. Reading a dynamic value inside an effect subscribes it.
    pub fn get(&self) -> T {
        match self {
            MaybeDyn::Static(v) => v.clone(),
            MaybeDyn::Dynamic(getter) => getter(),
        }
    }

    pub fn fixed(value: T) -> Self {
        MaybeDyn::Static(value)
    }

    pub fn dynamic<F: Fn() -> T + 'static>(f: F) -> Self {
        MaybeDyn::Dynamic(Rc::new(f))
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, MaybeDyn::Dynamic(_))
    }

    /// Lazily map the value; the mapping runs on every read.
    pub fn map<U: Clone + 'static>(self, f: impl Fn(T) -> U + 'static) -> MaybeDyn<U> {
        match self {
            MaybeDyn::Static(v) => MaybeDyn::Static(f(v)),
            MaybeDyn::Dynamic(getter) => MaybeDyn::Dynamic(Rc::new(move || f(getter()))),
        }
    }
}

impl<T: Clone + 'static> Clone for MaybeDyn<T> {
    fn clone(&self) -> Self {
        match self {
            MaybeDyn::Static(v) => MaybeDyn::Static(v.clone()),
            MaybeDyn::Dynamic(getter) => MaybeDyn::Dynamic(getter.clone()),
        }
    }
}

pub trait IntoMaybeDyn<T: Clone + 'static> {
    fn into_maybe_dyn(self) -> MaybeDyn<T>;
}

// Concrete impls per type; a blanket impl over T would collide with the
// closure impl below.

impl IntoMaybeDyn<f32> for f32 {
    fn into_maybe_dyn(self) -> MaybeDyn<f32> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<f64> for f64 {
    fn into_maybe_dyn(self) -> MaybeDyn<f64> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<f32> for i32 {
    fn into_maybe_dyn(self) -> MaybeDyn<f32> {
        MaybeDyn::Static(self as f32)
    }
}

impl<const N: usize> IntoMaybeDyn<[f32; N]> for [f32; N] {
    fn into_maybe_dyn(self) -> MaybeDyn<[f32; N]> {
        MaybeDyn::Static(self)
    }
}

impl IntoMaybeDyn<String> for &str {
    fn into_maybe_dyn(self) -> MaybeDyn<String> {
        MaybeDyn::Static(self.to_string())
    }
}

impl IntoMaybeDyn<String> for String {
    fn into_maybe_dyn(self) -> MaybeDyn<String> {
        MaybeDyn::Static(self)
    }
}

impl<T, F> IntoMaybeDyn<T> for F
where
    T: Clone + 'static,
    F: Fn() -> T + 'static,
{
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::Dynamic(Rc::new(self))
    }
}

impl<T: Clone + Send + Sync + 'static> IntoMaybeDyn<T> for Signal<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::Dynamic(Rc::new(move || self.get()))
    }
}

impl<T: Clone + Send + Sync + 'static> IntoMaybeDyn<T> for ReadSignal<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        MaybeDyn::Dynamic(Rc::new(move || self.get()))
    }
}

impl<T: Clone + 'static> IntoMaybeDyn<T> for MaybeDyn<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        self
    }
}
