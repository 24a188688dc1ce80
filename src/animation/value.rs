use std::rc::Rc;

use crate::reactive::{IntoMaybeDyn, MaybeDyn, Signal};

use super::Animatable;

/// The live output of a spring, updated once per frame while it moves.
///
/// Reads are reactive: reading inside an effect subscribes to the value.
pub struct AnimatedValue<T> {
    signal: Signal<T>,
}

impl<T> Clone for AnimatedValue<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AnimatedValue<T> {}

impl<T: Animatable> AnimatedValue<T> {
    pub(crate) fn new(signal: Signal<T>) -> Self {
        Self { signal }
    }

    pub fn get(&self) -> T {
        self.signal.get()
    }

    pub fn get_untracked(&self) -> T {
        self.signal.get_untracked()
    }

    pub fn signal(&self) -> Signal<T> {
        self.signal
    }

    /// Derive a value that applies `f` to the live value on every read.
    ///
    /// Nothing is cached or precomputed; a view reading the result once per
    /// frame runs `f` once per frame.
    pub fn interpolate<U, F>(&self, f: F) -> Interpolated<U>
    where
        F: Fn(T) -> U + 'static,
    {
        let signal = self.signal;
        Interpolated {
            source: Rc::new(move || f(signal.get())),
        }
    }
}

impl AnimatedValue<f32> {
    /// Map `input` linearly onto `output`, clamping outside `input`.
    pub fn interpolate_range(&self, input: [f32; 2], output: [f32; 2]) -> Interpolated<f32> {
        self.interpolate(move |value| map_range(value, input, output))
    }
}

/// A lazily transformed animated value; see [`AnimatedValue::interpolate`].
pub struct Interpolated<U> {
    source: Rc<dyn Fn() -> U>,
}

impl<U> Clone for Interpolated<U> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<U: 'static> Interpolated<U> {
    pub fn get(&self) -> U {
        (self.source)()
    }

    /// Chain another transformation; still evaluated on every read.
    pub fn interpolate<V, F>(&self, f: F) -> Interpolated<V>
    where
        F: Fn(U) -> V + 'static,
    {
        let source = self.source.clone();
        Interpolated {
            source: Rc::new(move || f(source())),
        }
    }
}

impl<U: Clone + 'static> IntoMaybeDyn<U> for Interpolated<U> {
    fn into_maybe_dyn(self) -> MaybeDyn<U> {
        MaybeDyn::Dynamic(self.source)
    }
}

impl<T: Animatable> IntoMaybeDyn<T> for AnimatedValue<T> {
    fn into_maybe_dyn(self) -> MaybeDyn<T> {
        self.signal.into_maybe_dyn()
    }
}

fn map_range(value: f32, input: [f32; 2], output: [f32; 2]) -> f32 {
    let [in_start, in_end] = input;
    let [out_start, out_end] = output;
    if in_start == in_end {
        return out_end;
    }
    let t = ((value - in_start) / (in_end - in_start)).clamp(0.0, 1.0);
    <f32 as Animatable>::lerp(&out_start, &out_end, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::{create_effect, create_signal};
    use std::cell::Cell;

    #[test]
    fn test_interpolate_recomputes_on_each_read() {
        let calls = Rc::new(Cell::new(0));
        let value = AnimatedValue::new(create_signal(2.0f32));

        let counter = calls.clone();
        let offset = value.interpolate(move |d| {
            counter.set(counter.get() + 1);
            10.0 - d
        });

        assert_eq!(offset.get(), 8.0);
        assert_eq!(offset.get(), 8.0);
        assert_eq!(calls.get(), 2);

        value.signal().set(10.0);
        assert_eq!(offset.get(), 0.0);
    }

    #[test]
    fn test_chained_interpolation() {
        let value = AnimatedValue::new(create_signal(3.0f32));
        let label = value.interpolate(|d| d * 2.0).interpolate(|d| format!("{d:.1}"));
        assert_eq!(label.get(), "6.0");
    }

    #[test]
    fn test_interpolate_range_clamps() {
        let value = AnimatedValue::new(create_signal(0.5f32));
        let opacity = value.interpolate_range([0.0, 1.0], [0.2, 1.0]);
        assert!((opacity.get() - 0.6).abs() < 1e-6);

        value.signal().set(4.0);
        assert_eq!(opacity.get(), 1.0);
    }

    #[test]
    fn test_effects_follow_interpolated_value() {
        let value = AnimatedValue::new(create_signal(0.0f32));
        let offset = value.interpolate(|d| 72.0 - d);
        let seen = Rc::new(Cell::new(f32::NAN));

        let sink = seen.clone();
        let _effect = create_effect(move || sink.set(offset.get()));
        assert_eq!(seen.get(), 72.0);

        value.signal().set(72.0);
        assert_eq!(seen.get(), 0.0);
    }
}
