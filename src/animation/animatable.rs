/// Values a spring can drive.
///
/// The spring itself runs in normalized space; `lerp` maps its position back
/// onto the value. `t` exceeds `[0, 1]` while a spring overshoots.
pub trait Animatable: Clone + PartialEq + Send + Sync + 'static {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for f64 {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from + (to - from) * f64::from(t)
    }
}

impl<const N: usize> Animatable for [f32; N] {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        std::array::from_fn(|i| <f32 as Animatable>::lerp(&from[i], &to[i], t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(<f32 as Animatable>::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(<f32 as Animatable>::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(<f32 as Animatable>::lerp(&0.0, &10.0, 1.0), 10.0);
        // Overshoot
        assert_eq!(<f32 as Animatable>::lerp(&0.0, &10.0, 1.5), 15.0);
    }

    #[test]
    fn test_array_lerp_is_componentwise() {
        let mid = <[f32; 2]>::lerp(&[0.0, 10.0], &[4.0, 20.0], 0.5);
        assert_eq!(mid, [2.0, 15.0]);
    }
}
