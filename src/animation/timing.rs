//! Timing functions for duration-based animations.
//!
//! A spring has no fixed duration; everything else in this module maps a
//! normalized time `t` in `[0, 1]` to an interpolation factor.
//!
//! ```ignore
//! use_spring(
//!     SpringProps::new(length)
//!         .transition(Transition::new(800.0, TimingFunction::EaseOut)),
//! );
//! ```

use super::spring::SpringConfig;
use std::sync::Arc;

#[derive(Clone)]
pub enum TimingFunction {
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    EaseInOut,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f32, f32, f32, f32),
    /// Spring physics; stepped by the controller with real frame time
    Spring(SpringConfig),
    Custom(Arc<dyn Fn(f32) -> f32 + Send + Sync>),
}

impl TimingFunction {
    /// Evaluate at normalized time `t`.
    ///
    /// Springs are not a function of normalized time and return `t`
    /// unchanged; the controller integrates them separately.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingFunction::Linear | TimingFunction::Spring(_) => t,
            TimingFunction::EaseIn => t * t,
            TimingFunction::EaseOut => t * (2.0 - t),
            TimingFunction::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            TimingFunction::Custom(f) => f(t),
        }
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseIn => write!(f, "EaseIn"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseInOut => write!(f, "EaseInOut"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({x1}, {y1}, {x2}, {y2})")
            }
            TimingFunction::Spring(config) => write!(f, "Spring({config:?})"),
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Solve the bezier's x(p) = t with Newton-Raphson, then sample y(p).
fn cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let mut p = t;
    for _ in 0..8 {
        let err = bezier_component(p, x1, x2) - t;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        p = (p - err / slope).clamp(0.0, 1.0);
    }
    bezier_component(p, y1, y2)
}

fn bezier_component(p: f32, c1: f32, c2: f32) -> f32 {
    let mp = 1.0 - p;
    3.0 * mp * mp * p * c1 + 3.0 * mp * p * p * c2 + p * p * p
}

fn bezier_slope(p: f32, c1: f32, c2: f32) -> f32 {
    let mp = 1.0 - p;
    3.0 * mp * mp * c1 + 6.0 * mp * p * (c2 - c1) + 3.0 * p * p * (1.0 - c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        assert_eq!(TimingFunction::Linear.evaluate(0.5), 0.5);
        assert_eq!(TimingFunction::Linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_ease_in_and_out() {
        assert!(TimingFunction::EaseIn.evaluate(0.5) < 0.5);
        assert!(TimingFunction::EaseOut.evaluate(0.5) > 0.5);
        assert_eq!(TimingFunction::EaseInOut.evaluate(0.5), 0.5);
    }

    #[test]
    fn test_cubic_bezier_endpoints_and_linear_curve() {
        let linear = TimingFunction::CubicBezier(0.25, 0.25, 0.75, 0.75);
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(1.0), 1.0);
        assert!((linear.evaluate(0.3) - 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(TimingFunction::EaseOut.evaluate(1.5), 1.0);
        assert_eq!(TimingFunction::custom(|t| t * 2.0).evaluate(-1.0), 0.0);
    }
}
