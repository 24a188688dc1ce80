/// Physical constants of a spring.
///
/// Presets follow the usual UI spring vocabulary; `MOLASSES` is heavily
/// overdamped and never overshoots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Mass of the spring (default: 1.0)
    pub mass: f32,
    /// Stiffness (tension) of the spring
    pub stiffness: f32,
    /// Damping (friction) coefficient
    pub damping: f32,
    /// Rest threshold, relative to the distance travelled
    pub precision: f32,
    /// Stop at the target instead of overshooting it
    pub clamp: bool,
}

impl SpringConfig {
    pub const DEFAULT: Self = Self::new(170.0, 26.0);

    pub const GENTLE: Self = Self::new(120.0, 14.0);

    /// Low damping ratio, visible bounce.
    pub const WOBBLY: Self = Self::new(180.0, 12.0);

    pub const STIFF: Self = Self::new(210.0, 20.0);

    pub const SLOW: Self = Self::new(280.0, 60.0);

    /// Very slow, overdamped crawl towards the target.
    pub const MOLASSES: Self = Self::new(280.0, 120.0);

    pub const fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            mass: 1.0,
            stiffness,
            damping,
            precision: 0.001,
            clamp: false,
        }
    }

    pub const fn mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub const fn precision(mut self, precision: f32) -> Self {
        self.precision = precision;
        self
    }

    pub const fn clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Damping ratio ζ; above 1.0 the spring cannot overshoot.
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integration substep in seconds.
const STEP_SECS: f32 = 0.001;
/// Longest frame delta fed to the integrator; a stall beyond this is dropped.
const MAX_FRAME_SECS: f32 = 0.064;

/// Normalized spring state: position 0.0 is the start value, 1.0 the target.
#[derive(Clone, Debug, Default)]
pub struct SpringState {
    pub position: f32,
    pub velocity: f32,
    /// Time not yet consumed by a whole substep
    carry: f32,
}

impl SpringState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds of frame time and return the new position.
    ///
    /// Integrates with semi-implicit Euler in fixed 1 ms substeps, so the
    /// result does not depend on the frame rate and stiff, heavily damped
    /// configs stay stable. The position can overshoot 1.0 unless the
    /// config clamps.
    pub fn step(&mut self, dt: f32, config: &SpringConfig) -> f32 {
        self.carry += dt.clamp(0.0, MAX_FRAME_SECS);

        while self.carry >= STEP_SECS {
            self.carry -= STEP_SECS;

            let spring_force = -config.stiffness * (self.position - 1.0);
            let damping_force = -config.damping * self.velocity;
            let acceleration = (spring_force + damping_force) / config.mass;

            self.velocity += acceleration * STEP_SECS;
            self.position += self.velocity * STEP_SECS;

            if config.clamp && self.position > 1.0 {
                self.position = 1.0;
                self.velocity = 0.0;
            }
        }

        self.position
    }

    /// Position and velocity both within `threshold` of rest at the target.
    pub fn is_settled(&self, threshold: f32) -> bool {
        (self.position - 1.0).abs() < threshold && self.velocity.abs() < threshold
    }
}
