pub mod animation;
pub mod draw;
pub mod hooks;
pub mod reactive;
pub mod runner;
pub mod shape;
pub mod stories;
pub mod story;

pub mod prelude {
    pub use crate::animation::{
        AnimatedValue, Animatable, Interpolated, SpringConfig, TimingFunction, Transition,
    };
    pub use crate::draw::{Group, PathElement, Scene, StrokeDash, ViewBox};
    pub use crate::hooks::{SpringHandle, SpringProps, use_spring};
    pub use crate::reactive::{
        Effect, IntoMaybeDyn, MaybeDyn, ReadSignal, Signal, WriteSignal, batch, create_effect,
        create_signal, on_cleanup,
    };
    pub use crate::runner::{Frame, RunnerConfig, StoryRunner};
    pub use crate::shape::{ShapeError, ShapeRef, create_shape_ref};
    pub use crate::story::{StoryCatalog, StoryContext, StoryError, View};
}
