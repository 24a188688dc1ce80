//! A star outline drawn in by a slow spring.
//!
//! The dash length is unknown until the star is painted, so the spring
//! targets a `length` signal that starts at zero and is set once on mount.
//! `stroke-dashoffset` is `length - drawn`, which starts at the full length
//! (nothing visible) and settles at zero (the whole outline).

use crate::animation::SpringConfig;
use crate::draw::{Group, PathElement, Scene, StrokeDash, ViewBox};
use crate::hooks::{SpringProps, use_spring};
use crate::reactive::create_signal;
use crate::story::{StoryContext, View};

pub const NAME: &str = "Spring Hook";

pub const STAR_PATH: &str =
    "M12 17.27L18.18 21l-1.64-7.03L22 9.24l-7.19-.61L12 2 9.19 8.63 2 9.24l5.46 4.73L5.82 21z";

pub fn spring_hook(cx: &StoryContext) -> View {
    let length = create_signal(0.0f32);
    let star = cx.shape_ref();

    let dash = use_spring(SpringProps::new(length).config(SpringConfig::MOLASSES));
    let offset = dash.value().interpolate(move |drawn| length.get() - drawn);

    cx.on_mount(move || {
        let total = star.total_length()?;
        log::debug!("star outline is {total} units long");
        length.set(total);
        Ok(())
    });

    Box::new(move || {
        Scene::new(180.0, ViewBox::square(23.0))
            .visible(star.is_mounted())
            .group(
                Group::new()
                    .fill("transparent")
                    .stroke("hotpink")
                    .stroke_width(0.5)
                    .path(
                        PathElement::new(STAR_PATH)
                            .dash(StrokeDash::new(length.get(), offset.get()))
                            .shape_ref(star),
                    ),
            )
    })
}
