use std::fmt::Write;

use crate::shape::ShapeRef;

/// The `viewBox` of a scene, in user units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn square(size: f32) -> Self {
        Self::new(0.0, 0.0, size, size)
    }
}

/// Dash pattern of a stroke.
///
/// With `array` equal to the outline length, `offset` hides the outline:
/// `offset == array` shows nothing, `offset == 0` shows all of it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeDash {
    pub array: f32,
    pub offset: f32,
}

impl StrokeDash {
    pub fn new(array: f32, offset: f32) -> Self {
        Self { array, offset }
    }

    /// Dash showing the first `drawn` units of an outline `length` long.
    pub fn draw_in(length: f32, drawn: f32) -> Self {
        Self::new(length, length - drawn)
    }

    /// Fraction of the outline shown.
    pub fn progress(&self) -> f32 {
        if self.array <= 0.0 {
            return 0.0;
        }
        (1.0 - self.offset / self.array).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Debug)]
pub struct PathElement {
    pub d: String,
    pub dash: Option<StrokeDash>,
    /// Mounted with `d` once the path has been painted
    pub shape_ref: Option<ShapeRef>,
}

impl PathElement {
    pub fn new(d: impl Into<String>) -> Self {
        Self {
            d: d.into(),
            dash: None,
            shape_ref: None,
        }
    }

    pub fn dash(mut self, dash: StrokeDash) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn shape_ref(mut self, shape_ref: ShapeRef) -> Self {
        self.shape_ref = Some(shape_ref);
        self
    }
}

/// A `<g>` carrying the presentation attributes its paths inherit.
#[derive(Clone, Debug)]
pub struct Group {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    pub paths: Vec<PathElement>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            fill: "black".to_string(),
            stroke: "none".to_string(),
            stroke_width: 1.0,
            paths: Vec::new(),
        }
    }
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = stroke.into();
        self
    }

    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn path(mut self, path: PathElement) -> Self {
        self.paths.push(path);
        self
    }
}

/// One painted frame of a view, serializable to SVG markup.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Rendered width; the height follows the view box aspect ratio
    pub width: f32,
    pub view_box: ViewBox,
    /// Hidden scenes are emitted with `display="none"` and no content
    pub visible: bool,
    pub groups: Vec<Group>,
}

impl Scene {
    pub fn new(width: f32, view_box: ViewBox) -> Self {
        Self {
            width,
            view_box,
            visible: true,
            groups: Vec::new(),
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn height(&self) -> f32 {
        if self.view_box.width <= 0.0 {
            return self.width;
        }
        self.width * self.view_box.height / self.view_box.width
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathElement> {
        self.groups.iter().flat_map(|group| group.paths.iter())
    }

    pub fn to_svg(&self) -> String {
        let vb = &self.view_box;
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}""#,
            self.width,
            self.height(),
            vb.x,
            vb.y,
            vb.width,
            vb.height
        );
        if !self.visible {
            svg.push_str(r#" display="none"/>"#);
            return svg;
        }
        svg.push('>');

        // Writing into a String cannot fail.
        for group in &self.groups {
            let _ = write!(
                svg,
                r#"<g fill="{}" stroke="{}" stroke-width="{}">"#,
                escape(&group.fill),
                escape(&group.stroke),
                group.stroke_width
            );
            for path in &group.paths {
                let _ = write!(svg, r#"<path d="{}""#, escape(&path.d));
                if let Some(dash) = path.dash {
                    let _ = write!(
                        svg,
                        r#" stroke-dasharray="{}" stroke-dashoffset="{}""#,
                        dash.array, dash.offset
                    );
                }
                svg.push_str("/>");
            }
            svg.push_str("</g>");
        }
        svg.push_str("</svg>");
        svg
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star_scene(dash: StrokeDash) -> Scene {
        Scene::new(180.0, ViewBox::square(23.0)).group(
            Group::new()
                .fill("transparent")
                .stroke("hotpink")
                .stroke_width(0.5)
                .path(PathElement::new("M12 2L22 9.24z").dash(dash)),
        )
    }

    #[test]
    fn test_draw_in_offsets() {
        let hidden = StrokeDash::draw_in(72.0, 0.0);
        assert_eq!(hidden.offset, 72.0);
        assert_eq!(hidden.progress(), 0.0);

        let half = StrokeDash::draw_in(72.0, 36.0);
        assert_eq!(half.offset, 36.0);
        assert_eq!(half.progress(), 0.5);

        assert_eq!(StrokeDash::draw_in(72.0, 72.0).progress(), 1.0);
        assert_eq!(StrokeDash::draw_in(0.0, 0.0).progress(), 0.0);
    }

    #[test]
    fn test_markup() {
        let svg = star_scene(StrokeDash::new(72.5, 10.25)).to_svg();
        assert_eq!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="180" height="180" viewBox="0 0 23 23">"#
                .to_string()
                + r#"<g fill="transparent" stroke="hotpink" stroke-width="0.5">"#
                + r#"<path d="M12 2L22 9.24z" stroke-dasharray="72.5" stroke-dashoffset="10.25"/>"#
                + "</g></svg>"
        );
    }

    #[test]
    fn test_hidden_scene_has_no_content() {
        let svg = star_scene(StrokeDash::new(1.0, 1.0)).visible(false).to_svg();
        assert!(svg.ends_with(r#"display="none"/>"#));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn test_height_follows_view_box() {
        let scene = Scene::new(200.0, ViewBox::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(scene.height(), 50.0);
    }

    #[test]
    fn test_paths_across_groups() {
        let scene = Scene::new(10.0, ViewBox::square(10.0))
            .group(Group::new().path(PathElement::new("M0 0L1 1")))
            .group(
                Group::new()
                    .path(PathElement::new("M1 1L2 2"))
                    .path(PathElement::new("M2 2L3 3")),
            );
        let data: Vec<_> = scene.paths().map(|p| p.d.as_str()).collect();
        assert_eq!(data, ["M0 0L1 1", "M1 1L2 2", "M2 2L3 3"]);
    }
}
