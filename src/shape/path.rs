use kurbo::{BezPath, ParamCurve, ParamCurveArclen, PathSeg, Point, Rect, Shape};

use super::ShapeError;

/// Arc length accuracy for curved segments, in user units.
const ARCLEN_ACCURACY: f64 = 1e-6;

/// Parsed SVG path data with its outline length precomputed.
#[derive(Clone, Debug)]
pub struct PathShape {
    data: String,
    path: BezPath,
    segment_lengths: Vec<f64>,
    total_length: f64,
}

impl PathShape {
    /// Parse the contents of a `d` attribute.
    pub fn parse(data: &str) -> Result<Self, ShapeError> {
        let path = BezPath::from_svg(data).map_err(|e| ShapeError::InvalidPathData {
            data: data.to_string(),
            reason: e.to_string(),
        })?;

        let segment_lengths: Vec<f64> = path
            .segments()
            .map(|segment| segment.arclen(ARCLEN_ACCURACY))
            .collect();
        if segment_lengths.is_empty() {
            return Err(ShapeError::EmptyPath(data.to_string()));
        }
        let total_length = segment_lengths.iter().sum();

        Ok(Self {
            data: data.to_string(),
            path,
            segment_lengths,
            total_length,
        })
    }

    /// Length of the whole outline, closing segments included.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Point `distance` units along the outline, clamped to its ends.
    pub fn point_at_length(&self, distance: f64) -> Point {
        let mut remaining = distance.clamp(0.0, self.total_length);
        let mut last: Option<PathSeg> = None;

        for (segment, length) in self.path.segments().zip(&self.segment_lengths) {
            if remaining <= *length {
                let t = if *length > 0.0 {
                    segment.inv_arclen(remaining, ARCLEN_ACCURACY)
                } else {
                    0.0
                };
                return segment.eval(t);
            }
            remaining -= length;
            last = Some(segment);
        }

        // Rounding left a sliver past the last segment.
        last.map_or(Point::ZERO, |segment| segment.eval(1.0))
    }

    pub fn bounds(&self) -> Rect {
        self.path.bounding_box()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }
}

impl PartialEq for PathShape {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAR: &str =
        "M12 17.27L18.18 21l-1.64-7.03L22 9.24l-7.19-.61L12 2 9.19 8.63 2 9.24l5.46 4.73L5.82 21z";

    #[test]
    fn test_star_outline_length() {
        let star = PathShape::parse(STAR).unwrap();
        assert_eq!(star.segment_count(), 10);
        assert!(
            (star.total_length() - 72.1556).abs() < 1e-3,
            "got {}",
            star.total_length()
        );
    }

    #[test]
    fn test_closing_segment_counts() {
        let open = PathShape::parse("M0 0 L10 0 L10 10").unwrap();
        let closed = PathShape::parse("M0 0 L10 0 L10 10 Z").unwrap();
        assert!((open.total_length() - 20.0).abs() < 1e-9);
        assert!((closed.total_length() - (20.0 + 200f64.sqrt())).abs() < 1e-9);
    }

    #[test]
    fn test_curve_length() {
        // Quarter circle of radius 10 approximated by a cubic.
        let k = 10.0 * 0.552_284_8;
        let quarter = PathShape::parse(&format!("M10 0 C10 {k} {k} 10 0 10")).unwrap();
        let expected = std::f64::consts::FRAC_PI_2 * 10.0;
        assert!((quarter.total_length() - expected).abs() < 0.01);
    }

    #[test]
    fn test_point_at_length() {
        let square = PathShape::parse("M0 0 H10 V10 H0 Z").unwrap();
        assert_eq!(square.total_length(), 40.0);

        let p = square.point_at_length(15.0);
        assert!((p.x - 10.0).abs() < 1e-6 && (p.y - 5.0).abs() < 1e-6);
        assert_eq!(square.point_at_length(-3.0), Point::new(0.0, 0.0));

        let end = square.point_at_length(100.0);
        assert!(end.x.abs() < 1e-6 && end.y.abs() < 1e-6);
    }

    #[test]
    fn test_bounds() {
        let star = PathShape::parse(STAR).unwrap();
        let bounds = star.bounds();
        for (actual, expected) in [
            (bounds.x0, 2.0),
            (bounds.y0, 2.0),
            (bounds.x1, 22.0),
            (bounds.y1, 21.0),
        ] {
            assert!((actual - expected).abs() < 1e-9, "{bounds:?}");
        }
    }

    #[test]
    fn test_invalid_and_empty_paths() {
        assert!(matches!(
            PathShape::parse("M0 0 Q"),
            Err(ShapeError::InvalidPathData { .. })
        ));
        assert!(matches!(
            PathShape::parse("M5 5"),
            Err(ShapeError::EmptyPath(_))
        ));
    }
}
