use crate::element::Shape;
use crate::types::{LogicalPoint, LogicalSpace, ScreenPoint, ScreenSpace, ScreenVector};
use euclid::{Box2D, Transform2D};

pub const MIN_SCALE: f64 = 0.25;
pub const MAX_SCALE: f64 = 3.0;
pub const WHEEL_ZOOM_STEP: f64 = 0.1;
pub const BUTTON_ZOOM_STEP: f64 = 0.25;
pub const ZOOM_IN_RATIO: f64 = 1.2;

pub type LogicalBox = Box2D<f64, LogicalSpace>;

/// Euclidean distance from `point` to the closest point of segment `start`-`end`.
pub fn distance_to_segment(point: LogicalPoint, start: LogicalPoint, end: LogicalPoint) -> f64 {
    let along = end - start;
    let len_sq = along.square_length();
    if len_sq == 0.0 {
        return (point - start).length();
    }
    let t = ((point - start).dot(along) / len_sq).max(0.0).min(1.0);
    let closest = start + along * t;
    (point - closest).length()
}

/// Axis-aligned bounds of a shape with negative width/height normalized away.
pub fn shape_bounds(shape: &Shape) -> LogicalBox {
    let min = LogicalPoint::new(
        shape.x.min(shape.x + shape.width),
        shape.y.min(shape.y + shape.height),
    );
    let max = LogicalPoint::new(min.x + shape.width.abs(), min.y + shape.height.abs());
    Box2D::new(min, max)
}

/// Edges count as inside, unlike `Box2D::contains`.
pub fn box_contains_inclusive(bounds: &LogicalBox, point: LogicalPoint) -> bool {
    point.x >= bounds.min.x
        && point.x <= bounds.max.x
        && point.y >= bounds.min.y
        && point.y <= bounds.max.y
}

/// Current pan/zoom of a client's view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    scale: f64,
    pan: ScreenVector,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: ScreenVector::zero(),
        }
    }
}

impl ViewTransform {
    pub fn new(scale: f64, pan: ScreenVector) -> Self {
        Self {
            scale: clamp_scale(scale),
            pan,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> ScreenVector {
        self.pan
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    pub fn set_pan(&mut self, pan: ScreenVector) {
        self.pan = pan;
    }

    pub fn screen_to_logical(&self, screen: ScreenPoint) -> LogicalPoint {
        let shifted = screen - self.pan;
        LogicalPoint::new(shifted.x / self.scale, shifted.y / self.scale)
    }

    pub fn logical_to_screen(&self, logical: LogicalPoint) -> ScreenPoint {
        ScreenPoint::new(logical.x * self.scale, logical.y * self.scale) + self.pan
    }

    /// The `(scale, 0, 0, scale, panX, panY)` matrix a 2D canvas context draws logical coordinates with.
    pub fn canvas_matrix(&self) -> Transform2D<f64, LogicalSpace, ScreenSpace> {
        Transform2D::new(self.scale, 0.0, 0.0, self.scale, self.pan.x, self.pan.y)
    }

    /// Positive `delta_y` (wheel down) zooms out.
    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        let delta = if delta_y > 0.0 {
            -WHEEL_ZOOM_STEP
        } else {
            WHEEL_ZOOM_STEP
        };
        self.set_scale(self.scale + delta);
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale + BUTTON_ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale(self.scale - BUTTON_ZOOM_STEP);
    }

    pub fn zoom_in_by_ratio(&mut self) {
        self.set_scale(self.scale * ZOOM_IN_RATIO);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.max(MIN_SCALE).min(MAX_SCALE)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    fn point(x: f64, y: f64) -> LogicalPoint {
        LogicalPoint::new(x, y)
    }

    #[test]
    fn it_measures_distance_perpendicular_to_segment() {
        let d = distance_to_segment(point(5.0, 1.0), point(0.0, 0.0), point(10.0, 0.0));
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn it_clamps_projection_to_segment_end() {
        let d = distance_to_segment(point(13.0, 4.0), point(0.0, 0.0), point(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn it_treats_zero_length_segment_as_point() {
        let d = distance_to_segment(point(3.0, 4.0), point(0.0, 0.0), point(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn it_normalizes_negative_shape_size() {
        let shape = Shape {
            id: 1,
            kind: ShapeKind::Rectangle,
            x: 50.0,
            y: 40.0,
            width: -30.0,
            height: -10.0,
            color: "#000000".into(),
            line_width: 2.0,
            opacity: 100.0,
            author_id: "a".into(),
        };
        let bounds = shape_bounds(&shape);
        assert_eq!(bounds.min, point(20.0, 30.0));
        assert_eq!(bounds.max, point(50.0, 40.0));
        assert!(box_contains_inclusive(&bounds, point(50.0, 40.0)));
        assert!(!box_contains_inclusive(&bounds, point(50.1, 40.0)));
    }

    #[test]
    fn it_converts_between_screen_and_logical() {
        let view = ViewTransform::new(2.0, ScreenVector::new(100.0, -20.0));
        let logical = view.screen_to_logical(ScreenPoint::new(140.0, 20.0));
        assert_eq!(logical, point(20.0, 20.0));
        assert_eq!(
            view.logical_to_screen(logical),
            ScreenPoint::new(140.0, 20.0)
        );
        assert_eq!(
            view.canvas_matrix().transform_point(logical),
            ScreenPoint::new(140.0, 20.0)
        );
    }

    #[test]
    fn it_clamps_zoom() {
        let mut view = ViewTransform::default();
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.scale(), MAX_SCALE);
        for _ in 0..40 {
            view.zoom_by_wheel(1.0);
        }
        assert_eq!(view.scale(), MIN_SCALE);
        view.zoom_by_wheel(-1.0);
        assert!((view.scale() - 0.35).abs() < 1e-9);
        view.reset();
        assert_eq!(view, ViewTransform::default());
    }
}
