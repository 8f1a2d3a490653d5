use crate::element::{
    EraseCircle, Shape, StrokeSegment, TextElement, VoiceNote, VoiceNoteMoved,
};
use crate::error::ValidationError;
use crate::geometry::{box_contains_inclusive, distance_to_segment, shape_bounds};

/// Records that an erase circle can hit.
pub trait Erasable {
    fn is_hit_by(&self, circle: &EraseCircle) -> bool;
}

impl Erasable for StrokeSegment {
    fn is_hit_by(&self, circle: &EraseCircle) -> bool {
        distance_to_segment(circle.center(), self.start(), self.end()) <= circle.radius
    }
}

impl Erasable for Shape {
    // Bounding box grown by the radius, not a true circle/rectangle test.
    fn is_hit_by(&self, circle: &EraseCircle) -> bool {
        let bounds = shape_bounds(self).inflate(circle.radius, circle.radius);
        box_contains_inclusive(&bounds, circle.center())
    }
}

impl Erasable for TextElement {
    fn is_hit_by(&self, circle: &EraseCircle) -> bool {
        (circle.center() - self.anchor()).length() <= circle.radius
    }
}

impl Erasable for VoiceNote {
    fn is_hit_by(&self, circle: &EraseCircle) -> bool {
        (circle.center() - self.position()).length() <= circle.radius
    }
}

/// Structural checks applied to every record arriving from a peer.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn finite(name: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite(name))
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ValidationError> {
    finite(name, value)?;
    if value < 0.0 {
        Err(ValidationError::Negative(name))
    } else {
        Ok(())
    }
}

fn opacity(value: f64) -> Result<(), ValidationError> {
    finite("opacity", value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OpacityOutOfRange(value))
    }
}

fn not_blank(name: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty(name))
    } else {
        Ok(())
    }
}

impl Validate for StrokeSegment {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x0", self.x0)?;
        finite("y0", self.y0)?;
        finite("x1", self.x1)?;
        finite("y1", self.y1)?;
        non_negative("lineWidth", self.line_width)?;
        opacity(self.opacity)
    }
}

impl Validate for Shape {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        finite("width", self.width)?;
        finite("height", self.height)?;
        non_negative("lineWidth", self.line_width)?;
        opacity(self.opacity)
    }
}

impl Validate for TextElement {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        non_negative("fontSize", self.font_size)?;
        not_blank("text", &self.text)?;
        opacity(self.opacity)
    }
}

impl Validate for VoiceNote {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        not_blank("audioData", &self.audio_data)?;
        not_blank("mimeType", &self.mime_type)
    }
}

impl Validate for VoiceNoteMoved {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x", self.x)?;
        finite("y", self.y)
    }
}

impl Validate for EraseCircle {
    fn validate(&self) -> Result<(), ValidationError> {
        finite("x", self.x)?;
        finite("y", self.y)?;
        non_negative("radius", self.radius)
    }
}
