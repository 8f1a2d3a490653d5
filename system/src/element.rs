use crate::types::{AuthorId, ElementId, LogicalPoint};
use serde::{Deserialize, Serialize};

fn default_opacity() -> f64 {
    100.0
}

/// One drawn segment between two consecutive pointer samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSegment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub color: String,
    pub line_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(alias = "userId")]
    pub author_id: AuthorId,
}

impl StrokeSegment {
    pub fn start(&self) -> LogicalPoint {
        LogicalPoint::new(self.x0, self.y0)
    }

    pub fn end(&self) -> LogicalPoint {
        LogicalPoint::new(self.x1, self.y1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Diamond,
    Line,
    Arrow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    /// Signed: negative when the gesture was dragged left of the anchor.
    pub width: f64,
    /// Signed: negative when the gesture was dragged above the anchor.
    pub height: f64,
    pub color: String,
    pub line_width: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(alias = "userId")]
    pub author_id: AuthorId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: String,
    pub font_size: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(alias = "userId")]
    pub author_id: AuthorId,
}

impl TextElement {
    pub fn anchor(&self) -> LogicalPoint {
        LogicalPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: ElementId,
    /// Base64 data URL of the recording.
    pub audio_data: String,
    pub mime_type: String,
    pub x: f64,
    pub y: f64,
    /// ISO 8601 creation time.
    pub timestamp: String,
    #[serde(alias = "userId")]
    pub author_id: AuthorId,
    #[serde(alias = "userColor")]
    pub author_color: String,
    #[serde(alias = "userInitials")]
    pub author_initials: String,
}

impl VoiceNote {
    pub fn position(&self) -> LogicalPoint {
        LogicalPoint::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceNoteMoved {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
}

/// Disk used as the hit region of every erase operation, in logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraseCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl EraseCircle {
    pub fn new(center: LogicalPoint, radius: f64) -> Self {
        Self {
            x: center.x,
            y: center.y,
            radius,
        }
    }

    pub fn center(&self) -> LogicalPoint {
        LogicalPoint::new(self.x, self.y)
    }
}
