use crate::element::{Shape, ShapeKind, TextElement};
use crate::types::{ElementId, LogicalPoint, LogicalVector};
use crate::voice::Author;
use serde::{Deserialize, Serialize};

/// A shape gesture smaller than this in both dimensions is discarded.
pub const SHAPE_MIN_SIZE: f64 = 5.0;
/// Pointer travel, in logical units, that turns a voice note press into a drag.
pub const DRAG_THRESHOLD: f64 = 5.0;
/// How long a voice note press waits for movement before it can only be a click.
pub const DRAG_GRACE_MS: u64 = 150;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pen,
    Eraser,
    Text,
    Hand,
    Rectangle,
    Circle,
    Diamond,
    Line,
    Arrow,
}

impl Tool {
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Tool::Rectangle => Some(ShapeKind::Rectangle),
            Tool::Circle => Some(ShapeKind::Circle),
            Tool::Diamond => Some(ShapeKind::Diamond),
            Tool::Line => Some(ShapeKind::Line),
            Tool::Arrow => Some(ShapeKind::Arrow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: String,
    pub stroke_width: f64,
    pub opacity: f64,
    pub eraser_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: "#000000".into(),
            stroke_width: 2.0,
            opacity: 100.0,
            eraser_size: 16.0,
        }
    }
}

/// A shape being dragged out, not yet shared.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDraft {
    kind: ShapeKind,
    origin: LogicalPoint,
    size: LogicalVector,
    color: String,
    line_width: f64,
    opacity: f64,
}

impl ShapeDraft {
    pub fn new(kind: ShapeKind, origin: LogicalPoint, settings: &ToolSettings) -> Self {
        Self {
            kind,
            origin,
            size: LogicalVector::zero(),
            color: settings.color.clone(),
            line_width: settings.stroke_width,
            opacity: settings.opacity,
        }
    }

    pub fn update(&mut self, pointer: LogicalPoint) {
        self.size = pointer - self.origin;
    }

    pub fn is_large_enough(&self) -> bool {
        self.size.x.abs() > SHAPE_MIN_SIZE || self.size.y.abs() > SHAPE_MIN_SIZE
    }

    /// The shape as it would look if committed now.
    pub fn to_shape(&self, id: ElementId, author: &Author) -> Shape {
        Shape {
            id,
            kind: self.kind,
            x: self.origin.x,
            y: self.origin.y,
            width: self.size.x,
            height: self.size.y,
            color: self.color.clone(),
            line_width: self.line_width,
            opacity: self.opacity,
            author_id: author.id.clone(),
        }
    }

    pub fn finish(self, id: ElementId, author: &Author) -> Option<Shape> {
        if self.is_large_enough() {
            Some(self.to_shape(id, author))
        } else {
            log::debug!("Shape too small, discarded: {:?}", self.size);
            None
        }
    }
}

/// Text entry opened at a point, waiting for its content.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraft {
    pub at: LogicalPoint,
    pub color: String,
    pub font_size: f64,
    pub opacity: f64,
}

impl TextDraft {
    pub fn new(at: LogicalPoint, settings: &ToolSettings) -> Self {
        Self {
            at,
            color: settings.color.clone(),
            font_size: DEFAULT_FONT_SIZE,
            opacity: settings.opacity,
        }
    }

    /// `None` when the input is blank once trimmed.
    pub fn commit(self, input: &str, id: ElementId, author: &Author) -> Option<TextElement> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(TextElement {
            id,
            x: self.at.x,
            y: self.at.y,
            text: text.into(),
            color: self.color,
            font_size: self.font_size,
            opacity: self.opacity,
            author_id: author.id.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragPhase {
    Pending,
    Dragging,
    /// Grace window passed without enough movement; the press can only end as a click.
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRelease {
    Click(ElementId),
    Dropped(ElementId),
}

/// Press on a voice note that ends as either a click or a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDrag {
    note_id: ElementId,
    pressed_at: LogicalPoint,
    pressed_ms: u64,
    grab_offset: LogicalVector,
    phase: DragPhase,
}

impl NoteDrag {
    pub fn new(
        note_id: ElementId,
        pointer: LogicalPoint,
        note_position: LogicalPoint,
        now_ms: u64,
    ) -> Self {
        Self {
            note_id,
            pressed_at: pointer,
            pressed_ms: now_ms,
            grab_offset: pointer - note_position,
            phase: DragPhase::Pending,
        }
    }

    pub fn note_id(&self) -> ElementId {
        self.note_id
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == DragPhase::Dragging
    }

    /// Returns the note's new position while the gesture is a drag.
    pub fn track(&mut self, pointer: LogicalPoint, now_ms: u64) -> Option<LogicalPoint> {
        if self.phase == DragPhase::Pending {
            if now_ms.saturating_sub(self.pressed_ms) > DRAG_GRACE_MS {
                self.phase = DragPhase::Settled;
            } else if (pointer - self.pressed_at).length() >= DRAG_THRESHOLD {
                self.phase = DragPhase::Dragging;
            }
        }
        if self.is_dragging() {
            Some(pointer - self.grab_offset)
        } else {
            None
        }
    }

    pub fn release(self) -> NoteRelease {
        if self.is_dragging() {
            NoteRelease::Dropped(self.note_id)
        } else {
            NoteRelease::Click(self.note_id)
        }
    }
}
