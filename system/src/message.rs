use crate::element::{
    EraseCircle, Shape, StrokeSegment, TextElement, VoiceNote, VoiceNoteMoved,
};
use crate::error::{MessageError, ValidationError};
use crate::traits::Validate;
use crate::AuthorId;
use serde::{Deserialize, Serialize};

// Every frame is `{"event": <name>, "data": <payload>}`; `data` is absent for
// payload-less events.

/// Board mutations. They travel in both directions and are applied identically on every replica.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum CanvasEvent {
    Drawing(StrokeSegment),
    Shape(Shape),
    Text(TextElement),
    VoiceNote(VoiceNote),
    VoiceNoteMoved(VoiceNoteMoved),
    EraseDrawing(EraseCircle),
    EraseShapes(EraseCircle),
    EraseText(EraseCircle),
    EraseVoiceNotes(EraseCircle),
    ClearCanvas,
}

impl CanvasEvent {
    pub fn name(&self) -> &'static str {
        match self {
            CanvasEvent::Drawing(_) => "drawing",
            CanvasEvent::Shape(_) => "shape",
            CanvasEvent::Text(_) => "text",
            CanvasEvent::VoiceNote(_) => "voice-note",
            CanvasEvent::VoiceNoteMoved(_) => "voice-note-moved",
            CanvasEvent::EraseDrawing(_) => "erase-drawing",
            CanvasEvent::EraseShapes(_) => "erase-shapes",
            CanvasEvent::EraseText(_) => "erase-text",
            CanvasEvent::EraseVoiceNotes(_) => "erase-voice-notes",
            CanvasEvent::ClearCanvas => "clear-canvas",
        }
    }
}

impl Validate for CanvasEvent {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            CanvasEvent::Drawing(segment) => segment.validate(),
            CanvasEvent::Shape(shape) => shape.validate(),
            CanvasEvent::Text(text) => text.validate(),
            CanvasEvent::VoiceNote(note) => note.validate(),
            CanvasEvent::VoiceNoteMoved(moved) => moved.validate(),
            CanvasEvent::EraseDrawing(circle)
            | CanvasEvent::EraseShapes(circle)
            | CanvasEvent::EraseText(circle)
            | CanvasEvent::EraseVoiceNotes(circle) => circle.validate(),
            CanvasEvent::ClearCanvas => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SessionCommand {
    Join {
        #[serde(rename = "userId")]
        user_id: AuthorId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum SessionEvent {
    RoomFull,
    UserCount(usize),
    LoadDrawing(Vec<StrokeSegment>),
    LoadVoiceNotes(Vec<VoiceNote>),
    LoadShapes(Vec<Shape>),
    LoadText(Vec<TextElement>),
}

/// Frame sent from a client to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClientMessage {
    Session(SessionCommand),
    Canvas(CanvasEvent),
}

/// Frame sent from the relay to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Session(SessionEvent),
    Canvas(CanvasEvent),
}

impl ClientMessage {
    /// Parses and validates one inbound frame.
    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        let message: Self = serde_json::from_str(text)?;
        if let ClientMessage::Canvas(event) = &message {
            event.validate()?;
        }
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ServerMessage {
    pub fn room_full() -> Self {
        ServerMessage::Session(SessionEvent::RoomFull)
    }

    pub fn user_count(count: usize) -> Self {
        ServerMessage::Session(SessionEvent::UserCount(count))
    }

    pub fn from_json(text: &str) -> Result<Self, MessageError> {
        let message: Self = serde_json::from_str(text)?;
        if let ServerMessage::Canvas(event) = &message {
            event.validate()?;
        }
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<CanvasEvent> for ClientMessage {
    fn from(event: CanvasEvent) -> Self {
        ClientMessage::Canvas(event)
    }
}

impl From<CanvasEvent> for ServerMessage {
    fn from(event: CanvasEvent) -> Self {
        ServerMessage::Canvas(event)
    }
}

impl From<SessionEvent> for ServerMessage {
    fn from(event: SessionEvent) -> Self {
        ServerMessage::Session(event)
    }
}
