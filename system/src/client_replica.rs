use crate::board::{Applied, Board};
use crate::element::{EraseCircle, Shape, StrokeSegment, VoiceNote, VoiceNoteMoved};
use crate::gesture::{NoteDrag, NoteRelease, ShapeDraft, TextDraft, Tool, ToolSettings};
use crate::geometry::ViewTransform;
use crate::message::{CanvasEvent, ClientMessage, ServerMessage, SessionCommand, SessionEvent};
use crate::types::{ElementId, LogicalPoint, ScreenPoint, ScreenVector};
use crate::voice::{Author, PlayingNotes};
use serde::Serialize;

/// Something the host must do after a local gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", content = "data", rename_all = "kebab-case")]
pub enum Effect {
    /// Send this frame to the relay.
    Emit(ClientMessage),
    /// Start audio playback of this voice note.
    Play(ElementId),
}

impl From<CanvasEvent> for Effect {
    fn from(event: CanvasEvent) -> Self {
        Effect::Emit(ClientMessage::Canvas(event))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Pen { last: LogicalPoint },
    Erasing,
    Shape(ShapeDraft),
    Panning { grab: ScreenVector },
    Note(NoteDrag),
}

/// Client side mirror of the relay's board.
///
/// Local gestures mutate the mirror first and hand back the events to emit;
/// frames from the relay are applied without producing anything to send, so
/// nothing echoes back.
pub struct ClientReplica {
    author: Author,
    board: Board,
    view: ViewTransform,
    settings: ToolSettings,
    gesture: Gesture,
    text_draft: Option<TextDraft>,
    pointer: LogicalPoint,
    playing: PlayingNotes,
    user_count: usize,
    room_full: bool,
}

impl ClientReplica {
    pub fn new(author: Author) -> Self {
        log::debug!("ClientReplica created for author {}", author.id);
        Self {
            author,
            board: Board::new(),
            view: ViewTransform::default(),
            settings: ToolSettings::default(),
            gesture: Gesture::Idle,
            text_draft: None,
            pointer: LogicalPoint::origin(),
            playing: PlayingNotes::new(),
            user_count: 0,
            room_full: false,
        }
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewTransform {
        &mut self.view
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.settings.tool = tool;
        self.gesture = Gesture::Idle;
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn is_room_full(&self) -> bool {
        self.room_full
    }

    pub fn playing(&self) -> &PlayingNotes {
        &self.playing
    }

    pub fn text_draft(&self) -> Option<&TextDraft> {
        self.text_draft.as_ref()
    }

    /// Last known pointer position; new voice notes are placed here.
    pub fn pointer(&self) -> LogicalPoint {
        self.pointer
    }

    /// The in-progress shape, for rendering only.
    pub fn shape_preview(&self) -> Option<Shape> {
        match &self.gesture {
            Gesture::Shape(draft) => Some(draft.to_shape(0, &self.author)),
            _ => None,
        }
    }

    pub fn dragging_note(&self) -> Option<ElementId> {
        match &self.gesture {
            Gesture::Note(drag) if drag.is_dragging() => Some(drag.note_id()),
            _ => None,
        }
    }

    pub fn join_message(&self) -> ClientMessage {
        ClientMessage::Session(SessionCommand::Join {
            user_id: self.author.id.clone(),
        })
    }

    /// Applies a frame from the relay. Never yields anything to emit.
    pub fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Session(SessionEvent::RoomFull) => {
                log::warn!("Room is full");
                self.room_full = true;
            }
            ServerMessage::Session(SessionEvent::UserCount(count)) => self.user_count = count,
            ServerMessage::Session(SessionEvent::LoadDrawing(strokes)) => {
                self.board.replace_strokes(strokes)
            }
            ServerMessage::Session(SessionEvent::LoadVoiceNotes(notes)) => {
                self.board.replace_voice_notes(notes)
            }
            ServerMessage::Session(SessionEvent::LoadShapes(shapes)) => {
                self.board.replace_shapes(shapes)
            }
            ServerMessage::Session(SessionEvent::LoadText(texts)) => {
                self.board.replace_texts(texts)
            }
            ServerMessage::Canvas(event) => {
                let applied = self.board.apply(&event);
                log::debug!("Remote {} -> {:?}", event.name(), applied);
                if applied == Applied::Cleared {
                    self.playing.clear();
                }
            }
        }
    }

    pub fn pointer_down(&mut self, screen: ScreenPoint, now_ms: u64) -> Vec<Effect> {
        if let Gesture::Note(_) = self.gesture {
            return Vec::new();
        }
        let logical = self.view.screen_to_logical(screen);
        self.pointer = logical;

        match self.settings.tool {
            Tool::Hand => {
                self.gesture = Gesture::Panning {
                    grab: screen.to_vector() - self.view.pan(),
                };
                Vec::new()
            }
            Tool::Pen => {
                self.gesture = Gesture::Pen { last: logical };
                Vec::new()
            }
            Tool::Eraser => {
                self.gesture = Gesture::Erasing;
                self.erase_at(logical)
            }
            Tool::Text => {
                self.text_draft = Some(TextDraft::new(logical, &self.settings));
                Vec::new()
            }
            tool => {
                if let Some(kind) = tool.shape_kind() {
                    log::debug!("Starting {:?} at {:?} ({})", kind, logical, now_ms);
                    self.gesture = Gesture::Shape(ShapeDraft::new(kind, logical, &self.settings));
                }
                Vec::new()
            }
        }
    }

    pub fn pointer_move(&mut self, screen: ScreenPoint, now_ms: u64) -> Vec<Effect> {
        if let Gesture::Panning { grab } = self.gesture {
            self.view.set_pan(screen.to_vector() - grab);
            return Vec::new();
        }

        let logical = self.view.screen_to_logical(screen);
        self.pointer = logical;

        match &mut self.gesture {
            Gesture::Pen { last } => {
                let segment = StrokeSegment {
                    x0: last.x,
                    y0: last.y,
                    x1: logical.x,
                    y1: logical.y,
                    color: self.settings.color.clone(),
                    line_width: self.settings.stroke_width,
                    opacity: self.settings.opacity,
                    author_id: self.author.id.clone(),
                };
                *last = logical;
                self.board.add_stroke(segment.clone());
                vec![CanvasEvent::Drawing(segment).into()]
            }
            Gesture::Erasing => self.erase_at(logical),
            Gesture::Shape(draft) => {
                draft.update(logical);
                Vec::new()
            }
            Gesture::Note(drag) => {
                if let Some(position) = drag.track(logical, now_ms) {
                    // Local only until release.
                    self.board.move_voice_note(&VoiceNoteMoved {
                        id: drag.note_id(),
                        x: position.x,
                        y: position.y,
                    });
                }
                Vec::new()
            }
            Gesture::Idle | Gesture::Panning { .. } => Vec::new(),
        }
    }

    pub fn pointer_up(&mut self, now_ms: u64) -> Vec<Effect> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Shape(draft) => match draft.finish(now_ms, &self.author) {
                Some(shape) => {
                    self.board.add_shape(shape.clone());
                    vec![CanvasEvent::Shape(shape).into()]
                }
                None => Vec::new(),
            },
            Gesture::Note(drag) => match drag.release() {
                NoteRelease::Click(id) => {
                    self.playing.start(id);
                    vec![Effect::Play(id)]
                }
                NoteRelease::Dropped(id) => match self.board.voice_note(id) {
                    Some(note) => vec![CanvasEvent::VoiceNoteMoved(VoiceNoteMoved {
                        id,
                        x: note.x,
                        y: note.y,
                    })
                    .into()],
                    // Erased or cleared remotely mid-drag.
                    None => Vec::new(),
                },
            },
            _ => Vec::new(),
        }
    }

    /// Starts a press on a voice note. Returns false if no such note exists.
    pub fn press_voice_note(&mut self, id: ElementId, screen: ScreenPoint, now_ms: u64) -> bool {
        let logical = self.view.screen_to_logical(screen);
        match self.board.voice_note(id) {
            Some(note) => {
                self.pointer = logical;
                self.gesture = Gesture::Note(NoteDrag::new(id, logical, note.position(), now_ms));
                true
            }
            None => false,
        }
    }

    pub fn commit_text(&mut self, input: &str, now_ms: u64) -> Vec<Effect> {
        let draft = match self.text_draft.take() {
            Some(draft) => draft,
            None => return Vec::new(),
        };
        match draft.commit(input, now_ms, &self.author) {
            Some(text) => {
                self.board.add_text(text.clone());
                vec![CanvasEvent::Text(text).into()]
            }
            None => Vec::new(),
        }
    }

    pub fn cancel_text(&mut self) {
        self.text_draft = None;
    }

    /// Turns a finished recording into a voice note at the last pointer position.
    pub fn add_recording(
        &mut self,
        audio_data: String,
        mime_type: String,
        now_ms: u64,
        timestamp: String,
    ) -> Vec<Effect> {
        let note = VoiceNote {
            id: now_ms,
            audio_data,
            mime_type,
            x: self.pointer.x,
            y: self.pointer.y,
            timestamp,
            author_id: self.author.id.clone(),
            author_color: self.author.color.clone(),
            author_initials: self.author.initials(),
        };
        log::debug!("Creating voice note at {:?}", self.pointer);
        self.board.add_voice_note(note.clone());
        vec![CanvasEvent::VoiceNote(note).into()]
    }

    pub fn clear(&mut self) -> Vec<Effect> {
        self.board.clear();
        self.playing.clear();
        self.gesture = Gesture::Idle;
        vec![CanvasEvent::ClearCanvas.into()]
    }

    pub fn playback_finished(&mut self, id: ElementId) {
        self.playing.finish(id);
    }

    pub fn playback_failed(&mut self, id: ElementId) {
        self.playing.fail(id);
    }

    // One event per collection that actually lost something.
    fn erase_at(&mut self, center: LogicalPoint) -> Vec<Effect> {
        let circle = EraseCircle::new(center, self.settings.eraser_size / 2.0);
        let candidates = [
            CanvasEvent::EraseDrawing(circle),
            CanvasEvent::EraseShapes(circle),
            CanvasEvent::EraseText(circle),
            CanvasEvent::EraseVoiceNotes(circle),
        ];
        let mut effects = Vec::new();
        for event in candidates.iter() {
            if let Applied::Erased(_) = self.board.apply(event) {
                effects.push(event.clone().into());
            }
        }
        effects
    }
}
