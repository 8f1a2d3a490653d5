use crate::element::{
    EraseCircle, Shape, StrokeSegment, TextElement, VoiceNote, VoiceNoteMoved,
};
use crate::message::{CanvasEvent, ServerMessage, SessionEvent};
use crate::traits::Erasable;
use crate::types::ElementId;

/// Full contents of a board, as delivered to a newly admitted connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSnapshot {
    pub drawing: Vec<StrokeSegment>,
    pub voice_notes: Vec<VoiceNote>,
    pub shapes: Vec<Shape>,
    pub text: Vec<TextElement>,
}

impl BoardSnapshot {
    /// The load messages, in the order a joining client receives them.
    pub fn into_messages(self) -> Vec<ServerMessage> {
        vec![
            SessionEvent::LoadDrawing(self.drawing).into(),
            SessionEvent::LoadVoiceNotes(self.voice_notes).into(),
            SessionEvent::LoadShapes(self.shapes).into(),
            SessionEvent::LoadText(self.text).into(),
        ]
    }
}

/// What applying an event did to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Appended,
    Moved,
    Erased(usize),
    Cleared,
    Unchanged,
}

/// The four shared collections. One instance lives in the relay's room and one in every client replica;
/// both apply events through [`Board::apply`] so replicas stay in step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    strokes: Vec<StrokeSegment>,
    shapes: Vec<Shape>,
    texts: Vec<TextElement>,
    voice_notes: Vec<VoiceNote>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        Self {
            strokes: snapshot.drawing,
            shapes: snapshot.shapes,
            texts: snapshot.text,
            voice_notes: snapshot.voice_notes,
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            drawing: self.strokes.clone(),
            voice_notes: self.voice_notes.clone(),
            shapes: self.shapes.clone(),
            text: self.texts.clone(),
        }
    }

    pub fn strokes(&self) -> &[StrokeSegment] {
        &self.strokes
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn texts(&self) -> &[TextElement] {
        &self.texts
    }

    pub fn voice_notes(&self) -> &[VoiceNote] {
        &self.voice_notes
    }

    pub fn voice_note(&self, id: ElementId) -> Option<&VoiceNote> {
        self.voice_notes.iter().find(|note| note.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
            && self.shapes.is_empty()
            && self.texts.is_empty()
            && self.voice_notes.is_empty()
    }

    pub fn add_stroke(&mut self, segment: StrokeSegment) {
        self.strokes.push(segment);
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn add_text(&mut self, text: TextElement) {
        self.texts.push(text);
    }

    pub fn add_voice_note(&mut self, note: VoiceNote) {
        self.voice_notes.push(note);
    }

    pub fn replace_strokes(&mut self, strokes: Vec<StrokeSegment>) {
        self.strokes = strokes;
    }

    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }

    pub fn replace_texts(&mut self, texts: Vec<TextElement>) {
        self.texts = texts;
    }

    pub fn replace_voice_notes(&mut self, notes: Vec<VoiceNote>) {
        self.voice_notes = notes;
    }

    /// Returns false when no note has the given id.
    pub fn move_voice_note(&mut self, moved: &VoiceNoteMoved) -> bool {
        match self.voice_notes.iter_mut().find(|note| note.id == moved.id) {
            Some(note) => {
                note.x = moved.x;
                note.y = moved.y;
                true
            }
            None => false,
        }
    }

    pub fn erase_strokes(&mut self, circle: &EraseCircle) -> usize {
        erase(&mut self.strokes, circle)
    }

    pub fn erase_shapes(&mut self, circle: &EraseCircle) -> usize {
        erase(&mut self.shapes, circle)
    }

    pub fn erase_texts(&mut self, circle: &EraseCircle) -> usize {
        erase(&mut self.texts, circle)
    }

    pub fn erase_voice_notes(&mut self, circle: &EraseCircle) -> usize {
        erase(&mut self.voice_notes, circle)
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.shapes.clear();
        self.texts.clear();
        self.voice_notes.clear();
    }

    pub fn apply(&mut self, event: &CanvasEvent) -> Applied {
        match event {
            CanvasEvent::Drawing(segment) => {
                self.add_stroke(segment.clone());
                Applied::Appended
            }
            CanvasEvent::Shape(shape) => {
                self.add_shape(shape.clone());
                Applied::Appended
            }
            CanvasEvent::Text(text) => {
                self.add_text(text.clone());
                Applied::Appended
            }
            CanvasEvent::VoiceNote(note) => {
                self.add_voice_note(note.clone());
                Applied::Appended
            }
            CanvasEvent::VoiceNoteMoved(moved) => {
                if self.move_voice_note(moved) {
                    Applied::Moved
                } else {
                    Applied::Unchanged
                }
            }
            CanvasEvent::EraseDrawing(circle) => erased(self.erase_strokes(circle)),
            CanvasEvent::EraseShapes(circle) => erased(self.erase_shapes(circle)),
            CanvasEvent::EraseText(circle) => erased(self.erase_texts(circle)),
            CanvasEvent::EraseVoiceNotes(circle) => erased(self.erase_voice_notes(circle)),
            CanvasEvent::ClearCanvas => {
                self.clear();
                Applied::Cleared
            }
        }
    }
}

fn erase<T: Erasable>(items: &mut Vec<T>, circle: &EraseCircle) -> usize {
    let before = items.len();
    items.retain(|item| !item.is_hit_by(circle));
    before - items.len()
}

fn erased(count: usize) -> Applied {
    if count == 0 {
        Applied::Unchanged
    } else {
        Applied::Erased(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;

    fn segment(x0: f64, y0: f64, x1: f64, y1: f64) -> StrokeSegment {
        StrokeSegment {
            x0,
            y0,
            x1,
            y1,
            color: "#000000".into(),
            line_width: 2.0,
            opacity: 100.0,
            author_id: "a".into(),
        }
    }

    fn note(id: ElementId, x: f64, y: f64) -> VoiceNote {
        VoiceNote {
            id,
            audio_data: "data:audio/webm;base64,AAAA".into(),
            mime_type: "audio/webm".into(),
            x,
            y,
            timestamp: "2024-05-01T10:00:00.000Z".into(),
            author_id: "a".into(),
            author_color: "#3b82f6".into(),
            author_initials: "A".into(),
        }
    }

    #[test]
    fn it_erases_only_segments_within_radius() {
        let mut board = Board::new();
        board.add_stroke(segment(0.0, 0.0, 10.0, 0.0));
        board.add_stroke(segment(0.0, 20.0, 10.0, 20.0));

        let narrow = EraseCircle {
            x: 5.0,
            y: 1.0,
            radius: 0.5,
        };
        assert_eq!(board.erase_strokes(&narrow), 0);

        let wide = EraseCircle {
            radius: 1.5,
            ..narrow
        };
        assert_eq!(board.apply(&CanvasEvent::EraseDrawing(wide)), Applied::Erased(1));
        assert_eq!(board.strokes(), &[segment(0.0, 20.0, 10.0, 20.0)]);
    }

    #[test]
    fn it_is_idempotent_when_erasing_twice() {
        let mut board = Board::new();
        board.add_stroke(segment(0.0, 0.0, 10.0, 0.0));
        board.add_text(TextElement {
            id: 1,
            x: 4.0,
            y: 0.0,
            text: "hi".into(),
            color: "#000000".into(),
            font_size: 16.0,
            opacity: 100.0,
            author_id: "a".into(),
        });
        let circle = EraseCircle {
            x: 5.0,
            y: 0.0,
            radius: 2.0,
        };
        board.apply(&CanvasEvent::EraseDrawing(circle));
        board.apply(&CanvasEvent::EraseText(circle));
        let after_first = board.clone();

        assert_eq!(
            board.apply(&CanvasEvent::EraseDrawing(circle)),
            Applied::Unchanged
        );
        assert_eq!(board.apply(&CanvasEvent::EraseText(circle)), Applied::Unchanged);
        assert_eq!(board, after_first);
        assert!(board.is_empty());
    }

    #[test]
    fn it_erases_shapes_by_expanded_bounds() {
        let mut board = Board::new();
        board.add_shape(Shape {
            id: 1,
            kind: ShapeKind::Rectangle,
            x: 100.0,
            y: 100.0,
            width: -50.0,
            height: 30.0,
            color: "#000000".into(),
            line_width: 2.0,
            opacity: 100.0,
            author_id: "a".into(),
        });
        let outside = EraseCircle {
            x: 45.0,
            y: 110.0,
            radius: 4.0,
        };
        assert_eq!(board.erase_shapes(&outside), 0);
        let touching = EraseCircle { x: 46.0, ..outside };
        assert_eq!(board.erase_shapes(&touching), 1);
    }

    #[test]
    fn it_moves_existing_voice_note_only() {
        let mut board = Board::new();
        board.add_voice_note(note(5, 1.0, 1.0));

        let moved = VoiceNoteMoved {
            id: 5,
            x: 50.0,
            y: 60.0,
        };
        assert_eq!(board.apply(&CanvasEvent::VoiceNoteMoved(moved)), Applied::Moved);
        assert_eq!(board.voice_note(5).map(|n| (n.x, n.y)), Some((50.0, 60.0)));

        let missing = VoiceNoteMoved { id: 6, ..moved };
        assert_eq!(
            board.apply(&CanvasEvent::VoiceNoteMoved(missing)),
            Applied::Unchanged
        );
        assert_eq!(board.voice_notes().len(), 1);
        assert!(board.voice_note(6).is_none());
    }

    #[test]
    fn it_erases_voice_notes_by_distance_to_position() {
        let mut board = Board::new();
        board.add_voice_note(note(1, 10.0, 10.0));
        board.add_voice_note(note(2, 40.0, 10.0));

        let circle = EraseCircle {
            x: 13.0,
            y: 14.0,
            radius: 5.0,
        };
        assert_eq!(
            board.apply(&CanvasEvent::EraseVoiceNotes(circle)),
            Applied::Erased(1)
        );
        assert!(board.voice_note(1).is_none());
        assert!(board.voice_note(2).is_some());
        assert_eq!(
            board.apply(&CanvasEvent::EraseVoiceNotes(circle)),
            Applied::Unchanged
        );
        assert_eq!(board.snapshot().voice_notes, vec![note(2, 40.0, 10.0)]);
    }

    #[test]
    fn it_clears_every_collection() {
        let mut board = Board::new();
        board.add_stroke(segment(0.0, 0.0, 1.0, 1.0));
        board.add_voice_note(note(1, 0.0, 0.0));
        board.apply(&CanvasEvent::ClearCanvas);
        assert!(board.is_empty());
        assert_eq!(board.snapshot(), BoardSnapshot::default());
    }

    #[test]
    fn it_round_trips_through_snapshot() {
        let mut board = Board::new();
        board.add_stroke(segment(0.0, 0.0, 1.0, 1.0));
        board.add_voice_note(note(1, 3.0, 4.0));
        assert_eq!(Board::from_snapshot(board.snapshot()), board);
    }
}
