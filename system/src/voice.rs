use crate::types::{AuthorId, ElementId};
use std::collections::HashSet;

pub const DEFAULT_AUTHOR_COLOR: &str = "#3b82f6";
pub const FALLBACK_MIME_TYPE: &str = "audio/webm";

const PREFERRED_MIME_TYPES: [&str; 3] = ["audio/mp4", "audio/wav", "audio/ogg"];

/// Picks the recording format, most compatible first.
pub fn preferred_mime_type<F>(is_supported: F) -> &'static str
where
    F: Fn(&str) -> bool,
{
    PREFERRED_MIME_TYPES
        .iter()
        .copied()
        .find(|mime_type| is_supported(mime_type))
        .unwrap_or(FALLBACK_MIME_TYPE)
}

/// Who is drawing on this client.
#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub id: AuthorId,
    pub color: String,
}

impl Author {
    pub fn new(id: impl Into<AuthorId>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
        }
    }

    pub fn generate() -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_simple().to_string(),
            DEFAULT_AUTHOR_COLOR,
        )
    }

    /// First two characters of the id, upper-cased.
    pub fn initials(&self) -> String {
        let initials: String = self.id.chars().take(2).collect::<String>().to_uppercase();
        if initials.is_empty() {
            "U".into()
        } else {
            initials
        }
    }
}

/// Voice notes currently being played back.
#[derive(Debug, Default)]
pub struct PlayingNotes {
    ids: HashSet<ElementId>,
}

impl PlayingNotes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the note was already playing.
    pub fn start(&mut self, id: ElementId) -> bool {
        self.ids.insert(id)
    }

    pub fn finish(&mut self, id: ElementId) {
        self.ids.remove(&id);
    }

    pub fn fail(&mut self, id: ElementId) {
        if self.ids.remove(&id) {
            log::warn!("Playback of voice note {} failed", id);
        }
    }

    pub fn is_playing(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.ids.iter()
    }
}
