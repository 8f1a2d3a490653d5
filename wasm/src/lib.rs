mod utils;

use serde::Serialize;
use system::{
    preferred_mime_type, serde_json, Author, ClientReplica, Effect, ElementId, MessageError,
    ScreenPoint, ScreenVector, ServerMessage, Shape, StrokeSegment, TextElement, Tool, VoiceNote,
};
use wasm_bindgen::prelude::*;

// Everything crosses the boundary as JSON strings, so the host never has to
// free Rust objects other than the client itself.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextDraftView {
    x: f64,
    y: f64,
    color: String,
    font_size: f64,
    opacity: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientView<'a> {
    drawing: &'a [StrokeSegment],
    shapes: &'a [Shape],
    text: &'a [TextElement],
    voice_notes: &'a [VoiceNote],
    shape_preview: Option<Shape>,
    text_draft: Option<TextDraftView>,
    dragging_note: Option<ElementId>,
    playing: Vec<ElementId>,
    scale: f64,
    pan_x: f64,
    pan_y: f64,
    tool: Tool,
    color: &'a str,
    stroke_width: f64,
    opacity: f64,
    eraser_size: f64,
    user_count: usize,
    room_full: bool,
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn effects_to_json(effects: Vec<Effect>) -> Result<String, JsValue> {
    serde_json::to_string(&effects).map_err(to_js_error)
}

fn parse_frame(json: &str) -> Result<ServerMessage, MessageError> {
    ServerMessage::from_json(json).map_err(|err| {
        log::warn!("Dropping frame from relay: {}", err);
        err
    })
}

fn timestamp(now_ms: f64) -> u64 {
    if now_ms.is_finite() && now_ms > 0.0 {
        now_ms as u64
    } else {
        0
    }
}

#[wasm_bindgen]
pub struct WhiteboardClient {
    replica: ClientReplica,
}

#[wasm_bindgen]
impl WhiteboardClient {
    /// Creates a client for a fresh random author.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        utils::set_panic_hook();

        WhiteboardClient {
            replica: ClientReplica::new(Author::generate()),
        }
    }

    pub fn with_author(user_id: String, color: String) -> Self {
        utils::set_panic_hook();

        WhiteboardClient {
            replica: ClientReplica::new(Author::new(user_id, color)),
        }
    }

    pub fn user_id(&self) -> String {
        self.replica.author().id.clone()
    }

    /// The `join` frame to send once the socket opens.
    pub fn join_message(&self) -> Result<String, JsValue> {
        self.replica.join_message().to_json().map_err(to_js_error)
    }

    /// Applies one frame received from the relay.
    pub fn handle_message(&mut self, json: &str) -> Result<(), JsValue> {
        let message = parse_frame(json).map_err(to_js_error)?;
        self.replica.handle_server_message(message);
        Ok(())
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        let effects = self
            .replica
            .pointer_down(ScreenPoint::new(x, y), timestamp(now_ms));
        effects_to_json(effects)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) -> Result<String, JsValue> {
        let effects = self
            .replica
            .pointer_move(ScreenPoint::new(x, y), timestamp(now_ms));
        effects_to_json(effects)
    }

    pub fn pointer_up(&mut self, now_ms: f64) -> Result<String, JsValue> {
        effects_to_json(self.replica.pointer_up(timestamp(now_ms)))
    }

    /// Returns false when no note with this id exists.
    pub fn press_voice_note(&mut self, id: f64, x: f64, y: f64, now_ms: f64) -> bool {
        self.replica
            .press_voice_note(timestamp(id), ScreenPoint::new(x, y), timestamp(now_ms))
    }

    pub fn commit_text(&mut self, input: &str, now_ms: f64) -> Result<String, JsValue> {
        effects_to_json(self.replica.commit_text(input, timestamp(now_ms)))
    }

    pub fn cancel_text(&mut self) {
        self.replica.cancel_text();
    }

    pub fn add_recording(
        &mut self,
        audio_data: String,
        mime_type: String,
        now_ms: f64,
        iso_timestamp: String,
    ) -> Result<String, JsValue> {
        let effects =
            self.replica
                .add_recording(audio_data, mime_type, timestamp(now_ms), iso_timestamp);
        effects_to_json(effects)
    }

    pub fn clear(&mut self) -> Result<String, JsValue> {
        effects_to_json(self.replica.clear())
    }

    pub fn playback_finished(&mut self, id: f64) {
        self.replica.playback_finished(timestamp(id));
    }

    pub fn playback_failed(&mut self, id: f64) {
        self.replica.playback_failed(timestamp(id));
    }

    /// `tool` is one of the lowercase tool names, e.g. `"pen"` or `"arrow"`.
    pub fn set_tool(&mut self, tool: &str) -> Result<(), JsValue> {
        let tool: Tool = serde_json::from_value(serde_json::Value::String(tool.into()))
            .map_err(|err| {
                log::warn!("Unknown tool {:?}", tool);
                to_js_error(err)
            })?;
        log::debug!("Tool set to {:?}", tool);
        self.replica.set_tool(tool);
        Ok(())
    }

    pub fn set_color(&mut self, color: String) {
        self.replica.settings_mut().color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.replica.settings_mut().stroke_width = width;
        }
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if opacity.is_finite() {
            self.replica.settings_mut().opacity = opacity.max(0.0).min(100.0);
        }
    }

    pub fn set_eraser_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.replica.settings_mut().eraser_size = size;
        }
    }

    pub fn zoom_by_wheel(&mut self, delta_y: f64) {
        self.replica.view_mut().zoom_by_wheel(delta_y);
    }

    pub fn zoom_in(&mut self) {
        self.replica.view_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.replica.view_mut().zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.replica.view_mut().reset();
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.replica.view_mut().set_pan(ScreenVector::new(x, y));
    }

    /// `[a, b, c, d, e, f]` suitable for `CanvasRenderingContext2D.setTransform`.
    pub fn canvas_matrix(&self) -> Vec<f64> {
        self.replica.view().canvas_matrix().to_array().to_vec()
    }

    /// Everything the host needs to render one frame.
    pub fn state(&self) -> Result<String, JsValue> {
        let board = self.replica.board();
        let settings = self.replica.settings();
        let view = self.replica.view();
        let mut playing: Vec<ElementId> = self.replica.playing().iter().copied().collect();
        playing.sort_unstable();

        let state = ClientView {
            drawing: board.strokes(),
            shapes: board.shapes(),
            text: board.texts(),
            voice_notes: board.voice_notes(),
            shape_preview: self.replica.shape_preview(),
            text_draft: self.replica.text_draft().map(|draft| TextDraftView {
                x: draft.at.x,
                y: draft.at.y,
                color: draft.color.clone(),
                font_size: draft.font_size,
                opacity: draft.opacity,
            }),
            dragging_note: self.replica.dragging_note(),
            playing,
            scale: view.scale(),
            pan_x: view.pan().x,
            pan_y: view.pan().y,
            tool: settings.tool,
            color: &settings.color,
            stroke_width: settings.stroke_width,
            opacity: settings.opacity,
            eraser_size: settings.eraser_size,
            user_count: self.replica.user_count(),
            room_full: self.replica.is_room_full(),
        };
        serde_json::to_string(&state).map_err(to_js_error)
    }
}

/// Picks the recording format from a JSON array of MIME types the browser supports.
#[wasm_bindgen]
pub fn preferred_recording_mime_type(supported_json: &str) -> String {
    let supported: Vec<String> = serde_json::from_str(supported_json).unwrap_or_default();
    preferred_mime_type(|mime| supported.iter().any(|s| s == mime)).to_owned()
}
