use system::{
    Author, Board, CanvasEvent, ClientMessage, ClientReplica, Effect, ScreenPoint,
    ServerMessage, Tool, VoiceNote,
};

/// Stands in for the relay: applies what a client emits and returns what the other client receives.
fn relay(board: &mut Board, effects: Vec<Effect>) -> Vec<ServerMessage> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Emit(ClientMessage::Canvas(event)) => {
                board.apply(&event);
                Some(ServerMessage::Canvas(event))
            }
            _ => None,
        })
        .collect()
}

fn joined(board: &Board, name: &str) -> ClientReplica {
    let mut client = ClientReplica::new(Author::new(name, "#3b82f6"));
    for message in board.snapshot().into_messages() {
        client.handle_server_message(message);
    }
    client
}

fn voice_note(id: u64, x: f64, y: f64) -> VoiceNote {
    VoiceNote {
        id,
        audio_data: "data:audio/webm;base64,AAAA".into(),
        mime_type: "audio/webm".into(),
        x,
        y,
        timestamp: "2024-05-01T10:00:00.000Z".into(),
        author_id: "alice".into(),
        author_color: "#3b82f6".into(),
        author_initials: "AL".into(),
    }
}

#[test]
fn it_keeps_both_replicas_and_relay_in_step() {
    let mut relay_board = Board::new();
    let mut alice = joined(&relay_board, "alice");
    let mut bob = joined(&relay_board, "bob");

    alice.pointer_down(ScreenPoint::new(0.0, 0.0), 0);
    let mut outgoing = alice.pointer_move(ScreenPoint::new(10.0, 0.0), 1);
    outgoing.extend(alice.pointer_move(ScreenPoint::new(20.0, 0.0), 2));
    outgoing.extend(alice.pointer_up(3));

    alice.set_tool(Tool::Rectangle);
    alice.pointer_down(ScreenPoint::new(50.0, 50.0), 4);
    alice.pointer_move(ScreenPoint::new(80.0, 70.0), 5);
    outgoing.extend(alice.pointer_up(6));

    for message in relay(&mut relay_board, outgoing) {
        bob.handle_server_message(message);
    }

    assert_eq!(relay_board.strokes().len(), 2);
    assert_eq!(relay_board.shapes().len(), 1);
    assert_eq!(alice.board(), &relay_board);
    assert_eq!(bob.board(), &relay_board);

    bob.set_tool(Tool::Eraser);
    let erased = bob.pointer_down(ScreenPoint::new(0.0, 5.0), 7);
    assert_eq!(erased.len(), 1);
    for message in relay(&mut relay_board, erased) {
        alice.handle_server_message(message);
    }
    assert_eq!(relay_board.strokes().len(), 1);
    assert_eq!(alice.board(), &relay_board);
    assert_eq!(bob.board(), &relay_board);
}

#[test]
fn it_restores_relay_state_on_late_join() {
    let mut relay_board = Board::new();
    relay_board.add_voice_note(voice_note(5, 10.0, 10.0));
    relay_board.apply(&CanvasEvent::EraseText(system::EraseCircle {
        x: 0.0,
        y: 0.0,
        radius: 3.0,
    }));

    let late = joined(&relay_board, "carol");
    assert_eq!(late.board(), &relay_board);

    relay_board.apply(&CanvasEvent::ClearCanvas);
    let after_clear = joined(&relay_board, "dave");
    assert!(after_clear.board().is_empty());
}

#[test]
fn it_plays_note_on_short_press() {
    let mut relay_board = Board::new();
    relay_board.add_voice_note(voice_note(5, 100.0, 100.0));
    let mut bob = joined(&relay_board, "bob");

    assert!(bob.press_voice_note(5, ScreenPoint::new(100.0, 100.0), 0));
    bob.pointer_move(ScreenPoint::new(103.0, 100.0), 20);
    let effects = bob.pointer_up(40);

    assert_eq!(effects, vec![Effect::Play(5)]);
    assert!(bob.playing().is_playing(5));
    assert_eq!(bob.board(), &relay_board);

    bob.playback_failed(5);
    assert!(!bob.playing().is_playing(5));
}

#[test]
fn it_emits_single_move_after_drag() {
    let mut relay_board = Board::new();
    relay_board.add_voice_note(voice_note(5, 100.0, 100.0));
    let mut alice = joined(&relay_board, "alice");
    let mut bob = joined(&relay_board, "bob");

    assert!(alice.press_voice_note(5, ScreenPoint::new(100.0, 100.0), 0));
    assert!(alice.pointer_move(ScreenPoint::new(105.0, 100.0), 20).is_empty());
    assert_eq!(alice.dragging_note(), Some(5));
    assert!(alice.pointer_move(ScreenPoint::new(150.0, 160.0), 60).is_empty());
    let effects = alice.pointer_up(80);

    let moves: Vec<_> = effects
        .iter()
        .filter(|effect| {
            matches!(
                effect,
                Effect::Emit(ClientMessage::Canvas(CanvasEvent::VoiceNoteMoved(_)))
            )
        })
        .collect();
    assert_eq!(moves.len(), 1);
    assert_eq!(effects.len(), 1);

    for message in relay(&mut relay_board, effects) {
        bob.handle_server_message(message);
    }
    let note = relay_board.voice_note(5).expect("note exists");
    assert_eq!((note.x, note.y), (150.0, 160.0));
    assert_eq!(bob.board(), &relay_board);
    assert!(!alice.playing().is_playing(5));
}

#[test]
fn it_ignores_press_on_missing_note() {
    let relay_board = Board::new();
    let mut bob = joined(&relay_board, "bob");
    assert!(!bob.press_voice_note(42, ScreenPoint::new(0.0, 0.0), 0));
    assert!(bob.pointer_up(1).is_empty());
}
