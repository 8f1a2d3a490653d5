use std::num::Wrapping;

use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use system::{CanvasEvent, ClientMessage, ConnectionId, ServerMessage, SessionCommand};

use super::connection::{ConnectionCommand, ConnectionEvent};
use crate::connection_tx_storage::{ConnectionTx, ConnectionTxStorage};
use crate::room::{Room, RoomError};

pub type ServerTx = UnboundedSender<ConnectionCommand>;

/// Owns the single room. Commands are handled one at a time, so every
/// member observes the same order of board mutations.
struct Server {
    room: Room,
    connections: ConnectionTxStorage,
    connection_id_source: Wrapping<ConnectionId>,
}

impl Server {
    fn new() -> Self {
        Self {
            room: Room::new(),
            connections: ConnectionTxStorage::new(),
            connection_id_source: Wrapping(0),
        }
    }

    fn handle_connection_command(&mut self, command: ConnectionCommand) {
        match command {
            ConnectionCommand::Connect { tx } => self.connect(tx),
            ConnectionCommand::Disconnect { from } => self.disconnect(from),
            ConnectionCommand::Message { from, message } => {
                if !self.room.contains(from) {
                    log::warn!("Message from connection {} outside the room", from);
                    return;
                }
                match message {
                    ClientMessage::Session(command) => self.handle_session_command(from, command),
                    ClientMessage::Canvas(event) => self.handle_canvas_event(from, event),
                }
            }
        }
    }

    fn next_connection_id(&mut self) -> ConnectionId {
        loop {
            self.connection_id_source += Wrapping(1);
            let id = self.connection_id_source.0;
            if !self.connections.contains(&id) {
                return id;
            }
        }
    }

    fn connect(&mut self, tx: ConnectionTx) {
        self.prune_closed();

        if self.room.is_full() {
            log::info!("Rejecting connection: room is full");
            let _ = tx.send(ConnectionEvent::Message(ServerMessage::room_full()));
            let _ = tx.send(ConnectionEvent::Rejected);
            return;
        }

        let connection_id = self.next_connection_id();
        match self.room.admit(connection_id) {
            Ok(()) => {}
            Err(RoomError::Full) | Err(RoomError::AlreadyMember(_)) => {
                log::error!("Could not admit connection {}", connection_id);
                let _ = tx.send(ConnectionEvent::Rejected);
                return;
            }
        }
        self.connections.insert(connection_id, tx);
        self.connections
            .send(&connection_id, ConnectionEvent::Connected { connection_id });
        for message in self.room.snapshot().into_messages() {
            self.connections
                .send(&connection_id, ConnectionEvent::Message(message));
        }
        log::info!(
            "Connection {} joined ({} in room)",
            connection_id,
            self.room.member_count()
        );
        self.broadcast_user_count();
    }

    fn disconnect(&mut self, connection_id: ConnectionId) {
        self.connections.remove(&connection_id);
        if self.room.leave(connection_id) {
            log::info!(
                "Connection {} left ({} in room)",
                connection_id,
                self.room.member_count()
            );
            self.broadcast_user_count();
        }
    }

    /// Drops members whose actor went away without reporting a disconnect.
    fn prune_closed(&mut self) {
        for connection_id in self.connections.closed() {
            log::debug!("Pruning closed connection {}", connection_id);
            self.disconnect(connection_id);
        }
    }

    fn handle_session_command(&mut self, from: ConnectionId, command: SessionCommand) {
        match command {
            SessionCommand::Join { user_id } => {
                log::info!("Connection {} identified as {}", from, user_id);
                self.room.identify(from, user_id);
            }
        }
    }

    fn handle_canvas_event(&mut self, from: ConnectionId, event: CanvasEvent) {
        let applied = self.room.apply(&event);
        log::debug!("{} from {}: {:?}", event.name(), from, applied);
        match event {
            CanvasEvent::ClearCanvas => self.broadcast(event.into(), None),
            event => self.broadcast(event.into(), Some(from)),
        }
    }

    fn broadcast_user_count(&mut self) {
        let count = self.room.member_count();
        self.broadcast(ServerMessage::user_count(count), None);
    }

    fn broadcast(&mut self, message: ServerMessage, without: Option<ConnectionId>) {
        for connection_id in self.room.member_ids() {
            if without == Some(connection_id) {
                continue;
            }
            self.connections
                .send(&connection_id, ConnectionEvent::Message(message.clone()));
        }
    }
}

pub fn spawn_server() -> ServerTx {
    let (srv_tx, mut srv_rx) = unbounded_channel::<ConnectionCommand>();

    tokio::spawn(async move {
        let mut server = Box::new(Server::new());

        while let Some(command) = srv_rx.recv().await {
            server.handle_connection_command(command);
        }
        log::info!("Relay stopped");
    });

    srv_tx
}
