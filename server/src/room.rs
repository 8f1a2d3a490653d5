use system::{Applied, AuthorId, Board, BoardSnapshot, CanvasEvent, ConnectionId};
use thiserror::Error;

pub const ROOM_CAPACITY: usize = 2;

#[derive(Debug, Error, PartialEq)]
pub enum RoomError {
    #[error("room is full")]
    Full,
    #[error("connection {0} is already in the room")]
    AlreadyMember(ConnectionId),
}

#[derive(Debug)]
struct Member {
    connection_id: ConnectionId,
    user_id: Option<AuthorId>,
}

/// Participants plus the authoritative board they share.
#[derive(Debug, Default)]
pub struct Room {
    members: Vec<Member>,
    board: Board,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, connection_id: ConnectionId) -> bool {
        self.members
            .iter()
            .any(|m| m.connection_id == connection_id)
    }

    pub fn member_ids(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.connection_id).collect()
    }

    pub fn user_id(&self, connection_id: ConnectionId) -> Option<&str> {
        self.members
            .iter()
            .find(|m| m.connection_id == connection_id)
            .and_then(|m| m.user_id.as_deref())
    }

    pub fn admit(&mut self, connection_id: ConnectionId) -> Result<(), RoomError> {
        if self.contains(connection_id) {
            return Err(RoomError::AlreadyMember(connection_id));
        }
        if self.is_full() {
            return Err(RoomError::Full);
        }
        self.members.push(Member {
            connection_id,
            user_id: None,
        });
        Ok(())
    }

    pub fn leave(&mut self, connection_id: ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.connection_id != connection_id);
        self.members.len() != before
    }

    /// Records the user id a member announced with `join`.
    pub fn identify(&mut self, connection_id: ConnectionId, user_id: AuthorId) -> bool {
        match self
            .members
            .iter_mut()
            .find(|m| m.connection_id == connection_id)
        {
            Some(member) => {
                member.user_id = Some(user_id);
                true
            }
            None => false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn apply(&mut self, event: &CanvasEvent) -> Applied {
        self.board.apply(event)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_admits_at_most_two_members() {
        let mut room = Room::new();
        assert_eq!(room.admit(1), Ok(()));
        assert_eq!(room.admit(1), Err(RoomError::AlreadyMember(1)));
        assert_eq!(room.admit(2), Ok(()));
        assert!(room.is_full());
        assert_eq!(room.admit(3), Err(RoomError::Full));
        assert_eq!(room.member_ids(), vec![1, 2]);
    }

    #[test]
    fn it_frees_a_seat_on_leave() {
        let mut room = Room::new();
        room.admit(1).unwrap();
        room.admit(2).unwrap();
        assert!(room.leave(1));
        assert!(!room.leave(1));
        assert_eq!(room.member_count(), 1);
        assert_eq!(room.admit(3), Ok(()));
    }

    #[test]
    fn it_keeps_board_when_everyone_leaves() {
        let mut room = Room::new();
        room.admit(1).unwrap();
        assert!(room.identify(1, "alice".into()));
        assert_eq!(room.user_id(1), Some("alice"));
        room.apply(&CanvasEvent::Drawing(system::StrokeSegment {
            x0: 0.0,
            y0: 0.0,
            x1: 1.0,
            y1: 1.0,
            color: "#000000".into(),
            line_width: 2.0,
            opacity: 100.0,
            author_id: "alice".into(),
        }));
        room.leave(1);
        assert_eq!(room.member_count(), 0);
        assert_eq!(room.board().strokes().len(), 1);
        assert!(!room.identify(1, "alice".into()));
    }
}
