use crate::connection::ConnectionEvent;
use std::collections::HashMap;
use system::ConnectionId;

pub type ConnectionTx = tokio::sync::mpsc::UnboundedSender<ConnectionEvent>;

pub struct ConnectionTxStorage {
    connection_txs: HashMap<ConnectionId, ConnectionTx>,
}

impl ConnectionTxStorage {
    pub fn new() -> Self {
        Self {
            connection_txs: HashMap::new(),
        }
    }

    pub fn insert(&mut self, connection_id: ConnectionId, tx: ConnectionTx) {
        self.connection_txs.insert(connection_id, tx);
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.connection_txs.contains_key(connection_id)
    }

    /// Returns false if the connection is unknown or its actor is gone.
    pub fn send(&self, to: &ConnectionId, event: ConnectionEvent) -> bool {
        match self.connection_txs.get(to) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    log::warn!("Connection {} is closed; event dropped", to);
                    false
                } else {
                    true
                }
            }
            None => {
                log::warn!("Tried to send to unknown connection {}", to);
                false
            }
        }
    }

    /// Connections whose receiving side has been dropped.
    pub fn closed(&self) -> Vec<ConnectionId> {
        self.connection_txs
            .iter()
            .filter(|(_, tx)| tx.is_closed())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn remove(&mut self, connection_id: &ConnectionId) -> Option<ConnectionTx> {
        self.connection_txs.remove(connection_id)
    }
}
