use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use uuid::Uuid;

use ripple_core::protocol::PreparedFrame;

/// Receiving half of a connection's outbound queue. Owned by the write pump.
pub type Outbox = mpsc::Receiver<Outbound>;

/// One queued item.
///
/// Event frames stay shared until the write pump turns them into a WS
/// message, so a fan-out only clones an `Arc` per target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Frame(PreparedFrame),
    /// WS-level answer to a peer ping.
    Pong(Vec<u8>),
}

impl Outbound {
    pub fn into_message(self) -> Message {
        match self {
            Outbound::Frame(f) => Message::Text(f.as_str().to_owned()),
            Outbound::Pong(p) => Message::Pong(p),
        }
    }

    /// Text of an event frame; `None` for control frames.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Outbound::Frame(f) => Some(f.as_str()),
            Outbound::Pong(_) => None,
        }
    }
}

/// Lifecycle of one connection.
///
/// `Connecting -> Active -> Closing -> Closed`. Nothing leaves `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Active,
    Closing,
    Closed,
}

/// Outcome of a non-blocking enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueue {
    Queued,
    /// Queue at capacity; the frame was dropped.
    Full,
    /// Connection is not active or its queue is already closed.
    Closed,
}

struct Slot {
    state: ConnState,
    tx: Option<mpsc::Sender<Outbound>>,
}

/// One live client: identity plus the producer side of its bounded outbound queue.
///
/// The sender lives behind the same lock as the state so that closing the
/// queue and observing liveness can never disagree.
pub struct Connection {
    id: Uuid,
    user: Arc<str>,
    slot: Mutex<Slot>,
}

impl Connection {
    /// Build a connection for an authenticated user with a queue of `capacity` frames.
    pub fn new(user: impl Into<Arc<str>>, capacity: usize) -> (Arc<Self>, Outbox) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let conn = Self {
            id: Uuid::new_v4(),
            user: user.into(),
            slot: Mutex::new(Slot {
                state: ConnState::Connecting,
                tx: Some(tx),
            }),
        };
        (Arc::new(conn), rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub(crate) fn user_key(&self) -> Arc<str> {
        Arc::clone(&self.user)
    }

    pub fn state(&self) -> ConnState {
        self.slot().state
    }

    pub fn is_active(&self) -> bool {
        self.state() == ConnState::Active
    }

    /// Push a frame without waiting. Only active connections accept frames.
    pub fn try_enqueue(&self, msg: Outbound) -> Enqueue {
        let slot = self.slot();
        if slot.state != ConnState::Active {
            return Enqueue::Closed;
        }
        let Some(tx) = slot.tx.as_ref() else {
            return Enqueue::Closed;
        };
        match tx.try_send(msg) {
            Ok(()) => Enqueue::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => Enqueue::Full,
            Err(mpsc::error::TrySendError::Closed(_)) => Enqueue::Closed,
        }
    }

    /// `Connecting -> Active`. Returns false if the connection was not fresh.
    pub(crate) fn activate(&self) -> bool {
        let mut slot = self.slot();
        if slot.state != ConnState::Connecting {
            return false;
        }
        slot.state = ConnState::Active;
        true
    }

    /// `Connecting | Active -> Closing`. Only the first caller gets `true`.
    pub(crate) fn begin_close(&self) -> bool {
        let mut slot = self.slot();
        match slot.state {
            ConnState::Connecting | ConnState::Active => {
                slot.state = ConnState::Closing;
                true
            }
            ConnState::Closing | ConnState::Closed => false,
        }
    }

    /// Drop the queue sender so the write pump drains and exits.
    /// Returns true only for the call that actually closed it.
    pub(crate) fn close_queue(&self) -> bool {
        self.slot().tx.take().is_some()
    }

    /// Terminal transition, taken once both pumps are gone.
    pub fn mark_closed(&self) {
        let mut slot = self.slot();
        slot.state = ConnState::Closed;
        slot.tx = None;
    }

    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user", &self.user)
            .field("state", &self.state())
            .finish()
    }
}
