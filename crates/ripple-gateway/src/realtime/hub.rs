use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use ripple_core::protocol::{Envelope, PreparedFrame};

use crate::obs::HubMetrics;
use crate::realtime::connection::{Connection, Enqueue, Outbound};

/// Per-call delivery tally. Producers are free to ignore it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
}

impl std::ops::AddAssign for DeliveryReport {
    fn add_assign(&mut self, other: Self) {
        self.delivered += other.delivered;
        self.dropped += other.dropped;
    }
}

impl DeliveryReport {
    fn record(&mut self, outcome: Enqueue) {
        match outcome {
            Enqueue::Queued => self.delivered += 1,
            Enqueue::Full | Enqueue::Closed => self.dropped += 1,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    pub connections: usize,
    pub users: usize,
}

/// Primary set plus the user index. Both only change together, under the write lock.
#[derive(Default)]
struct Registry {
    conns: HashMap<Uuid, Arc<Connection>>,
    by_user: HashMap<Arc<str>, Vec<Arc<Connection>>>,
}

/// Registry of every live connection and the only place that mutates it.
///
/// Register/deregister take the write lock; deliveries take the read lock and
/// never wait on a consumer (enqueue is `try_send`).
#[derive(Default)]
pub struct Hub {
    registry: RwLock<Registry>,
    metrics: Arc<HubMetrics>,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &HubMetrics {
        &self.metrics
    }

    /// Make `conn` a delivery target. A connection that is not fresh is ignored.
    pub fn register(&self, conn: Arc<Connection>) {
        let mut reg = self.write();
        if !conn.activate() {
            tracing::warn!(conn = %conn.id(), user = conn.user(), state = ?conn.state(), "register ignored: connection not fresh");
            return;
        }
        reg.by_user
            .entry(conn.user_key())
            .or_default()
            .push(Arc::clone(&conn));
        reg.conns.insert(conn.id(), Arc::clone(&conn));
        drop(reg);

        self.metrics.connections_active.inc();
        self.metrics.connections_total.inc(&[("event", "register")]);
        tracing::debug!(conn = %conn.id(), user = conn.user(), "connection registered");
    }

    /// Retire `conn`: mark it closing, drop it from both indices, then close its queue.
    ///
    /// Idempotent. Returns true only for the call that actually removed it.
    pub fn deregister(&self, conn: &Connection) -> bool {
        let mut reg = self.write();
        if reg.conns.remove(&conn.id()).is_none() {
            return false;
        }
        conn.begin_close();
        Self::unindex(&mut reg, conn);
        conn.close_queue();
        drop(reg);

        self.metrics.connections_active.dec();
        self.metrics.connections_total.inc(&[("event", "deregister")]);
        tracing::debug!(conn = %conn.id(), user = conn.user(), "connection deregistered");
        true
    }

    /// Deregister every connection of `user`. Their write pumps send a close frame and exit.
    pub fn close_user(&self, user: &str) -> usize {
        let mut reg = self.write();
        let Some(conns) = reg.by_user.remove(user) else {
            return 0;
        };
        for c in &conns {
            reg.conns.remove(&c.id());
            c.begin_close();
            c.close_queue();
        }
        drop(reg);

        let n = conns.len();
        self.metrics.connections_active.sub(n as i64);
        self.metrics.connections_total.add(&[("event", "deregister")], n as u64);
        tracing::info!(user, closed = n, "user connections closed");
        n
    }

    /// Unicast to every connection of `user`. No connection is a silent no-op.
    pub fn deliver_to_user(&self, user: &str, env: &Envelope) -> DeliveryReport {
        let Some(frame) = self.prepare(env) else {
            return DeliveryReport::default();
        };
        let reg = self.read();
        let mut report = DeliveryReport::default();
        if let Some(conns) = reg.by_user.get(user) {
            for c in conns {
                report.record(self.push(c, &frame, "user"));
            }
        }
        report
    }

    /// Unicast to each listed user, serializing once.
    pub fn deliver_to_users<S: AsRef<str>>(&self, users: &[S], env: &Envelope) -> DeliveryReport {
        let Some(frame) = self.prepare(env) else {
            return DeliveryReport::default();
        };
        let reg = self.read();
        let mut report = DeliveryReport::default();
        for u in users {
            if let Some(conns) = reg.by_user.get(u.as_ref()) {
                for c in conns {
                    report.record(self.push(c, &frame, "user"));
                }
            }
        }
        report
    }

    /// Broadcast to every live connection.
    ///
    /// A full queue drops the frame for that connection only; it stays
    /// registered until its own pumps notice it is dead.
    pub fn deliver_to_all(&self, env: &Envelope) -> DeliveryReport {
        let Some(frame) = self.prepare(env) else {
            return DeliveryReport::default();
        };
        let reg = self.read();
        let mut report = DeliveryReport::default();
        for c in reg.conns.values() {
            report.record(self.push(c, &frame, "all"));
        }
        report
    }

    /// Whether `user` has at least one active connection.
    pub fn has_live_connection(&self, user: &str) -> bool {
        self.read()
            .by_user
            .get(user)
            .is_some_and(|conns| conns.iter().any(|c| c.is_active()))
    }

    pub fn connection_count(&self, user: &str) -> usize {
        self.read()
            .by_user
            .get(user)
            .map(|conns| conns.iter().filter(|c| c.is_active()).count())
            .unwrap_or(0)
    }

    /// Ids of `user`'s connections in registration order.
    pub fn connections_of(&self, user: &str) -> Vec<Uuid> {
        self.read()
            .by_user
            .get(user)
            .map(|conns| conns.iter().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> HubStats {
        let reg = self.read();
        HubStats {
            connections: reg.conns.len(),
            users: reg.by_user.len(),
        }
    }

    fn unindex(reg: &mut Registry, conn: &Connection) {
        let Some(list) = reg.by_user.get_mut(conn.user()) else {
            return;
        };
        if let Some(pos) = list.iter().position(|c| c.id() == conn.id()) {
            list.remove(pos);
        }
        if list.is_empty() {
            reg.by_user.remove(conn.user());
        }
    }

    fn prepare(&self, env: &Envelope) -> Option<PreparedFrame> {
        match PreparedFrame::prepare(env) {
            Ok(f) => Some(f),
            Err(e) => {
                self.metrics.encode_failures.inc(&[("type", env.msg_type.as_str())]);
                tracing::warn!(msg_type = %env.msg_type, error = %e, "event dropped: encode failed");
                None
            }
        }
    }

    fn push(&self, conn: &Connection, frame: &PreparedFrame, path: &str) -> Enqueue {
        let outcome = conn.try_enqueue(Outbound::Frame(frame.clone()));
        let label = match outcome {
            Enqueue::Queued => "queued",
            Enqueue::Full => {
                tracing::debug!(conn = %conn.id(), user = conn.user(), "outbound queue full, frame dropped");
                "full"
            }
            Enqueue::Closed => "closed",
        };
        self.metrics.deliveries.inc(&[("path", path), ("outcome", label)]);
        outcome
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn assert_consistent(&self) {
        let reg = self.read();
        let indexed: usize = reg.by_user.values().map(Vec::len).sum();
        assert_eq!(indexed, reg.conns.len());
        for (user, conns) in &reg.by_user {
            assert!(!conns.is_empty(), "empty index entry for {user}");
            for c in conns {
                assert!(reg.conns.contains_key(&c.id()));
                assert_eq!(c.user(), &**user);
            }
        }
    }
}
