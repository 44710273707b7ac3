//! Per-connection read and write pumps.
//!
//! Both pumps are generic over the transport halves so the same code drives
//! an axum `WebSocket` in production and in-memory channels in tests.
//! Either pump failing tears the whole connection down: the connection is
//! marked closing, removed from the hub, its queue closed, and the transport
//! halves dropped (which closes the socket exactly once).

use std::fmt::Display;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};

use ripple_core::error::{Result, RippleError};
use ripple_core::protocol::{Envelope, PreparedFrame};

use crate::realtime::{Connection, Enqueue, Hub, Outbound, Outbox};
use crate::transport::codec::{decode, Inbound};

/// Timing knobs for the pumps.
#[derive(Debug, Clone, Copy)]
pub struct PumpConfig {
    /// Keep-alive period of the write pump.
    pub ping_interval: Duration,
    /// How long the read pump waits for any frame before declaring the peer dead.
    pub read_deadline: Duration,
    /// Deadline for each individual write.
    pub write_timeout: Duration,
}

/// Why a pump returned.
#[derive(Debug)]
pub enum PumpExit {
    /// Queue closed by the hub, or the peer closed cleanly.
    Closed,
    Failed(RippleError),
}

impl PumpExit {
    pub fn is_failure(&self) -> bool {
        matches!(self, PumpExit::Failed(_))
    }
}

/// Run both pumps for `conn` until the connection is gone.
///
/// `conn` must already be registered. Returns once both pumps stopped and the
/// transport halves are dropped; the connection is then `Closed`.
pub async fn run<Si, St, E>(
    hub: Arc<Hub>,
    conn: Arc<Connection>,
    outbox: Outbox,
    sink: Si,
    stream: St,
    cfg: PumpConfig,
) where
    Si: Sink<Message> + Unpin,
    Si::Error: Display,
    St: Stream<Item = std::result::Result<Message, E>> + Unpin,
    E: Display,
{
    let write = write_pump(&hub, &conn, outbox, sink, &cfg);
    let read = read_pump(&hub, &conn, stream, &cfg);
    tokio::pin!(write);
    tokio::pin!(read);

    tokio::select! {
        exit = &mut read => {
            tracing::debug!(?exit, "read pump stopped");
            // queue is closed now; let the writer flush and send its close frame
            match timeout(cfg.write_timeout, &mut write).await {
                Ok(exit) => tracing::debug!(?exit, "write pump stopped"),
                Err(_) => tracing::debug!("write pump abandoned after close"),
            }
        }
        exit = &mut write => {
            tracing::debug!(?exit, "write pump stopped");
        }
    }

    hub.deregister(&conn);
    conn.mark_closed();
}

/// Drain the outbound queue onto the transport, interleaving keep-alive pings.
pub async fn write_pump<Si>(hub: &Hub, conn: &Connection, mut outbox: Outbox, mut sink: Si, cfg: &PumpConfig) -> PumpExit
where
    Si: Sink<Message> + Unpin,
    Si::Error: Display,
{
    let mut ping_tick = interval_at(Instant::now() + cfg.ping_interval, cfg.ping_interval);
    ping_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit = loop {
        tokio::select! {
            maybe_out = outbox.recv() => {
                match maybe_out {
                    Some(out) => {
                        if let Err(e) = send_with_deadline(hub, &mut sink, out.into_message(), cfg.write_timeout).await {
                            break PumpExit::Failed(e);
                        }
                    }
                    None => {
                        // hub closed the queue
                        let _ = send_with_deadline(hub, &mut sink, Message::Close(None), cfg.write_timeout).await;
                        break PumpExit::Closed;
                    }
                }
            }

            _ = ping_tick.tick() => {
                if let Err(e) = send_with_deadline(hub, &mut sink, Message::Ping(Vec::new()), cfg.write_timeout).await {
                    break PumpExit::Failed(e);
                }
            }
        }
    };

    if let PumpExit::Failed(e) = &exit {
        record_failure(hub, "write", e);
        tracing::debug!(conn = %conn.id(), error = %e, "write failed");
        hub.deregister(conn);
    }
    exit
}

/// Read frames until the peer goes away or stops talking for `read_deadline`.
pub async fn read_pump<St, E>(hub: &Hub, conn: &Connection, mut stream: St, cfg: &PumpConfig) -> PumpExit
where
    St: Stream<Item = std::result::Result<Message, E>> + Unpin,
    E: Display,
{
    let exit = loop {
        // every frame, keep-alive answers included, restarts the deadline
        let msg = match timeout(cfg.read_deadline, stream.next()).await {
            Err(_) => break PumpExit::Failed(RippleError::Timeout),
            Ok(None) => break PumpExit::Closed,
            Ok(Some(Err(e))) => break PumpExit::Failed(RippleError::Transport(e.to_string())),
            Ok(Some(Ok(m))) => m,
        };

        match decode(msg) {
            Ok(Inbound::KeepAlive) => {
                if let Some(pong) = pong_frame() {
                    reply(conn, Outbound::Frame(pong.clone()));
                }
            }
            Ok(Inbound::Text { env, bytes_len }) => {
                tracing::debug!(msg_type = %env.msg_type, bytes_len, "ignoring inbound application message");
            }
            Ok(Inbound::Binary { bytes_len }) => {
                tracing::debug!(bytes_len, "ignoring inbound binary frame");
            }
            Ok(Inbound::Ping(payload)) => reply(conn, Outbound::Pong(payload)),
            Ok(Inbound::Pong) => {}
            Ok(Inbound::Close) => break PumpExit::Closed,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed inbound frame");
            }
        }
    };

    if let PumpExit::Failed(e) = &exit {
        record_failure(hub, "read", e);
        tracing::debug!(conn = %conn.id(), error = %e, "read failed");
    }
    hub.deregister(conn);
    exit
}

async fn send_with_deadline<Si>(hub: &Hub, sink: &mut Si, msg: Message, deadline: Duration) -> Result<()>
where
    Si: Sink<Message> + Unpin,
    Si::Error: Display,
{
    let started = Instant::now();
    match timeout(deadline, sink.send(msg)).await {
        Ok(Ok(())) => {
            hub.metrics().write_duration.observe(started.elapsed());
            Ok(())
        }
        Ok(Err(e)) => Err(RippleError::Transport(e.to_string())),
        Err(_) => Err(RippleError::Timeout),
    }
}

fn reply(conn: &Connection, msg: Outbound) {
    if conn.try_enqueue(msg) == Enqueue::Full {
        tracing::debug!(conn = %conn.id(), "outbound queue full, keep-alive reply dropped");
    }
}

fn pong_frame() -> Option<&'static PreparedFrame> {
    static PONG: OnceLock<Option<PreparedFrame>> = OnceLock::new();
    PONG.get_or_init(|| PreparedFrame::prepare(&Envelope::pong()).ok())
        .as_ref()
}

fn record_failure(hub: &Hub, pump: &str, e: &RippleError) {
    let reason = match e {
        RippleError::Timeout => "deadline",
        _ => "error",
    };
    hub.metrics()
        .transport_failures
        .inc(&[("pump", pump), ("reason", reason)]);
}
