use crate::domain::{KeyEvent, Surface};
use crate::use_cases::{FrameOutcome, InboundFrame, Session};

use futures::{Sink, SinkExt, Stream, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

pub type ClientSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: WsError,
    },
    #[error("failed to send frame: {0}")]
    Send(#[source] WsError),
    #[error("failed to receive frame: {0}")]
    Receive(#[source] WsError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionStats {
    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub snapshots_rendered: u64,
    pub unrecognized: u64,
}

enum LoopControl {
    Continue,
    Disconnect,
}

pub async fn connect(url: &str) -> Result<ClientSocket, NetError> {
    let (socket, response) = connect_async(url)
        .await
        .map_err(|source| NetError::Connect {
            url: url.to_string(),
            source,
        })?;

    let headers: Vec<&str> = response.headers().keys().map(|name| name.as_str()).collect();
    debug!(status = %response.status(), ?headers, "handshake response");
    info!(%url, "connected");
    Ok(socket)
}

/// Drives `session` over an open socket until the transport closes.
///
/// Sends the greeting, then multiplexes inbound frames, the input tick and key
/// events on one task. The tick interval lives inside this future, so nothing
/// can be sent once it returns.
pub async fn run_connection<S, Tx, Rx>(
    sink: &mut Tx,
    stream: &mut Rx,
    session: &mut Session<S>,
    keys: &mut mpsc::Receiver<KeyEvent>,
    send_interval: Duration,
) -> Result<ConnectionStats, NetError>
where
    S: Surface,
    Tx: Sink<Message, Error = WsError> + Unpin,
    Rx: Stream<Item = Result<Message, WsError>> + Unpin,
{
    let mut stats = ConnectionStats::default();

    if let Some(greeting) = session.open() {
        let len = greeting.len();
        if let Err(e) = sink.send(Message::text(greeting)).await {
            session.close();
            return Err(NetError::Send(e));
        }
        stats.msgs_out += 1;
        stats.bytes_out += len as u64;
    }

    let mut ticker = tokio::time::interval(send_interval);
    // Missed ticks are delayed, never bunched into a burst of sends.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut keys_open = true;

    let outcome = loop {
        tokio::select! {
            incoming = stream.next() => {
                match handle_incoming(session, incoming, &mut stats) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Disconnect) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }

            _ = ticker.tick() => {
                let Some(bytes) = session.tick() else {
                    continue;
                };
                let len = bytes.len();
                if let Err(e) = sink.send(Message::binary(bytes)).await {
                    warn!(error = %e, "failed to send action");
                    break Err(NetError::Send(e));
                }
                stats.msgs_out += 1;
                stats.bytes_out += len as u64;
            }

            key = keys.recv(), if keys_open => {
                match key {
                    Some(event) => {
                        session.apply_key(&event);
                    }
                    None => {
                        // Input source went away; keep rendering with whatever is held.
                        debug!("key source closed");
                        keys_open = false;
                    }
                }
            }
        }
    };

    session.close();
    if let Err(e) = sink.close().await {
        debug!(error = %e, "socket close error");
    }

    debug!(
        msgs_in = stats.msgs_in,
        msgs_out = stats.msgs_out,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        snapshots_rendered = stats.snapshots_rendered,
        unrecognized = stats.unrecognized,
        "connection stats"
    );

    outcome.map(|()| stats)
}

fn handle_incoming<S: Surface>(
    session: &mut Session<S>,
    incoming: Option<Result<Message, WsError>>,
    stats: &mut ConnectionStats,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Binary(bytes) => {
                stats.msgs_in += 1;
                stats.bytes_in += bytes.len() as u64;
                match session.handle_frame(InboundFrame::Binary(&bytes)) {
                    FrameOutcome::Rendered(_) => stats.snapshots_rendered += 1,
                    FrameOutcome::Unrecognized => stats.unrecognized += 1,
                    FrameOutcome::ParamsAcknowledged(_) | FrameOutcome::Ignored => {}
                }
                Ok(LoopControl::Continue)
            }
            Message::Text(text) => {
                stats.msgs_in += 1;
                stats.bytes_in += text.len() as u64;
                session.handle_frame(InboundFrame::Text(text.as_str()));
                Ok(LoopControl::Continue)
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(LoopControl::Continue),
            Message::Close(frame) => {
                info!(?frame, "server closed connection");
                Ok(LoopControl::Disconnect)
            }
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Err(NetError::Receive(e))
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}
