use crate::protocol::{parse_reading, Bounds};
use crate::session::StatusCell;
use futures::{SinkExt, StreamExt};
use scope_core::{ConnectionStatus, SharedBuffer, SourceId};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

/// Everything one ingestion task needs; consumed by [`Worker::run`].
pub(crate) struct Worker {
    pub id:       SourceId,
    pub uri:      String,
    pub buffer:   SharedBuffer,
    pub status:   StatusCell,
    pub control:  mpsc::Receiver<Bounds>,
    pub shutdown: watch::Receiver<bool>,
}

impl Worker {
    /// Connect, then pump frames into the buffer until the peer closes, an
    /// error occurs, or shutdown is signalled. Never reconnects; the status
    /// is always `Disconnected` when this returns.
    pub(crate) async fn run(self) {
        let Worker {
            id,
            uri,
            buffer,
            status,
            mut control,
            mut shutdown,
        } = self;

        *status.write() = ConnectionStatus::Connecting;

        let connected = tokio::select! {
            res = connect_async(uri.as_str()) => res,
            _ = shutdown.changed() => {
                debug!(source = %id, "shutdown before handshake completed");
                *status.write() = ConnectionStatus::Disconnected;
                return;
            }
        };

        let ws = match connected {
            Ok((ws, _response)) => ws,
            Err(e) => {
                error!(source = %id, %uri, "Cannot connect: {e}");
                *status.write() = ConnectionStatus::Disconnected;
                return;
            }
        };

        info!(source = %id, %uri, "Connected");
        *status.write() = ConnectionStatus::Connected;

        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if let Err(e) = sink.send(WsMessage::Close(None)).await {
                        debug!(source = %id, "close frame not sent: {e}");
                    }
                    info!(source = %id, "Connection closed by user");
                    break;
                }
                Some(bounds) = control.recv() => {
                    let json = match bounds.to_json() {
                        Ok(json) => json,
                        Err(e) => {
                            warn!(source = %id, "{e}");
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(WsMessage::Text(json.into())).await {
                        warn!(source = %id, "Send failed: {e}");
                        break;
                    }
                    info!(
                        source = %id,
                        value_min = bounds.value_min,
                        value_max = bounds.value_max,
                        "Bounds sent"
                    );
                }
                frame = stream.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => ingest(id, &buffer, text.as_str()),
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        warn!(source = %id, len = bytes.len(), "Ignoring binary frame");
                    }
                    Some(Ok(WsMessage::Close(frame))) => {
                        warn!(source = %id, ?frame, "Connection closed by server");
                        break;
                    }
                    Some(Ok(_)) => {} // ping / pong
                    Some(Err(e)) => {
                        warn!(source = %id, "Connection error: {e}");
                        break;
                    }
                    None => {
                        warn!(source = %id, "Connection dropped");
                        break;
                    }
                },
            }
        }

        *status.write() = ConnectionStatus::Disconnected;
    }
}

/// Decode one text frame and store it; malformed frames are logged and dropped.
fn ingest(id: SourceId, buffer: &SharedBuffer, text: &str) {
    match parse_reading(text) {
        Ok(sample) => buffer.push(sample),
        Err(e) => warn!(source = %id, "Dropping message {text:?}: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_stores_valid_and_drops_invalid() {
        let buffer = SharedBuffer::new(4);
        ingest(SourceId(0), &buffer, r#"{"timestamp":"2024-03-01T12:00:00Z","value":0}"#);
        ingest(SourceId(0), &buffer, "{broken");
        ingest(SourceId(0), &buffer, r#"{"timestamp":"2024-03-01T12:00:01Z"}"#);

        let all = buffer.snapshot_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, 0.0);
    }
}
