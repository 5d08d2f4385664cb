use crate::client::Worker;
use crate::protocol::Bounds;
use parking_lot::RwLock;
use scope_core::{ConnectionStatus, Result, ScopeError, SharedBuffer, SourceId};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Status shared between a worker and the [`SessionManager`].
pub type StatusCell = Arc<RwLock<ConnectionStatus>>;

/// Queued control messages per connection.
const CONTROL_QUEUE: usize = 8;

/// Handles to a running ingestion task.
#[derive(Debug)]
struct WorkerHandle {
    task:     JoinHandle<()>,
    shutdown: watch::Sender<bool>,
    control:  mpsc::Sender<Bounds>,
}

/// Connection-state record for one source.
///
/// Each started worker gets a fresh status cell, so a worker that is still
/// winding down after `stop` can never overwrite the state of its successor.
#[derive(Debug, Default)]
struct SourceSession {
    status: StatusCell,
    worker: Option<WorkerHandle>,
}

impl SourceSession {
    fn status(&self) -> ConnectionStatus {
        *self.status.read()
    }
}

/// Owns one connection record per source and the runtime workers run on.
#[derive(Debug)]
pub struct SessionManager {
    runtime:  Handle,
    sessions: Vec<SourceSession>,
}

impl SessionManager {
    /// Create a manager for `sources` disconnected sources.
    pub fn new(runtime: Handle, sources: usize) -> Self {
        Self {
            runtime,
            sessions: (0..sources).map(|_| SourceSession::default()).collect(),
        }
    }

    pub fn status(&self, id: SourceId) -> ConnectionStatus {
        self.sessions
            .get(id.index())
            .map(SourceSession::status)
            .unwrap_or_default()
    }

    pub fn statuses(&self) -> Vec<ConnectionStatus> {
        self.sessions.iter().map(SourceSession::status).collect()
    }

    pub fn any_active(&self) -> bool {
        self.sessions.iter().any(|s| s.status().is_active())
    }

    /// Spawn an ingestion worker for `id` writing into `buffer`.
    ///
    /// A source that already has an active worker is left untouched.
    pub fn start(&mut self, id: SourceId, uri: &str, buffer: SharedBuffer) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id.index())
            .ok_or_else(|| ScopeError::Connection(format!("unknown {id}")))?;

        if session.status().is_active() {
            debug!(source = %id, "Already running");
            return Ok(());
        }

        let status: StatusCell = Arc::new(RwLock::new(ConnectionStatus::Connecting));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (control_tx, control_rx) = mpsc::channel(CONTROL_QUEUE);

        let worker = Worker {
            id,
            uri: uri.trim().to_string(),
            buffer,
            status: Arc::clone(&status),
            control: control_rx,
            shutdown: shutdown_rx,
        };

        info!(source = %id, uri = %worker.uri, "Starting");
        let task = self.runtime.spawn(worker.run());

        session.status = status;
        session.worker = Some(WorkerHandle {
            task,
            shutdown: shutdown_tx,
            control: control_tx,
        });
        Ok(())
    }

    /// Ask `id`'s worker to close its connection. In-flight frames may be lost.
    pub fn stop(&mut self, id: SourceId) {
        let Some(session) = self.sessions.get_mut(id.index()) else {
            return;
        };
        if let Some(worker) = session.worker.take() {
            let _ = worker.shutdown.send(true);
            if worker.task.is_finished() {
                debug!(source = %id, "Worker had already exited");
            }
            info!(source = %id, "Stopping");
        }
        session.status = StatusCell::default();
    }

    pub fn stop_all(&mut self) {
        for i in 0..self.sessions.len() {
            self.stop(SourceId(i));
        }
    }

    /// Start/Stop button semantics: stop everything if any source is active,
    /// otherwise start every target. Returns `true` if sources were started.
    pub fn toggle<I>(&mut self, targets: I) -> Result<bool>
    where
        I: IntoIterator<Item = (SourceId, String, SharedBuffer)>,
    {
        if self.any_active() {
            self.stop_all();
            return Ok(false);
        }
        for (id, uri, buffer) in targets {
            self.start(id, &uri, buffer)?;
        }
        Ok(true)
    }

    /// Queue `bounds` for a connected source.
    pub fn send_bounds(&self, id: SourceId, bounds: Bounds) -> Result<()> {
        let session = self
            .sessions
            .get(id.index())
            .ok_or(ScopeError::NotConnected(id))?;

        match (&session.worker, session.status()) {
            (Some(worker), ConnectionStatus::Connected) => worker
                .control
                .try_send(bounds)
                .map_err(|e| ScopeError::Connection(format!("{id}: {e}"))),
            _ => Err(ScopeError::NotConnected(id)),
        }
    }

    /// Send each source its own bounds (indexed by source).
    ///
    /// Sources that are not connected are skipped. A failure on one source
    /// does not stop delivery to the others.
    pub fn send_bounds_all(&self, bounds: &[Bounds]) -> BoundsDelivery {
        let mut delivery = BoundsDelivery::default();
        for (i, b) in bounds.iter().enumerate() {
            let id = SourceId(i);
            match self.send_bounds(id, *b) {
                Ok(()) => delivery.sent.push(id),
                Err(ScopeError::NotConnected(_)) => debug!(source = %id, "Not connected; skipped"),
                Err(e) => delivery.failed.push((id, e)),
            }
        }
        delivery
    }
}

/// Per-source result of [`SessionManager::send_bounds_all`].
#[derive(Debug, Default)]
pub struct BoundsDelivery {
    pub sent:   Vec<SourceId>,
    pub failed: Vec<(SourceId, ScopeError)>,
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}
