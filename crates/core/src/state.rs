use crate::buffer::Sample;
use std::fmt;

/// Index of an upstream data source, in config order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub usize);

impl SourceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "source {}", self.0 + 1)
    }
}

/// Lifecycle of one source's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    /// `true` while a worker owns the connection.
    #[must_use]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Disconnected)
    }
}

/// Which bound a form edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundField {
    Min,
    Max,
}

/// Editable per-source UI state.
#[derive(Debug, Clone, Default)]
pub struct SourceState {
    pub label: String,
    /// URI typed by the user; read when the connection is (re)started.
    pub uri: String,
    pub min_input: String,
    pub max_input: String,
    pub status: ConnectionStatus,
    /// Filled by the "show latest" action.
    pub latest: Option<Sample>,
}

impl SourceState {
    pub fn new(label: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            uri: uri.into(),
            ..Default::default()
        }
    }
}

/// Central application state; all widgets read from this snapshot.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub sources: Vec<SourceState>,
    /// Per-source windows shown by the "last N points" view; `None` = hidden.
    pub history: Option<Vec<(SourceId, Vec<Sample>)>>,
    /// User-facing error notice (e.g. rejected bounds input).
    pub notice: Option<String>,
}

impl AppState {
    pub fn source(&self, id: SourceId) -> Option<&SourceState> {
        self.sources.get(id.index())
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut SourceState> {
        self.sources.get_mut(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = SourceId> + '_ {
        (0..self.sources.len()).map(SourceId)
    }

    /// `true` if any source has a live or pending connection.
    pub fn any_active(&self) -> bool {
        self.sources.iter().any(|s| s.status.is_active())
    }

    pub fn any_connected(&self) -> bool {
        self.sources
            .iter()
            .any(|s| s.status == ConnectionStatus::Connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_id_display_is_one_based() {
        assert_eq!(SourceId(0).to_string(), "source 1");
    }

    #[test]
    fn activity_flags() {
        let mut state = AppState {
            sources: vec![SourceState::new("a", "ws://a"), SourceState::new("b", "ws://b")],
            ..Default::default()
        };
        assert!(!state.any_active());

        state.sources[1].status = ConnectionStatus::Connecting;
        assert!(state.any_active());
        assert!(!state.any_connected());

        state.sources[1].status = ConnectionStatus::Connected;
        assert!(state.any_connected());
    }
}
