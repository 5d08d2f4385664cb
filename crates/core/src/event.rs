use crate::state::{BoundField, SourceId};

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - User input            → `UriEdited`, `BoundEdited`, `*Requested`
/// - Redraw timer          → `Redraw`
/// - Config watcher task   → `ConfigReloaded`
#[derive(Debug, Clone)]
pub enum Message {
    // ── User input ────────────────────────────────────────────────────────────
    /// URI field of a source was edited.
    UriEdited(SourceId, String),
    /// Min or max field of a source was edited.
    BoundEdited(SourceId, BoundField, String),

    // ── User actions ──────────────────────────────────────────────────────────
    /// Start all sources, or stop all if any is active.
    ToggleRequested,
    /// Validate every bounds form and send to each connected source.
    SendBoundsRequested,
    /// Open the "last N points" view.
    HistoryRequested,
    /// Close the "last N points" view.
    HistoryClosed,
    /// Refresh the latest-point readout.
    LatestRequested,
    /// Dismiss the current error notice.
    NoticeDismissed,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Fixed-period redraw tick.
    Redraw,
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,
}
