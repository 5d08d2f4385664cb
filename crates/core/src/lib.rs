pub mod buffer;
pub mod error;
pub mod event;
pub mod state;

pub use buffer::{RingBuffer, Sample, SharedBuffer, DEFAULT_CAPACITY};
pub use error::{Result, ScopeError};
pub use event::Message;
pub use state::{AppState, BoundField, ConnectionStatus, SourceId, SourceState};
