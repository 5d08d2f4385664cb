//! WebSocket ingestion for livescope.
//!
//! - [`protocol`]: inbound reading decode, outbound bounds encode
//! - [`session`]: per-source connection records and their workers

mod client;
pub mod protocol;
pub mod session;

pub use protocol::{parse_all, parse_reading, parse_timestamp, Bounds};
pub use session::{BoundsDelivery, SessionManager, StatusCell};
