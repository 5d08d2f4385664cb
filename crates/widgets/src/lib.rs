pub mod bounds;
pub mod connection;
pub mod plot;
pub mod readout;

pub use bounds::BoundsForm;
pub use connection::ConnectionPanel;
pub use plot::PlotWidget;
pub use readout::{format_point, HistoryList, LatestReadout};
