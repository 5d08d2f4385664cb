//! Toolkit-independent redraw pipeline.
//!
//! A [`RedrawTimer`] (or the window's own tick) calls [`capture`] to turn every
//! source buffer into a [`PlotFrame`], then hands it to a [`RenderSink`].

pub mod frame;
pub mod sink;
pub mod timer;

pub use frame::{capture, Extent, Feed, PlotFrame, SeriesFrame};
pub use sink::{LogSink, RenderSink};
pub use timer::RedrawTimer;
