use crate::frame::PlotFrame;
use tracing::debug;

/// Anything that can present a [`PlotFrame`].
///
/// Implemented by the window's plot canvas and by [`LogSink`]; the redraw
/// timer only knows about this trait.
pub trait RenderSink {
    fn render(&mut self, frame: PlotFrame);
}

/// Headless sink: logs each series' newest point at `debug` level.
#[derive(Debug, Default)]
pub struct LogSink {
    frames: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for LogSink {
    fn render(&mut self, frame: PlotFrame) {
        self.frames += 1;
        for series in &frame.series {
            match series.points.last() {
                Some(p) => debug!(
                    series = %series.label,
                    points = series.points.len(),
                    time = %p.format_time(),
                    value = p.value,
                    "frame {}",
                    self.frames
                ),
                None => debug!(series = %series.label, "frame {}: no data", self.frames),
            }
        }
    }
}
