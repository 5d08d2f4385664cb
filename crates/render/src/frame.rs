use scope_config::ScopeConfig;
use scope_core::{Sample, SharedBuffer, SourceId};

/// A source's buffer together with how it is labelled on screen.
#[derive(Debug, Clone)]
pub struct Feed {
    pub source: SourceId,
    pub label:  String,
    pub buffer: SharedBuffer,
}

impl Feed {
    /// One empty feed per configured source, sized by `global.buffer_capacity`.
    pub fn from_config(config: &ScopeConfig) -> Vec<Self> {
        config
            .sources
            .iter()
            .enumerate()
            .map(|(i, s)| Self {
                source: SourceId(i),
                label:  s.label.clone(),
                buffer: SharedBuffer::new(config.global.buffer_capacity),
            })
            .collect()
    }
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    pub source: SourceId,
    pub label:  String,
    /// Chronological, populated samples only.
    pub points: Vec<Sample>,
}

/// Everything a sink needs to draw one redraw tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotFrame {
    pub series: Vec<SeriesFrame>,
}

/// Axis ranges covering every point of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub t_min: f64,
    pub t_max: f64,
    pub v_min: f64,
    pub v_max: f64,
}

impl PlotFrame {
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Bounding box of all points, `None` for an empty frame. Degenerate
    /// ranges are widened so they can be used as divisors.
    pub fn extent(&self) -> Option<Extent> {
        let mut points = self.series.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let mut e = Extent {
            t_min: first.timestamp,
            t_max: first.timestamp,
            v_min: first.value,
            v_max: first.value,
        };
        for p in points {
            e.t_min = e.t_min.min(p.timestamp);
            e.t_max = e.t_max.max(p.timestamp);
            e.v_min = e.v_min.min(p.value);
            e.v_max = e.v_max.max(p.value);
        }
        if e.t_max - e.t_min < f64::EPSILON {
            e.t_min -= 0.5;
            e.t_max += 0.5;
        }
        if e.v_max - e.v_min < f64::EPSILON {
            e.v_min -= 0.5;
            e.v_max += 0.5;
        }
        Some(e)
    }
}

/// Pull a full snapshot of every feed.
pub fn capture(feeds: &[Feed]) -> PlotFrame {
    PlotFrame {
        series: feeds
            .iter()
            .map(|f| SeriesFrame {
                source: f.source,
                label:  f.label.clone(),
                points: f.buffer.snapshot_all(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feeds_follow_config() {
        let mut cfg = ScopeConfig::default();
        cfg.global.buffer_capacity = 7;
        let feeds = Feed::from_config(&cfg);
        assert_eq!(feeds.len(), 2);
        assert_eq!(feeds[1].source, SourceId(1));
        assert_eq!(feeds[0].label, "Server 1");
        assert_eq!(feeds[0].buffer.capacity(), 7);
    }

    #[test]
    fn capture_reads_each_buffer_in_order() {
        let feeds = Feed::from_config(&ScopeConfig::default());
        feeds[0].buffer.insert(1.0, 100.0);
        feeds[0].buffer.insert(2.0, 101.0);
        feeds[1].buffer.insert(-4.0, 100.5);

        let frame = capture(&feeds);
        assert_eq!(frame.series.len(), 2);
        assert_eq!(frame.series[0].points.len(), 2);
        assert_eq!(frame.series[1].points[0].value, -4.0);

        let e = frame.extent().unwrap();
        assert_eq!((e.t_min, e.t_max), (100.0, 101.0));
        assert_eq!((e.v_min, e.v_max), (-4.0, 2.0));
    }

    #[test]
    fn empty_and_degenerate_extents() {
        let feeds = Feed::from_config(&ScopeConfig::default());
        let frame = capture(&feeds);
        assert!(frame.is_empty());
        assert!(frame.extent().is_none());

        feeds[0].buffer.insert(3.0, 10.0);
        let e = capture(&feeds).extent().unwrap();
        assert_eq!((e.t_min, e.t_max), (9.5, 10.5));
        assert_eq!((e.v_min, e.v_max), (2.5, 3.5));
    }
}
