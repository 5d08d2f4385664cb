use iced::widget::canvas::{self, Cache, Frame, Geometry, Path, Stroke, Text};
use iced::{mouse, Element, Length, Pixels, Point, Rectangle, Renderer, Size};
use scope_core::{Message, Sample};
use scope_render::{Extent, PlotFrame, RenderSink};
use scope_theme::Theme;

const MARGIN_LEFT: f32 = 64.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 40.0;
const MARGIN_BOTTOM: f32 = 28.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 4;

/// Live time-series chart, one line per source.
///
/// Receives frames through [`RenderSink`]; geometry is cached until the next
/// frame arrives.
pub struct PlotWidget {
    frame: PlotFrame,
    theme: Theme,
    title: String,
    cache: Cache,
}

impl PlotWidget {
    pub fn new(theme: Theme, title: impl Into<String>) -> Self {
        Self {
            frame: PlotFrame::default(),
            theme,
            title: title.into(),
            cache: Cache::new(),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.cache.clear();
    }

    pub fn frame(&self) -> &PlotFrame {
        &self.frame
    }

    pub fn view(&self) -> Element<'_, Message> {
        canvas::Canvas::new(self)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn draw_plot(&self, frame: &mut Frame) {
        let area = Rectangle {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: (frame.width() - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (frame.height() - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };
        let fg = self.theme.foreground.to_iced();
        let grid = Stroke::default()
            .with_color(self.theme.grid.to_iced())
            .with_width(1.0);

        frame.fill_text(Text {
            content: self.title.clone(),
            position: Point::new(area.x, 4.0),
            color: fg,
            size: Pixels(self.theme.font_size + 2.0),
            ..Text::default()
        });
        self.draw_legend(frame, area);

        frame.stroke(&Path::rectangle(area.position(), area.size()), grid);

        let Some(extent) = self.frame.extent() else {
            frame.fill_text(Text {
                content: "waiting for data…".to_string(),
                position: Point::new(area.x + 8.0, area.y + 8.0),
                color: fg,
                size: Pixels(self.theme.font_size),
                ..Text::default()
            });
            return;
        };

        for v in ticks(extent.v_min, extent.v_max, Y_TICKS) {
            let y = project(&extent, area, Sample::new(v, extent.t_min)).y;
            frame.stroke(
                &Path::line(Point::new(area.x, y), Point::new(area.x + area.width, y)),
                grid,
            );
            frame.fill_text(Text {
                content: format!("{v:.2}"),
                position: Point::new(4.0, y - 7.0),
                color: fg,
                size: Pixels(self.theme.font_size - 2.0),
                ..Text::default()
            });
        }

        for t in ticks(extent.t_min, extent.t_max, X_TICKS) {
            let x = project(&extent, area, Sample::new(extent.v_min, t)).x;
            let label = Sample::new(0.0, t)
                .local_time()
                .map(|dt| dt.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            frame.fill_text(Text {
                content: label,
                position: Point::new(x - 24.0, area.y + area.height + 6.0),
                color: fg,
                size: Pixels(self.theme.font_size - 2.0),
                ..Text::default()
            });
        }

        for series in &self.frame.series {
            if series.points.len() < 2 {
                continue;
            }
            let line = Path::new(|b| {
                let mut points = series.points.iter().map(|s| project(&extent, area, *s));
                if let Some(first) = points.next() {
                    b.move_to(first);
                    points.for_each(|p| b.line_to(p));
                }
            });
            frame.stroke(
                &line,
                Stroke::default()
                    .with_color(self.theme.series_color(series.source).to_iced())
                    .with_width(1.5),
            );
        }
    }

    fn draw_legend(&self, frame: &mut Frame, area: Rectangle) {
        let mut x = area.x + area.width;
        for series in self.frame.series.iter().rev() {
            x -= 12.0 + series.label.chars().count() as f32 * self.theme.font_size * 0.6 + 24.0;
            let y = 22.0;
            frame.stroke(
                &Path::line(Point::new(x, y), Point::new(x + 18.0, y)),
                Stroke::default()
                    .with_color(self.theme.series_color(series.source).to_iced())
                    .with_width(3.0),
            );
            frame.fill_text(Text {
                content: series.label.clone(),
                position: Point::new(x + 22.0, y - 8.0),
                color: self.theme.foreground.to_iced(),
                size: Pixels(self.theme.font_size - 1.0),
                ..Text::default()
            });
        }
    }
}

impl RenderSink for PlotWidget {
    fn render(&mut self, frame: PlotFrame) {
        self.frame = frame;
        self.cache.clear();
    }
}

impl canvas::Program<Message> for PlotWidget {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let geometry = self
            .cache
            .draw(renderer, Size::new(bounds.width, bounds.height), |frame| {
                self.draw_plot(frame)
            });
        vec![geometry]
    }
}

/// Map a sample into screen space inside `area` (y grows downwards).
fn project(extent: &Extent, area: Rectangle, s: Sample) -> Point {
    let fx = (s.timestamp - extent.t_min) / (extent.t_max - extent.t_min);
    let fy = (s.value - extent.v_min) / (extent.v_max - extent.v_min);
    Point::new(
        area.x + fx as f32 * area.width,
        area.y + area.height - fy as f32 * area.height,
    )
}

/// `n` evenly spaced values from `min` to `max` inclusive.
fn ticks(min: f64, max: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (n - 1) as f64;
            (0..n).map(|i| min + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_core::SourceId;
    use scope_render::SeriesFrame;

    const AREA: Rectangle = Rectangle { x: 10.0, y: 20.0, width: 100.0, height: 50.0 };
    const EXTENT: Extent = Extent { t_min: 0.0, t_max: 10.0, v_min: -1.0, v_max: 1.0 };

    #[test]
    fn projection_maps_corners() {
        assert_eq!(project(&EXTENT, AREA, Sample::new(-1.0, 0.0)), Point::new(10.0, 70.0));
        assert_eq!(project(&EXTENT, AREA, Sample::new(1.0, 10.0)), Point::new(110.0, 20.0));
        assert_eq!(project(&EXTENT, AREA, Sample::new(0.0, 5.0)), Point::new(60.0, 45.0));
    }

    #[test]
    fn ticks_span_range() {
        assert_eq!(ticks(0.0, 4.0, 5), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ticks(2.0, 9.0, 1), vec![2.0]);
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn render_replaces_frame() {
        let mut plot = PlotWidget::new(Theme::default(), "values");
        let frame = PlotFrame {
            series: vec![SeriesFrame {
                source: SourceId(0),
                label: "a".into(),
                points: vec![Sample::new(1.0, 1.0)],
            }],
        };
        plot.render(frame.clone());
        assert_eq!(plot.frame(), &frame);
    }
}
