use crate::connection::action;
use iced::widget::{scrollable, text, Column};
use iced::{Element, Length};
use scope_core::{event::Message, AppState, Sample};
use scope_theme::Theme;

/// `YYYY-MM-DD HH:MM:SS - value`
pub fn format_point(sample: &Sample) -> String {
    format!("{} - {}", sample.format_time(), sample.value)
}

/// One line per source that has a "latest" sample.
#[derive(Debug, Default)]
pub struct LatestReadout;

impl LatestReadout {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a AppState, theme: &'a Theme) -> Element<'a, Message> {
        let lines = state.sources.iter().filter_map(|s| {
            let latest = s.latest.as_ref()?;
            Some(
                text(format!("Latest from {}: {}", s.label, format_point(latest)))
                    .size(theme.font_size)
                    .into(),
            )
        });
        Column::with_children(lines).spacing(2.0).into()
    }
}

/// Scrollable list of the last N points for every source.
#[derive(Debug, Default)]
pub struct HistoryList;

impl HistoryList {
    pub fn new() -> Self {
        Self
    }

    /// `None` while the list is closed.
    pub fn view<'a>(&'a self, state: &'a AppState, theme: &'a Theme) -> Option<Element<'a, Message>> {
        let history = state.history.as_ref()?;
        let size = theme.font_size;

        let mut list = Column::new().spacing(2.0);
        for (id, samples) in history {
            let label = state
                .source(*id)
                .map(|s| s.label.clone())
                .unwrap_or_else(|| id.to_string());
            list = list.push(text(format!("{label}:")).size(size + 1.0));
            for sample in samples {
                list = list.push(text(format_point(sample)).size(size));
            }
        }

        Some(
            Column::with_children([
                scrollable(list).height(Length::Fill).width(Length::Fill).into(),
                action("Close", Message::HistoryClosed, size),
            ])
            .spacing(theme.gap as f32)
            .padding(theme.padding)
            .into(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_format_keeps_value_verbatim() {
        let line = format_point(&Sample::new(0.5, 1_700_000_000.0));
        assert!(line.ends_with(" - 0.5"));
        assert_eq!(line.len(), "YYYY-MM-DD HH:MM:SS - 0.5".len());
    }
}
