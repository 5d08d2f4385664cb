use iced::widget::{button, text, text_input, Column, Row};
use iced::{Alignment, Element, Length};
use scope_core::{event::Message, AppState, ConnectionStatus};
use scope_theme::Theme;

/// URI fields, per-source status, and the action buttons.
#[derive(Debug, Default)]
pub struct ConnectionPanel {
    history_points: usize,
}

impl ConnectionPanel {
    pub fn new(history_points: usize) -> Self {
        Self { history_points }
    }

    pub fn view<'a>(&'a self, state: &'a AppState, theme: &'a Theme) -> Element<'a, Message> {
        let size = theme.font_size;

        let uris = Row::with_children(state.ids().filter_map(|id| {
            let source = state.source(id)?;
            let field: Element<'a, Message> = text_input(&source.label, &source.uri)
                .on_input(move |uri| Message::UriEdited(id, uri))
                .size(size)
                .width(Length::Fixed(260.0))
                .into();
            let (label, color) = status_label(source.status, theme);
            let status: Element<'a, Message> = text(label).size(size).color(color).into();
            Some(
                Row::with_children([field, status])
                    .spacing(6.0)
                    .align_y(Alignment::Center)
                    .into(),
            )
        }))
        .spacing(theme.gap as f32 * 2.0);

        let toggle = if state.any_active() { "Stop" } else { "Start" };
        let buttons = Row::with_children([
            action(toggle, Message::ToggleRequested, size),
            action(
                format!("Show last {} points", self.history_points),
                Message::HistoryRequested,
                size,
            ),
            action("Show latest point", Message::LatestRequested, size),
        ])
        .spacing(theme.gap as f32);

        Column::with_children([
            text("WebSocket URI").size(size).into(),
            uris.into(),
            buttons.into(),
        ])
        .spacing(theme.gap as f32)
        .align_x(Alignment::Center)
        .into()
    }
}

fn status_label(status: ConnectionStatus, theme: &Theme) -> (&'static str, iced::Color) {
    match status {
        ConnectionStatus::Connected    => ("✔ Connected", theme.accent.to_iced()),
        ConnectionStatus::Connecting   => ("Connecting…", theme.foreground.to_iced()),
        ConnectionStatus::Disconnected => ("", theme.foreground.to_iced()),
    }
}

pub(crate) fn action<'a>(label: impl Into<String>, msg: Message, size: f32) -> Element<'a, Message> {
    button(text(label.into()).size(size))
        .on_press(msg)
        .padding([8.0, 16.0])
        .into()
}
