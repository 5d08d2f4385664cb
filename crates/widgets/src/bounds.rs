use crate::connection::action;
use iced::widget::{text, text_input, Column, Row};
use iced::{Alignment, Element, Length};
use scope_core::{event::Message, AppState, BoundField};
use scope_theme::Theme;

/// Per-source `Value min` / `Value max` inputs plus the send button.
#[derive(Debug, Default)]
pub struct BoundsForm;

impl BoundsForm {
    pub fn new() -> Self {
        Self
    }

    pub fn view<'a>(&'a self, state: &'a AppState, theme: &'a Theme) -> Element<'a, Message> {
        let size = theme.font_size;

        let rows = state.ids().filter_map(|id| {
            let source = state.source(id)?;
            let min = text_input("", &source.min_input)
                .on_input(move |v| Message::BoundEdited(id, BoundField::Min, v))
                .size(size)
                .width(Length::Fixed(90.0));
            let max = text_input("", &source.max_input)
                .on_input(move |v| Message::BoundEdited(id, BoundField::Max, v))
                .size(size)
                .width(Length::Fixed(90.0));

            Some(
                Row::with_children([
                    text(format!("{} value min:", source.label)).size(size).into(),
                    min.into(),
                    text("max:").size(size).into(),
                    max.into(),
                ])
                .spacing(6.0)
                .align_y(Alignment::Center)
                .into(),
            )
        });

        let mut form = Column::with_children(rows)
            .push(action("Send values", Message::SendBoundsRequested, size))
            .spacing(theme.gap as f32 / 2.0)
            .align_x(Alignment::Center);

        if let Some(notice) = &state.notice {
            form = form.push(
                Row::with_children([
                    text(notice.as_str()).size(size).color(theme.error.to_iced()).into(),
                    action("OK", Message::NoticeDismissed, size),
                ])
                .spacing(8.0)
                .align_y(Alignment::Center),
            );
        }

        form.into()
    }
}
