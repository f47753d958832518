use iced::widget::{button, column, container, text, Column};
use iced::{Alignment, Element, Length};

/// Full-page loading state.
pub fn loading_view<'a, M: 'a>(label: impl Into<String>) -> Element<'a, M> {
    centered(column![text(label.into()).size(20)])
}

/// Full-page error state with a retry action that re-issues the query.
pub fn error_view<'a, M: Clone + 'a>(message: &str, on_retry: M) -> Element<'a, M> {
    centered(column![
        text("Something went wrong").size(28),
        text(message.to_string()).size(16),
        button("Try Again").on_press(on_retry).padding(10),
    ])
}

/// Full-page empty state with a call to action.
pub fn empty_view<'a, M: Clone + 'a>(
    title: &str,
    body: &str,
    action: &str,
    on_action: M,
) -> Element<'a, M> {
    centered(column![
        text(title.to_string()).size(28),
        text(body.to_string()).size(16),
        button(text(action.to_string())).on_press(on_action).padding(10),
    ])
}

fn centered<'a, M: 'a>(content: Column<'a, M>) -> Element<'a, M> {
    container(content.spacing(20).align_x(Alignment::Center))
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
