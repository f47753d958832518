use iced::widget::{button, column, container, text};
use iced::{Alignment, Element, Length};

use crate::config::{Config, ENV_PROJECT_ID, ENV_PUBLIC_KEY};

/// Shown when no backend credentials are configured. Gateway calls are
/// never issued from this screen.
pub fn view<'a, M: Clone + 'a>(on_retry: M) -> Element<'a, M> {
    let content = column![
        text("Sign in required").size(32),
        text(format!(
            "Set {ENV_PROJECT_ID} and {ENV_PUBLIC_KEY} in the environment,"
        ))
        .size(16),
        text(format!("or create {}", Config::file_path().display())).size(16),
        button("Check Again").on_press(on_retry).padding(10),
    ]
    .spacing(16)
    .align_x(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
