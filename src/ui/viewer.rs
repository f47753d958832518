use iced::widget::image::Handle;
use iced::widget::{column, container, image, stack, text};
use iced::{alignment, Alignment, Color, ContentFit, Element, Length};

use crate::state::data::ImageRecord;

/// The main image display.
///
/// Renders whichever of the three per-image states the screen is in:
/// still loading, failed to load, or decoded and ready. A failed image
/// shows its title so the user knows which slide broke.
pub fn image_viewer<'a, M: 'a>(
    record: &'a ImageRecord,
    handle: Option<&Handle>,
    failed: bool,
) -> Element<'a, M> {
    if failed {
        return centered(
            column![
                text("Failed to load image").size(20),
                text(&record.title).size(14),
            ]
            .spacing(8)
            .align_x(Alignment::Center),
        );
    }

    let Some(handle) = handle else {
        return centered(column![text("Loading...").size(16)]);
    };

    let picture = image(handle.clone())
        .content_fit(ContentFit::Contain)
        .width(Length::Fill)
        .height(Length::Fill);

    if record.title.is_empty() {
        return picture.into();
    }

    stack![picture, info_overlay(record)]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Title and description over the lower edge of the loaded image.
fn info_overlay<'a, M: 'a>(record: &'a ImageRecord) -> Element<'a, M> {
    let mut info = column![text(&record.title).size(18)].spacing(4);
    if !record.description.is_empty() {
        info = info.push(text(&record.description).size(14));
    }

    container(
        container(info)
            .width(Length::Fill)
            .padding(12)
            .style(|_theme| container::Style {
                background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                border: iced::border::rounded(8),
                text_color: Some(Color::WHITE),
                ..container::Style::default()
            }),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .align_y(alignment::Vertical::Bottom)
    .padding(24)
    .into()
}

fn centered<'a, M: 'a>(content: impl Into<Element<'a, M>>) -> Element<'a, M> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
