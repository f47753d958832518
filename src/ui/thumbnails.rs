use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{button, container, image, scrollable, text, Row};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::data::ImageRecord;

const THUMB_WIDTH: f32 = 80.0;
const THUMB_HEIGHT: f32 = 48.0;

/// Horizontal strip of selectable thumbnails. The current slide gets the
/// highlighted style. Thumbnails whose bytes have not arrived yet render a
/// numbered placeholder.
pub fn thumbnail_strip<'a, M: Clone + 'a>(
    images: &'a [ImageRecord],
    current: usize,
    thumbs: &HashMap<i64, Handle>,
    on_select: impl Fn(usize) -> M + 'a,
) -> Element<'a, M> {
    let mut strip = Row::new().spacing(8).align_y(Alignment::Center);

    for (index, record) in images.iter().enumerate() {
        let content: Element<'a, M> = match thumbs.get(&record.id) {
            Some(handle) => image(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fixed(THUMB_WIDTH))
                .height(Length::Fixed(THUMB_HEIGHT))
                .into(),
            None => container(text(format!("{}", index + 1)).size(12))
                .center_x(Length::Fixed(THUMB_WIDTH))
                .center_y(Length::Fixed(THUMB_HEIGHT))
                .into(),
        };

        let style = if index == current {
            button::primary
        } else {
            button::text
        };

        strip = strip.push(
            button(content)
                .padding(2)
                .style(style)
                .on_press(on_select(index)),
        );
    }

    scrollable(strip)
        .direction(scrollable::Direction::Horizontal(
            scrollable::Scrollbar::new().width(4).scroller_width(4),
        ))
        .into()
}
