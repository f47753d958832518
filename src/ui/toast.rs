use iced::widget::{container, text, Column};
use iced::{alignment, Color, Element, Length};

use crate::state::notice::{Notice, NoticeKind};

/// Overlay layer stacking active toasts in the top-right corner.
pub fn overlay<'a, M: 'a>(notices: impl Iterator<Item = &'a Notice>) -> Element<'a, M> {
    let mut stack = Column::new().spacing(8).width(Length::Fixed(320.0));
    for notice in notices {
        stack = stack.push(card(notice));
    }

    container(stack)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Right)
        .align_y(alignment::Vertical::Top)
        .padding(16)
        .into()
}

fn card<'a, M: 'a>(notice: &'a Notice) -> Element<'a, M> {
    let accent = match notice.kind {
        NoticeKind::Success => Color::from_rgb(0.18, 0.55, 0.34),
        NoticeKind::Error => Color::from_rgb(0.72, 0.22, 0.22),
        NoticeKind::Info => Color::from_rgb(0.22, 0.42, 0.69),
    };

    container(text(&notice.text).size(14).color(Color::WHITE))
        .width(Length::Fill)
        .padding(12)
        .style(move |_theme| container::Style {
            background: Some(accent.into()),
            border: iced::border::rounded(6),
            ..container::Style::default()
        })
        .into()
}
