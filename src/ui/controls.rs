use std::fmt;

use iced::widget::{button, container, horizontal_space, pick_list, row, text};
use iced::{Alignment, Element, Length};

use crate::state::slideshow::SLIDE_DURATIONS;

/// Large previous/next arrows over the left and right edges of the viewer.
/// Disabled at the respective sequence boundary.
pub fn navigation_arrows<'a, M: Clone + 'a>(
    can_previous: bool,
    can_next: bool,
    on_previous: M,
    on_next: M,
) -> Element<'a, M> {
    let previous = button(text("◀").size(24))
        .padding(12)
        .on_press_maybe(can_previous.then_some(on_previous));
    let next = button(text("▶").size(24))
        .padding(12)
        .on_press_maybe(can_next.then_some(on_next));

    row![
        container(previous).height(Length::Fill).center_y(Length::Fill),
        horizontal_space(),
        container(next).height(Length::Fill).center_y(Length::Fill),
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .padding(16)
    .into()
}

/// Playback controls: step buttons, play/pause, the duration picker, and
/// the position indicator.
#[allow(clippy::too_many_arguments)]
pub fn controls_bar<'a, M: Clone + 'a>(
    playing: bool,
    index: usize,
    total: usize,
    duration_secs: u64,
    can_previous: bool,
    can_next: bool,
    on_previous: M,
    on_next: M,
    on_toggle: M,
    on_duration: impl Fn(u64) -> M + 'a,
) -> Element<'a, M> {
    let previous = button("◀")
        .padding(8)
        .on_press_maybe(can_previous.then_some(on_previous));
    let toggle = button(text(if playing { "Pause" } else { "Play" }).size(16))
        .padding([8.0, 16.0])
        .on_press(on_toggle);
    let next = button("▶")
        .padding(8)
        .on_press_maybe(can_next.then_some(on_next));

    let durations = pick_list(
        SLIDE_DURATIONS.map(DurationChoice),
        Some(DurationChoice(duration_secs)),
        move |choice: DurationChoice| on_duration(choice.0),
    );

    row![
        previous,
        toggle,
        next,
        durations,
        text(format!("{} / {}", index + 1, total)).size(14),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}

/// A selectable slide duration, shown as "5s".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DurationChoice(u64);

impl fmt::Display for DurationChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}
