//! The slideshow page.
//!
//! Loads the image sequence on entry, branches on loading/error/empty, and
//! hosts the slideshow controller. All timers live here as subscriptions
//! derived from controller state, so they stop existing the moment the
//! screen is left or playback ends; a tick can never mutate a torn-down
//! slideshow. Async image fetches carry the image id and are dropped when
//! that id is no longer current.

use std::collections::HashMap;
use std::time::Duration;

use iced::keyboard::{self, key};
use iced::widget::image::Handle;
use iced::widget::{column, container, stack};
use iced::{alignment, event, mouse, time, Alignment, Element, Event, Length, Subscription, Task};

use crate::backend::images::ImageGateway;
use crate::media::{self, Decoded};
use crate::state::data::ImageRecord;
use crate::state::notice::Notice;
use crate::state::slideshow::Slideshow;
use crate::ui;

/// Coarse tick feeding the controls-inactivity clock.
const IDLE_TICK: Duration = Duration::from_millis(250);

pub struct Slider {
    gateway: ImageGateway,
    http: reqwest::Client,
    phase: Phase,
}

enum Phase {
    Loading,
    Failed(String),
    Empty,
    Ready(Show),
}

struct Show {
    images: Vec<ImageRecord>,
    slideshow: Slideshow,
    slide: SlideState,
    thumbs: HashMap<i64, Handle>,
}

impl Show {
    fn current(&self) -> &ImageRecord {
        &self.images[self.slideshow.index()]
    }
}

/// Display state of the current slide.
enum SlideState {
    Loading,
    Failed,
    Ready(Handle),
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Vec<ImageRecord>, String>),
    Retry,
    Previous,
    Next,
    TogglePlay,
    Stop,
    Select(usize),
    DurationPicked(u64),
    SlideTimer,
    IdleTimer,
    Activity,
    SlideFetched {
        id: i64,
        result: Result<Decoded, String>,
    },
    ThumbFetched {
        id: i64,
        result: Result<Decoded, String>,
    },
}

impl Slider {
    pub fn new(gateway: ImageGateway, http: reqwest::Client) -> (Self, Task<Message>) {
        let slider = Self {
            gateway,
            http,
            phase: Phase::Loading,
        };
        let load = slider.load();
        (slider, load)
    }

    fn load(&self) -> Task<Message> {
        let gateway = self.gateway.clone();
        Task::perform(
            async move { gateway.get_all().await.map_err(|error| error.to_string()) },
            Message::Loaded,
        )
    }

    /// Handle a message; returns follow-up work and any notices to toast.
    pub fn update(&mut self, message: Message) -> (Task<Message>, Vec<Notice>) {
        match message {
            Message::Loaded(Ok(images)) => {
                if images.is_empty() {
                    self.phase = Phase::Empty;
                    return (Task::none(), Vec::new());
                }

                let count = images.len();
                println!("🖼️  Loaded {count} images from the backend");

                let show = Show {
                    slideshow: Slideshow::new(count),
                    slide: SlideState::Loading,
                    thumbs: HashMap::new(),
                    images,
                };

                let fetch_current = fetch_slide(&self.http, show.current());
                let fetch_thumbs = fetch_thumbnails(&self.http, &show.images);
                self.phase = Phase::Ready(show);

                (
                    Task::batch([fetch_current, fetch_thumbs]),
                    vec![Notice::success(format!(
                        "Loaded {count} images successfully"
                    ))],
                )
            }
            Message::Loaded(Err(message)) => {
                eprintln!("⚠️  Image load failed: {message}");
                self.phase = Phase::Failed(message);
                (Task::none(), vec![Notice::error("Failed to load images")])
            }
            Message::Retry => {
                self.phase = Phase::Loading;
                (self.load(), Vec::new())
            }
            message => {
                let Phase::Ready(show) = &mut self.phase else {
                    // Completion for a phase that is gone.
                    return (Task::none(), Vec::new());
                };
                Self::update_show(&self.http, show, message)
            }
        }
    }

    fn update_show(
        http: &reqwest::Client,
        show: &mut Show,
        message: Message,
    ) -> (Task<Message>, Vec<Notice>) {
        match message {
            Message::Previous => {
                show.slideshow.activity();
                Self::navigate(http, show, |slideshow| slideshow.previous())
            }
            Message::Next => {
                show.slideshow.activity();
                Self::navigate(http, show, |slideshow| slideshow.next())
            }
            Message::Select(index) => {
                Self::navigate(http, show, |slideshow| slideshow.select(index))
            }
            Message::TogglePlay => {
                show.slideshow.activity();
                let notice = show.slideshow.toggle_play();
                (Task::none(), notice.into_iter().collect())
            }
            Message::Stop => {
                show.slideshow.activity();
                show.slideshow.stop();
                (Task::none(), Vec::new())
            }
            Message::DurationPicked(secs) => {
                let notice = show.slideshow.set_duration(secs);
                (Task::none(), notice.into_iter().collect())
            }
            Message::SlideTimer => Self::navigate(http, show, |slideshow| slideshow.advance()),
            Message::IdleTimer => {
                show.slideshow.idle_tick(IDLE_TICK);
                (Task::none(), Vec::new())
            }
            Message::Activity => {
                show.slideshow.activity();
                (Task::none(), Vec::new())
            }
            Message::SlideFetched { id, result } => {
                if show.current().id != id {
                    // Superseded: the user moved on before the fetch landed.
                    return (Task::none(), Vec::new());
                }

                match result {
                    Ok(decoded) => {
                        println!(
                            "📸 Slide {id} ready ({}x{})",
                            decoded.width, decoded.height
                        );
                        show.slideshow.image_loaded();
                        show.slide = SlideState::Ready(decoded.handle);
                        (Task::none(), Vec::new())
                    }
                    Err(message) => {
                        eprintln!("⚠️  Image {id} failed to load: {message}");
                        show.slide = SlideState::Failed;
                        (Task::none(), vec![show.slideshow.image_failed()])
                    }
                }
            }
            Message::ThumbFetched { id, result } => {
                // Missing thumbnails keep their placeholder.
                if let Ok(decoded) = result {
                    show.thumbs.insert(id, decoded.handle);
                }
                (Task::none(), Vec::new())
            }
            Message::Loaded(_) | Message::Retry => (Task::none(), Vec::new()),
        }
    }

    /// Apply a controller transition and fetch the new current image when
    /// the index moved.
    fn navigate(
        http: &reqwest::Client,
        show: &mut Show,
        transition: impl FnOnce(&mut Slideshow) -> Option<Notice>,
    ) -> (Task<Message>, Vec<Notice>) {
        let before = show.slideshow.index();
        let notice = transition(&mut show.slideshow);

        let task = if show.slideshow.index() != before {
            show.slide = SlideState::Loading;
            fetch_slide(http, show.current())
        } else {
            Task::none()
        };

        (task, notice.into_iter().collect())
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.phase {
            Phase::Loading => ui::feedback::loading_view("Loading images..."),
            Phase::Failed(message) => ui::feedback::error_view(message, Message::Retry),
            Phase::Empty => ui::feedback::empty_view(
                "No Images Found",
                "Your image gallery is empty. Add some images to start the slideshow.",
                "Refresh",
                Message::Retry,
            ),
            Phase::Ready(show) => Self::view_show(show),
        }
    }

    fn view_show(show: &Show) -> Element<'_, Message> {
        let record = show.current();
        let handle = match &show.slide {
            SlideState::Ready(handle) => Some(handle),
            _ => None,
        };
        let failed = matches!(show.slide, SlideState::Failed);

        let mut layers = stack![ui::viewer::image_viewer(record, handle, failed)];

        if show.slideshow.controls_visible() {
            layers = layers.push(ui::controls::navigation_arrows(
                show.slideshow.can_go_previous(),
                show.slideshow.can_go_next(),
                Message::Previous,
                Message::Next,
            ));

            let bar = ui::controls::controls_bar(
                show.slideshow.is_playing(),
                show.slideshow.index(),
                show.slideshow.len(),
                show.slideshow.duration_secs(),
                show.slideshow.can_go_previous(),
                show.slideshow.can_go_next(),
                Message::Previous,
                Message::Next,
                Message::TogglePlay,
                Message::DurationPicked,
            );
            let strip = ui::thumbnails::thumbnail_strip(
                &show.images,
                show.slideshow.index(),
                &show.thumbs,
                Message::Select,
            );

            layers = layers.push(
                container(column![bar, strip].spacing(12).align_x(Alignment::Center))
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(alignment::Horizontal::Center)
                    .align_y(alignment::Vertical::Bottom)
                    .padding(16),
            );
        }

        layers.width(Length::Fill).height(Length::Fill).into()
    }

    /// Timers exist only while something can consume them: the advance and
    /// inactivity timers only during playback, key handling whenever the
    /// slideshow itself is on screen.
    pub fn subscription(&self) -> Subscription<Message> {
        let Phase::Ready(show) = &self.phase else {
            return Subscription::none();
        };

        let mut subscriptions = vec![keyboard::on_key_press(handle_key)];

        if show.slideshow.is_playing() {
            subscriptions.push(
                time::every(Duration::from_secs(show.slideshow.duration_secs()))
                    .map(|_| Message::SlideTimer),
            );
            subscriptions.push(time::every(IDLE_TICK).map(|_| Message::IdleTimer));
            subscriptions.push(event::listen_with(pointer_activity));
        }

        Subscription::batch(subscriptions)
    }
}

/// Global key contract while the slider is mounted: Left/Right step,
/// Space toggles playback, Escape forces pause. Any other key only counts
/// as activity for the controls.
fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(key::Named::ArrowLeft) => Some(Message::Previous),
        keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::Next),
        keyboard::Key::Named(key::Named::Space) => Some(Message::TogglePlay),
        keyboard::Key::Named(key::Named::Escape) => Some(Message::Stop),
        _ => Some(Message::Activity),
    }
}

fn pointer_activity(
    event: Event,
    _status: event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    match event {
        Event::Mouse(mouse::Event::CursorMoved { .. }) => Some(Message::Activity),
        _ => None,
    }
}

fn fetch_slide(http: &reqwest::Client, record: &ImageRecord) -> Task<Message> {
    let id = record.id;
    Task::perform(
        media::fetch_and_decode(http.clone(), record.url.clone()),
        move |result| Message::SlideFetched { id, result },
    )
}

/// Prefetch every thumbnail in the background; the strip shows numbered
/// placeholders until bytes arrive.
fn fetch_thumbnails(http: &reqwest::Client, images: &[ImageRecord]) -> Task<Message> {
    Task::batch(images.iter().map(|record| {
        let id = record.id;
        Task::perform(
            media::fetch_and_decode(http.clone(), record.thumbnail_url.clone()),
            move |result| Message::ThumbFetched { id, result },
        )
    }))
}
