use std::time::Duration;

use iced::widget::{button, column, container, horizontal_space, row, stack, text};
use iced::{time, Alignment, Element, Length, Subscription, Task, Theme};

// Declare the application modules
mod backend;
mod config;
mod media;
mod screen;
mod session;
mod state;
mod ui;

use screen::slider::{self, Slider};
use screen::tasks::{self, Tasks};
use session::Session;
use state::notice::Notice;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// Expiry tick for the toast overlay.
const TOAST_TICK: Duration = Duration::from_millis(500);

/// Main application state
struct Slidedeck {
    /// The backend session; gateways are handed out from here
    session: Session,
    /// Shared client for fetching slide and thumbnail bytes
    http: reqwest::Client,
    page: Page,
    toasts: Vec<ActiveToast>,
}

enum Page {
    Login,
    Slider(Slider),
    Tasks(Tasks),
}

struct ActiveToast {
    notice: Notice,
    remaining: Duration,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Top bar: switch to the slideshow page
    OpenSlider,
    /// Top bar: switch to the task manager page
    OpenTasks,
    /// Login screen: re-check credentials
    RetrySession,
    Slider(slider::Message),
    Tasks(tasks::Message),
    /// Toast overlay expiry tick
    ToastTick,
}

impl Slidedeck {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let session = Session::establish();
        let http = reqwest::Client::new();

        let mut app = Slidedeck {
            session,
            http,
            page: Page::Login,
            toasts: Vec::new(),
        };

        println!("🎞️  Slidedeck initialized");
        let task = app.open_slider();
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenSlider => self.open_slider(),
            Message::OpenTasks => self.open_tasks(),
            Message::RetrySession => {
                self.session = Session::establish();
                self.open_slider()
            }
            Message::Slider(message) => {
                // A completion for a page that has been left is dropped here.
                let Page::Slider(slider) = &mut self.page else {
                    return Task::none();
                };

                let (task, notices) = slider.update(message);
                self.push_toasts(notices);
                task.map(Message::Slider)
            }
            Message::Tasks(message) => {
                let Page::Tasks(tasks) = &mut self.page else {
                    return Task::none();
                };

                let (task, notices) = tasks.update(message);
                self.push_toasts(notices);
                task.map(Message::Tasks)
            }
            Message::ToastTick => {
                for toast in &mut self.toasts {
                    toast.remaining = toast.remaining.saturating_sub(TOAST_TICK);
                }
                self.toasts.retain(|toast| !toast.remaining.is_zero());
                Task::none()
            }
        }
    }

    /// Switch to the slideshow page, or to login when unauthenticated.
    fn open_slider(&mut self) -> Task<Message> {
        match self.session.images() {
            Some(gateway) => {
                let (slider, task) = Slider::new(gateway, self.http.clone());
                self.page = Page::Slider(slider);
                task.map(Message::Slider)
            }
            None => {
                self.page = Page::Login;
                Task::none()
            }
        }
    }

    /// Switch to the task manager page, or to login when unauthenticated.
    fn open_tasks(&mut self) -> Task<Message> {
        match self.session.tasks() {
            Some(gateway) => {
                let (tasks, task) = Tasks::new(gateway);
                self.page = Page::Tasks(tasks);
                task.map(Message::Tasks)
            }
            None => {
                self.page = Page::Login;
                Task::none()
            }
        }
    }

    fn push_toasts(&mut self, notices: Vec<Notice>) {
        for notice in notices {
            self.toasts.push(ActiveToast {
                notice,
                remaining: TOAST_TTL,
            });
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let page: Element<'_, Message> = match &self.page {
            Page::Login => screen::login::view(Message::RetrySession),
            Page::Slider(slider) => slider.view().map(Message::Slider),
            Page::Tasks(tasks) => tasks.view().map(Message::Tasks),
        };

        let content = column![self.top_bar(), page];

        if self.toasts.is_empty() {
            return content.into();
        }

        stack![
            content,
            ui::toast::overlay(self.toasts.iter().map(|toast| &toast.notice)),
        ]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    fn top_bar(&self) -> Element<'_, Message> {
        let mut bar = row![text("Slidedeck").size(20), horizontal_space()]
            .spacing(12)
            .align_y(Alignment::Center);

        // Navigation only makes sense once the session can reach the backend.
        if self.session.is_authenticated() {
            bar = bar
                .push(button("Slideshow").padding(8).on_press(Message::OpenSlider))
                .push(button("Tasks").padding(8).on_press(Message::OpenTasks));
        }

        container(bar).width(Length::Fill).padding(12).into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();

        if let Page::Slider(slider) = &self.page {
            subscriptions.push(slider.subscription().map(Message::Slider));
        }

        if !self.toasts.is_empty() {
            subscriptions.push(time::every(TOAST_TICK).map(|_| Message::ToastTick));
        }

        Subscription::batch(subscriptions)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Slidedeck", Slidedeck::update, Slidedeck::view)
        .subscription(Slidedeck::subscription)
        .theme(Slidedeck::theme)
        .centered()
        .run_with(Slidedeck::new)
}
