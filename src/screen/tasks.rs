//! The task manager page.
//!
//! Loads the task list on entry (optionally filtered by status on the
//! server side), and hosts the create/edit form and the delete
//! confirmation. Updates send only the fields the user changed; deletes
//! remove the row from the local list once the backend confirms.

use std::fmt;

use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, text, text_input,
    Column, TextInput,
};
use iced::{Alignment, Color, Element, Length, Task};

use crate::backend::tasks::{TaskFilters, TaskGateway};
use crate::state::data::{TaskRecord, TaskStatus};
use crate::state::form::TaskForm;
use crate::state::notice::Notice;
use crate::ui;

pub struct Tasks {
    gateway: TaskGateway,
    phase: Phase,
    filter: StatusFilter,
    editor: Option<Editor>,
    pending_delete: Option<PendingDelete>,
}

enum Phase {
    Loading,
    Failed(String),
    Ready(Vec<TaskRecord>),
}

struct Editor {
    form: TaskForm,
    /// The record being edited; None while creating.
    editing: Option<TaskRecord>,
}

struct PendingDelete {
    id: i64,
    label: String,
}

/// The status dropdown above the list, with an extra "all" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    const ALL: [StatusFilter; 6] = [
        StatusFilter::All,
        StatusFilter::Only(TaskStatus::NotStarted),
        StatusFilter::Only(TaskStatus::InProgress),
        StatusFilter::Only(TaskStatus::Completed),
        StatusFilter::Only(TaskStatus::OnHold),
        StatusFilter::Only(TaskStatus::Cancelled),
    ];

    fn to_filters(self) -> TaskFilters {
        TaskFilters {
            status: match self {
                StatusFilter::All => None,
                StatusFilter::Only(status) => Some(status),
            },
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("All Tasks"),
            StatusFilter::Only(status) => f.write_str(status.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Loaded(Result<Vec<TaskRecord>, String>),
    Retry,
    FilterPicked(StatusFilter),
    OpenCreate,
    OpenEdit(i64),
    CancelEditor,
    NameChanged(String),
    DisplayNameChanged(String),
    DescriptionChanged(String),
    StatusPicked(TaskStatus),
    DueDateChanged(String),
    TagsChanged(String),
    Submit,
    Created(Result<TaskRecord, String>),
    Updated(Result<TaskRecord, String>),
    RequestDelete(i64),
    ConfirmDelete,
    CancelDelete,
    Deleted { id: i64, result: Result<bool, String> },
}

impl Tasks {
    pub fn new(gateway: TaskGateway) -> (Self, Task<Message>) {
        let tasks = Self {
            gateway,
            phase: Phase::Loading,
            filter: StatusFilter::default(),
            editor: None,
            pending_delete: None,
        };
        let load = tasks.load();
        (tasks, load)
    }

    fn load(&self) -> Task<Message> {
        let gateway = self.gateway.clone();
        let filters = self.filter.to_filters();
        Task::perform(
            async move {
                gateway
                    .get_all(&filters)
                    .await
                    .map_err(|error| error.to_string())
            },
            Message::Loaded,
        )
    }

    /// Handle a message; returns follow-up work and any notices to toast.
    pub fn update(&mut self, message: Message) -> (Task<Message>, Vec<Notice>) {
        match message {
            Message::Loaded(Ok(tasks)) => {
                let count = tasks.len();
                self.phase = Phase::Ready(tasks);

                let notices = if count > 0 {
                    vec![Notice::success(format!("Loaded {count} tasks successfully"))]
                } else {
                    Vec::new()
                };
                (Task::none(), notices)
            }
            Message::Loaded(Err(message)) => {
                eprintln!("⚠️  Task load failed: {message}");
                self.phase = Phase::Failed(message);
                (Task::none(), vec![Notice::error("Failed to load tasks")])
            }
            Message::Retry => {
                self.phase = Phase::Loading;
                (self.load(), Vec::new())
            }
            Message::FilterPicked(filter) => {
                self.filter = filter;
                self.phase = Phase::Loading;
                (self.load(), Vec::new())
            }
            Message::OpenCreate => {
                self.editor = Some(Editor {
                    form: TaskForm::blank(),
                    editing: None,
                });
                (Task::none(), Vec::new())
            }
            Message::OpenEdit(id) => {
                if let Phase::Ready(tasks) = &self.phase {
                    if let Some(record) = tasks.iter().find(|task| task.id == id) {
                        self.editor = Some(Editor {
                            form: TaskForm::from_record(record),
                            editing: Some(record.clone()),
                        });
                    }
                }
                (Task::none(), Vec::new())
            }
            Message::CancelEditor => {
                self.editor = None;
                (Task::none(), Vec::new())
            }
            Message::NameChanged(value) => self.edit_form(|form| form.name = value),
            Message::DisplayNameChanged(value) => self.edit_form(|form| form.display_name = value),
            Message::DescriptionChanged(value) => self.edit_form(|form| form.description = value),
            Message::StatusPicked(status) => self.edit_form(|form| form.status = status),
            Message::DueDateChanged(value) => self.edit_form(|form| form.due_date = value),
            Message::TagsChanged(value) => self.edit_form(|form| form.tags = value),
            Message::Submit => self.submit(),
            Message::Created(Ok(task)) => {
                if let Phase::Ready(tasks) = &mut self.phase {
                    tasks.insert(0, task);
                }
                self.editor = None;
                (
                    Task::none(),
                    vec![Notice::success("Task created successfully")],
                )
            }
            Message::Created(Err(message)) => {
                eprintln!("⚠️  Task create failed: {message}");
                (Task::none(), vec![Notice::error("Failed to create task")])
            }
            Message::Updated(Ok(task)) => {
                if let Phase::Ready(tasks) = &mut self.phase {
                    if let Some(slot) = tasks.iter_mut().find(|current| current.id == task.id) {
                        *slot = task;
                    }
                }
                self.editor = None;
                (
                    Task::none(),
                    vec![Notice::success("Task updated successfully")],
                )
            }
            Message::Updated(Err(message)) => {
                eprintln!("⚠️  Task update failed: {message}");
                (Task::none(), vec![Notice::error("Failed to update task")])
            }
            Message::RequestDelete(id) => {
                if let Phase::Ready(tasks) = &self.phase {
                    if let Some(record) = tasks.iter().find(|task| task.id == id) {
                        self.pending_delete = Some(PendingDelete {
                            id,
                            label: record.label().to_string(),
                        });
                    }
                }
                (Task::none(), Vec::new())
            }
            Message::CancelDelete => {
                self.pending_delete = None;
                (Task::none(), Vec::new())
            }
            Message::ConfirmDelete => {
                let Some(pending) = self.pending_delete.take() else {
                    return (Task::none(), Vec::new());
                };

                let gateway = self.gateway.clone();
                let id = pending.id;
                (
                    Task::perform(
                        async move {
                            gateway.delete(id).await.map_err(|error| error.to_string())
                        },
                        move |result| Message::Deleted { id, result },
                    ),
                    Vec::new(),
                )
            }
            Message::Deleted { id, result } => match result {
                Ok(true) => {
                    if let Phase::Ready(tasks) = &mut self.phase {
                        tasks.retain(|task| task.id != id);
                    }
                    (
                        Task::none(),
                        vec![Notice::success("Task deleted successfully")],
                    )
                }
                Ok(false) => (Task::none(), vec![Notice::error("Failed to delete task")]),
                Err(message) => {
                    eprintln!("⚠️  Task delete failed: {message}");
                    (Task::none(), vec![Notice::error("Failed to delete task")])
                }
            },
        }
    }

    fn edit_form(&mut self, apply: impl FnOnce(&mut TaskForm)) -> (Task<Message>, Vec<Notice>) {
        if let Some(editor) = &mut self.editor {
            apply(&mut editor.form);
        }
        (Task::none(), Vec::new())
    }

    fn submit(&mut self) -> (Task<Message>, Vec<Notice>) {
        let Some(editor) = &self.editor else {
            return (Task::none(), Vec::new());
        };

        if let Err(message) = editor.form.validate() {
            return (Task::none(), vec![Notice::error(message)]);
        }

        let gateway = self.gateway.clone();
        let task = match &editor.editing {
            Some(original) => {
                let id = original.id;
                let patch = editor.form.patch_against(original);
                Task::perform(
                    async move {
                        gateway
                            .update(id, &patch)
                            .await
                            .map_err(|error| error.to_string())
                    },
                    Message::Updated,
                )
            }
            None => {
                let draft = editor.form.to_draft();
                Task::perform(
                    async move {
                        gateway
                            .create(&draft)
                            .await
                            .map_err(|error| error.to_string())
                    },
                    Message::Created,
                )
            }
        };

        (task, Vec::new())
    }

    pub fn view(&self) -> Element<'_, Message> {
        match &self.phase {
            Phase::Loading => ui::feedback::loading_view("Loading tasks..."),
            Phase::Failed(message) => ui::feedback::error_view(message, Message::Retry),
            Phase::Ready(tasks) => self.view_list(tasks),
        }
    }

    fn view_list<'a>(&'a self, tasks: &'a [TaskRecord]) -> Element<'a, Message> {
        let header = row![
            column![
                text("Tasks").size(32),
                text("Manage your tasks and track progress").size(14),
            ]
            .spacing(4),
            horizontal_space(),
            button("+ Add Task").padding(10).on_press(Message::OpenCreate),
        ]
        .align_y(Alignment::Center);

        let filter = row![
            text("Filter by status:").size(14),
            pick_list(StatusFilter::ALL, Some(self.filter), Message::FilterPicked),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let mut page = column![header, filter].spacing(20).padding(24);

        if let Some(editor) = &self.editor {
            page = page.push(editor_view(editor));
        }

        if let Some(pending) = &self.pending_delete {
            page = page.push(confirm_delete_view(pending));
        }

        let list: Element<'a, Message> = if tasks.is_empty() {
            ui::feedback::empty_view(
                "No Tasks Found",
                "Nothing matches this view yet. Create a task to get started.",
                "Add Task",
                Message::OpenCreate,
            )
        } else {
            let mut cards = Column::new().spacing(12);
            for task in tasks {
                cards = cards.push(task_card(task));
            }
            scrollable(cards).height(Length::Fill).into()
        };

        page.push(list).into()
    }
}

fn editor_view(editor: &Editor) -> Element<'_, Message> {
    let title = if editor.editing.is_some() {
        "Edit Task"
    } else {
        "Create New Task"
    };
    let submit_label = if editor.editing.is_some() {
        "Update Task"
    } else {
        "Create Task"
    };
    let form = &editor.form;

    let fields = column![
        row![
            labeled(
                "Task Name",
                text_input("Enter task name", &form.name)
                    .on_input(Message::NameChanged),
            ),
            labeled(
                "Display Name",
                text_input("Enter display name", &form.display_name)
                    .on_input(Message::DisplayNameChanged),
            ),
        ]
        .spacing(16),
        row![
            labeled_element(
                "Status",
                pick_list(TaskStatus::ALL, Some(form.status), Message::StatusPicked).into(),
            ),
            labeled(
                "Due Date",
                text_input("YYYY-MM-DD", &form.due_date)
                    .on_input(Message::DueDateChanged),
            ),
        ]
        .spacing(16),
        labeled(
            "Description",
            text_input("Enter task description", &form.description)
                .on_input(Message::DescriptionChanged),
        ),
        labeled(
            "Tags",
            text_input("Enter tags separated by commas", &form.tags)
                .on_input(Message::TagsChanged),
        ),
        row![
            button(submit_label).padding(10).on_press(Message::Submit),
            button("Cancel")
                .padding(10)
                .style(button::secondary)
                .on_press(Message::CancelEditor),
        ]
        .spacing(12),
    ]
    .spacing(16);

    container(column![text(title).size(22), fields].spacing(16))
        .width(Length::Fill)
        .padding(16)
        .style(container::rounded_box)
        .into()
}

fn labeled<'a>(
    label: &'a str,
    input: TextInput<'a, Message>,
) -> Element<'a, Message> {
    labeled_element(label, input.into())
}

fn labeled_element<'a>(label: &'a str, input: Element<'a, Message>) -> Element<'a, Message> {
    column![text(label).size(13), input]
        .spacing(4)
        .width(Length::Fill)
        .into()
}

fn confirm_delete_view(pending: &PendingDelete) -> Element<'_, Message> {
    container(
        row![
            text(format!("Delete \"{}\"?", pending.label)).size(16),
            horizontal_space(),
            button("Delete")
                .padding(8)
                .style(button::danger)
                .on_press(Message::ConfirmDelete),
            button("Cancel")
                .padding(8)
                .style(button::secondary)
                .on_press(Message::CancelDelete),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(12)
    .style(container::rounded_box)
    .into()
}

fn task_card(task: &TaskRecord) -> Element<'_, Message> {
    let mut details = row![].spacing(24);
    details = details.push(
        text(match task.due_date {
            Some(date) => format!("Due: {}", date.format("%Y-%m-%d")),
            None => "Due: No due date".to_string(),
        })
        .size(13),
    );
    if let Some(assignee) = &task.assignee {
        if !assignee.name.is_empty() {
            details = details.push(text(format!("Assigned to: {}", assignee.name)).size(13));
        }
    }
    if !task.tags.is_empty() {
        details = details.push(text(&task.tags).size(13));
    }

    let mut body = column![row![
        text(task.label()).size(18),
        text(task.status.as_str())
            .size(13)
            .color(status_color(task.status)),
    ]
    .spacing(12)
    .align_y(Alignment::Center)]
    .spacing(8);

    if !task.description.is_empty() {
        body = body.push(text(&task.description).size(14));
    }
    body = body.push(details);

    container(
        row![
            body,
            horizontal_space(),
            column![
                button("Edit").padding(6).on_press(Message::OpenEdit(task.id)),
                button("Delete")
                    .padding(6)
                    .style(button::danger)
                    .on_press(Message::RequestDelete(task.id)),
            ]
            .spacing(8),
        ]
        .align_y(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(16)
    .style(container::rounded_box)
    .into()
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::from_rgb(0.30, 0.78, 0.47),
        TaskStatus::InProgress => Color::from_rgb(0.38, 0.57, 0.96),
        TaskStatus::OnHold => Color::from_rgb(0.96, 0.80, 0.30),
        TaskStatus::Cancelled => Color::from_rgb(0.93, 0.37, 0.37),
        TaskStatus::NotStarted => Color::from_rgb(0.65, 0.65, 0.65),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter_maps_to_gateway_filters() {
        assert_eq!(StatusFilter::All.to_filters(), TaskFilters::default());
        assert_eq!(
            StatusFilter::Only(TaskStatus::OnHold).to_filters(),
            TaskFilters {
                status: Some(TaskStatus::OnHold)
            }
        );
    }

    #[test]
    fn test_status_filter_labels() {
        assert_eq!(StatusFilter::All.to_string(), "All Tasks");
        assert_eq!(
            StatusFilter::Only(TaskStatus::InProgress).to_string(),
            "In Progress"
        );
    }
}
