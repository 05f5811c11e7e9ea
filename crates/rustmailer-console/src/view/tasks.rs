//! Email and hook task queues.

use iced::widget::{Column, Space, button, column, container, row, scrollable, text};
use iced::{Alignment, Color, Element, Length};
use rustmailer_console_api::types::{TaskRecord, TaskStatus};

use super::common::{
    action_button, badge, cell, empty_state, error_banner, format_optional_time, format_time,
    page_header, table_header,
};
use crate::message::{Message, TaskMessage, TaskQueue};
use crate::model::TasksState;
use crate::style::{nav_button_selected_style, nav_button_style, palette};

fn tasks(msg: TaskMessage) -> Message {
    Message::Tasks(msg)
}

fn status_color(status: TaskStatus) -> Color {
    let p = palette::current();
    match status {
        TaskStatus::Scheduled | TaskStatus::Removed => p.text_muted,
        TaskStatus::Running => p.primary,
        TaskStatus::Success => p.success,
        TaskStatus::Failed => p.warning,
        TaskStatus::Stopped => p.danger,
    }
}

/// Renders one page of the selected queue.
pub fn view_tasks(state: &TasksState) -> Element<'_, Message> {
    let p = palette::current();
    let header = page_header(
        "Tasks",
        [action_button(
            "Refresh",
            (!state.loading).then_some(tasks(TaskMessage::Refresh)),
        )],
    );

    let queue_tab = |queue: TaskQueue, label: &'static str| {
        button(text(label).size(14))
            .padding([6, 14])
            .style(if state.queue == queue {
                nav_button_selected_style
            } else {
                nav_button_style
            })
            .on_press(tasks(TaskMessage::QueueSelected(queue)))
    };
    let tabs = row![
        queue_tab(TaskQueue::Email, "Email"),
        queue_tab(TaskQueue::Hook, "Hooks"),
    ]
    .spacing(4);

    let mut content = column![header, tabs].spacing(16);
    if let Some(error) = error_banner(state.error.as_deref()) {
        content = content.push(error);
    }
    content = content.push(table_header(&[
        ("ID", 1),
        ("Account", 3),
        ("Summary", 4),
        ("Status", 2),
        ("Created", 2),
        ("Next run", 2),
        ("Retries", 1),
    ]));

    let items = state.data.as_ref().map_or(&[][..], |d| d.items.as_slice());
    if items.is_empty() {
        content = content.push(empty_state(if state.loading {
            "Loading tasks..."
        } else {
            "No tasks in this queue"
        }));
    } else {
        let rows = items.iter().map(view_row);
        content = content.push(scrollable(Column::with_children(rows).spacing(2)).height(Length::Fill));
    }

    let pager = row![
        text(format!("Page {} of {}", state.page, state.page_count()))
            .size(13)
            .color(p.text_secondary),
        Space::new().width(Length::Fill),
        action_button(
            "Previous",
            (state.has_previous_page() && !state.loading).then_some(tasks(TaskMessage::PreviousPage)),
        ),
        action_button(
            "Next",
            (state.has_next_page() && !state.loading).then_some(tasks(TaskMessage::NextPage)),
        ),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    content.push(pager).into()
}

fn view_row(task: &TaskRecord) -> Element<'_, Message> {
    let p = palette::current();
    let account = task.account_email.clone().unwrap_or_else(|| {
        task.account_id
            .map_or_else(|| "-".to_string(), |id| format!("account #{id}"))
    });

    let mut summary = column![text(task.summary.clone().unwrap_or_default()).size(13).color(p.text_primary)];
    if let Some(error) = &task.last_error {
        summary = summary.push(text(error).size(11).color(p.danger));
    }

    container(
        row![
            cell(task.id.to_string(), 1),
            cell(account, 3),
            container(summary).width(Length::FillPortion(4)),
            container(badge(task.status.display_name(), status_color(task.status)))
                .width(Length::FillPortion(2)),
            cell(format_time(task.created_at), 2),
            cell(format_optional_time(task.scheduled_at), 2),
            cell(task.retry_count.to_string(), 1),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([8, 12])
    .into()
}
