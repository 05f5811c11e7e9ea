//! Server overview: counters, success rates and delivery charts.

use iced::widget::{Row, Space, column, container, row, scrollable, text};
use iced::{Alignment, Background, Border, Color, Element, Length};
use rustmailer_console_api::types::{Overview, TimeSeriesPoint};

use super::common::{BOLD, action_button, banner, empty_state, page_header, section};
use crate::message::{DashboardMessage, Message};
use crate::model::{DashboardState, bar_heights, format_rate, format_uptime};
use crate::style::{card_style, palette, radius};

const CHART_HEIGHT: f32 = 120.0;

/// Renders the dashboard.
pub fn view_dashboard(state: &DashboardState) -> Element<'_, Message> {
    let p = palette::current();
    let refresh = action_button(
        if state.loading { "Refreshing..." } else { "Refresh" },
        (!state.loading).then_some(Message::Dashboard(DashboardMessage::Refresh)),
    );

    let mut content = column![page_header("Dashboard", [refresh])].spacing(16);

    if let Some(error) = &state.error {
        content = content.push(banner(format!("Overview unavailable: {error}"), p.warning));
    }

    match &state.overview {
        Some(overview) => {
            content = content.push(view_counters(overview));
            content = content.push(section(
                "Emails sent",
                view_chart(&overview.email_sent_series, p.primary),
            ));
            content = content.push(section(
                "Hook deliveries",
                view_chart(&overview.hook_series, p.info),
            ));
        }
        None => content = content.push(empty_state("Loading overview...")),
    }

    scrollable(content).height(Length::Fill).into()
}

fn view_counters(overview: &Overview) -> Element<'_, Message> {
    let p = palette::current();
    let now = chrono::Utc::now().timestamp_millis();

    let first = row![
        stat("Version", overview.version.clone(), p.text_primary),
        stat("Uptime", format_uptime(overview.start_at, now), p.text_primary),
        stat("Accounts", overview.account_count.to_string(), p.primary),
        stat("Hooks", overview.hook_count.to_string(), p.primary),
    ]
    .spacing(12);

    let second = row![
        stat(
            "Pending email tasks",
            overview.pending_email_task_num.to_string(),
            p.warning,
        ),
        stat(
            "Pending hook tasks",
            overview.pending_hook_task_num.to_string(),
            p.warning,
        ),
        stat(
            "Email success",
            format!(
                "{} ({} / {})",
                format_rate(overview.email_success_rate()),
                overview.email_sent_success,
                overview.email_sent_failure
            ),
            p.success,
        ),
        stat(
            "Hook success",
            format!(
                "{} ({} / {})",
                format_rate(overview.hook_success_rate()),
                overview.hook_success,
                overview.hook_failure
            ),
            p.success,
        ),
    ]
    .spacing(12);

    column![first, second].spacing(12).into()
}

fn stat<'a>(label: &'a str, value: String, color: Color) -> Element<'a, Message> {
    let p = palette::current();
    container(
        column![
            text(label).size(12).color(p.text_secondary),
            text(value).size(20).font(BOLD).color(color),
        ]
        .spacing(6),
    )
    .padding(16)
    .width(Length::FillPortion(1))
    .style(card_style)
    .into()
}

/// Vertical bars, one per point, scaled to the busiest hour.
fn view_chart(series: &[TimeSeriesPoint], color: Color) -> Element<'_, Message> {
    let p = palette::current();
    if series.is_empty() {
        return text("No data yet").size(13).color(p.text_muted).into();
    }

    let peak = series.iter().map(|point| point.value).max().unwrap_or(0);
    let bars = bar_heights(series, CHART_HEIGHT)
        .into_iter()
        .map(|height| {
            container(Space::new().width(Length::Fill).height(height.max(1.0)))
                .width(Length::Fill)
                .style(move |_theme| iced::widget::container::Style {
                    background: Some(Background::Color(color)),
                    border: Border {
                        radius: radius::SMALL.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .into()
        });

    let first = series.first().map_or(0, |point| point.timestamp);
    let last = series.last().map_or(0, |point| point.timestamp);

    column![
        row![
            text(format!("peak {peak}")).size(11).color(p.text_muted),
            Space::new().width(Length::Fill),
        ],
        container(Row::with_children(bars).spacing(2).align_y(Alignment::End))
            .height(CHART_HEIGHT)
            .align_bottom(CHART_HEIGHT),
        row![
            text(super::common::format_time(first)).size(11).color(p.text_muted),
            Space::new().width(Length::Fill),
            text(super::common::format_time(last)).size(11).color(p.text_muted),
        ],
    ]
    .spacing(6)
    .into()
}
