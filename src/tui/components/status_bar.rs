//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::controller::{FeedStatus, LoadState};
use crate::tui::app::App;

/// Renders load state, feed health, data quality and any error.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let controller = &app.controller;

    let state_color = match controller.state() {
        LoadState::Ready => Color::Green,
        LoadState::Loading | LoadState::Idle => Color::Yellow,
        LoadState::Degraded => Color::Red,
    };
    let status_color = match controller.status() {
        FeedStatus::Online => Color::Green,
        FeedStatus::Offline => Color::Red,
    };

    let quality = controller.quality();
    let quality_span = if quality.dropped() > 0 {
        Span::styled(
            format!(" {} dropped ", quality.dropped()),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled(" clean ", Style::default().fg(Color::Gray))
    };

    let error_span = if let Some(ref error) = app.error_message {
        Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        )
    } else {
        Span::raw("")
    };

    let updated = app
        .last_update
        .map(|at| format!(" {}s ago ", at.elapsed().as_secs()))
        .unwrap_or_else(|| " never ".to_string());

    let bars_info = format!(
        " {}/{} bars ",
        controller.window().len(),
        controller.capacity()
    );

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", controller.state().label()),
            Style::default().fg(state_color),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" {} ", controller.status().label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        quality_span,
        Span::raw("│"),
        Span::styled(updated, Style::default().fg(Color::Gray)),
        Span::raw("│"),
        error_span,
        Span::raw(format!(
            "{:>width$}",
            bars_info,
            width = area.width.saturating_sub(60) as usize
        )),
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}
