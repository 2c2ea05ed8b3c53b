//! Symbol and timeframe selector bar.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::models::Timeframe;
use crate::tui::app::App;

fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Renders the symbol list followed by the timeframe list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();

    for (i, symbol) in app.symbols.iter().enumerate() {
        let style = if i == app.symbol_index {
            selected()
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!(" {symbol} "), style));
        spans.push(Span::raw(" "));
    }

    spans.push(Span::raw("│ "));

    for timeframe in Timeframe::ALL {
        let style = if timeframe == app.timeframe() {
            selected()
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {timeframe} "), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
