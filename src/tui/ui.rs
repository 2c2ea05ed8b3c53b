//! Main UI rendering coordinator.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::chart::candles::format_price;
use crate::chart::surface::{DrawList, Rgba};
use crate::controller::LoadState;
use crate::tui::app::App;
use crate::tui::canvas::{chart_canvas, pane_size};
use crate::tui::components::{status_bar, symbol_bar};

fn to_color(color: Rgba) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Renders the entire application UI.
///
/// Scales are rebuilt from the current pane sizes on every call, so a
/// terminal resize redraws correctly without extra bookkeeping.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Main vertical layout
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Symbol bar
            Constraint::Length(1),      // Status bar
            Constraint::Length(1),      // Ticker header
            Constraint::Min(8),         // Price pane
            Constraint::Percentage(25), // Volume pane
            Constraint::Length(1),      // Keybindings help
        ])
        .split(area);

    symbol_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);
    render_ticker_header(frame, main_layout[2], app);
    render_chart(frame, main_layout[3], main_layout[4], app);
    render_keybindings(frame, main_layout[5]);
}

/// Renders the ticker header with 24h statistics.
fn render_ticker_header(frame: &mut Frame, area: Rect, app: &App) {
    let symbol = app.current_symbol();

    let content = if let Some(t) = app.controller.ticker() {
        let change_color = if t.is_up() { Color::Green } else { Color::Red };
        let (arrow, sign) = if t.is_up() { ("▲", "+") } else { ("▼", "") };

        Line::from(vec![
            Span::styled(
                format!(" {} ", symbol),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(arrow, Style::default().fg(change_color)),
            Span::styled(
                format!(" {} ", format_price(t.last_price)),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{sign}{} ({:+.2}%) ", format_price(t.change), t.change_percent),
                Style::default().fg(change_color),
            ),
            Span::raw("H: "),
            Span::styled(format!("{} ", format_price(t.high_24h)), Style::default().fg(Color::Green)),
            Span::raw("L: "),
            Span::styled(format!("{} ", format_price(t.low_24h)), Style::default().fg(Color::Red)),
            Span::raw("Vol: "),
            Span::styled(format!("{:.2}", t.volume_24h), Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                format!(" {} ", symbol),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(" -- ", Style::default().fg(Color::DarkGray)),
        ])
    };

    let para = Paragraph::new(content).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// Renders the price and volume panes from one frozen frame.
fn render_chart(frame: &mut Frame, price_area: Rect, volume_area: Rect, app: &App) {
    let style = &app.style;
    let key = app.controller.key();

    let mut title = vec![Span::raw(format!(" {} · {} ", key.symbol, key.timeframe))];
    for (period, series) in app.controller.moving_averages() {
        if series.is_empty() {
            continue;
        }
        title.push(Span::styled(
            format!("SMA{period} "),
            Style::default().fg(to_color(style.overlay_color(*period))),
        ));
    }

    let border = Style::default().fg(Color::DarkGray);
    let price_block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(border);
    let volume_block = Block::default()
        .title(" Volume ")
        .borders(Borders::ALL)
        .border_style(border);

    let price_inner = price_block.inner(price_area);
    let volume_inner = volume_block.inner(volume_area);
    frame.render_widget(price_block, price_area);
    frame.render_widget(volume_block, volume_area);

    if app.controller.window().is_empty() {
        let message = match app.controller.state() {
            LoadState::Idle | LoadState::Loading => "Loading...",
            LoadState::Ready | LoadState::Degraded => "No data",
        };
        let para = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(para, price_inner);
        return;
    }

    let price_size = pane_size(price_inner);
    let volume_size = pane_size(volume_inner);
    let mut price_list = DrawList::new(price_size);
    let mut volume_list = DrawList::new(volume_size);

    app.controller
        .frame(price_size, volume_size, style)
        .render(style, &mut price_list, &mut volume_list);

    frame.render_widget(chart_canvas(&price_list, style.background), price_inner);
    frame.render_widget(chart_canvas(&volume_list, style.background), volume_inner);
}

/// Renders the keybindings help line.
fn render_keybindings(frame: &mut Frame, area: Rect) {
    let help = "[1-6]timeframe [ [ / ] ]timeframe [h/l/Tab]symbol [r]efresh [q]quit";

    let para = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
