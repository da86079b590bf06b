mod map;
mod outline;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ViewState};
use crate::chart::ChartWidget;
use crate::error::DashboardError;
use crate::router::Route;
use crate::views::View;

use map::MapWidget;
use outline::OutlinePanel;

/// Width of the outline panel beside the country chart
const OUTLINE_PANEL_WIDTH: u16 = 32;

const SPINNER: [char; 4] = ['⠋', '⠙', '⠸', '⠴'];

/// Screen regions shared by drawing and mouse hit-testing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Screen {
    pub header: Rect,
    pub body: Rect,
    /// Body without its border
    pub inner: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> Screen {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Route tabs
            Constraint::Min(3),    // View
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    Screen {
        header: chunks[0],
        body: chunks[1],
        inner: Block::default().borders(Borders::ALL).inner(chunks[1]),
        status: chunks[2],
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let screen = layout(frame.area());
    render_header(frame, app, screen.header);
    render_body(frame, app, screen.body);
    render_status_bar(frame, app, screen.status);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.state.route().map(Route::name);
    let mut spans = vec![Span::styled(" popmap ", Style::default().fg(Color::Black).bg(Color::Cyan))];
    for name in Route::NAMES {
        let style = if Some(name) == current {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {name} "), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if let Some(hash) = app.router.current_hash() {
        frame.render_widget(
            Paragraph::new(Span::styled(hash, Style::default().fg(Color::Cyan))).alignment(Alignment::Right),
            area,
        );
    }
}

fn body_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    match &app.state {
        ViewState::Blank { .. } => {
            frame.render_widget(body_block(String::new(), Color::DarkGray), area);
        }
        ViewState::Loading { route, since } => {
            let block = body_block(route.to_hash(), Color::Cyan);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let frame_idx = (since.elapsed().as_millis() / 120) as usize % SPINNER.len();
            let text = format!("{} Loading {}", SPINNER[frame_idx], route.name());
            frame.render_widget(
                Paragraph::new(text).alignment(Alignment::Center),
                centered(inner, inner.width, 1),
            );
        }
        ViewState::Failed { route, error } => {
            let block = body_block(route.to_hash(), Color::Red);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_fallback(frame, error, inner);
        }
        ViewState::Ready { route, view } => {
            let block = body_block(route.to_hash(), Color::Cyan);
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_view(frame, app, view, inner);
        }
    }
}

fn render_view(frame: &mut Frame, app: &App, view: &View, area: Rect) {
    match view {
        View::Map(map) => {
            // Braille gives 2x4 resolution per character
            let mut viewport = app.viewport.clone();
            viewport.width = area.width as usize * 2;
            viewport.height = area.height as usize * 4;
            let widget = MapWidget {
                view: map,
                viewport,
                hovered: app.hovered_country(),
                cursor: app.mouse_pos.filter(|&(c, r)| area.contains((c, r).into())),
                show_borders: app.show_borders,
            };
            frame.render_widget(widget, area);
        }
        View::Country(country) => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(24), Constraint::Length(OUTLINE_PANEL_WIDTH)])
                .split(area);
            frame.render_widget(ChartWidget::new(&country.chart).hover(app.mouse_pos), chunks[0]);
            frame.render_widget(OutlinePanel { view: country }, chunks[1]);
        }
        View::World(_) | View::GrowthRate(_) | View::VitalRates(_) => {
            if let Some(chart) = view.chart() {
                frame.render_widget(ChartWidget::new(chart).hover(app.mouse_pos), area);
            }
        }
    }
}

/// Visible panel for a failed load: title, message and what to try
fn render_fallback(frame: &mut Frame, error: &DashboardError, area: Rect) {
    let rect = centered(area, area.width.min(72), area.height.min(8));
    let lines = vec![
        Line::from(Span::styled(error.to_string(), Style::default().fg(Color::White))),
        Line::default(),
        Line::from(Span::styled(error.hint(), Style::default().fg(Color::DarkGray))),
    ];
    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(Span::styled(
                format!(" {} ", error.title()),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(panel, rect);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);

    if let Some(prompt) = &app.prompt {
        let line = Line::from(vec![
            Span::styled(" Go to: ", Style::default().fg(Color::Yellow)),
            Span::raw(prompt.as_str()),
            Span::styled("█", Style::default().fg(Color::Yellow)),
            Span::styled("  enter:go esc:cancel", hint),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();
    match &app.state {
        ViewState::Blank { hash } if !hash.is_empty() => {
            spans.push(Span::styled(format!(" Unknown route: {hash} "), Style::default().fg(Color::Red)));
        }
        ViewState::Ready { view: View::Map(_), .. } => {
            spans.push(Span::styled(" Zoom: ", hint));
            spans.push(Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)));
            spans.push(Span::styled(" | ", hint));
            spans.push(Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(" ", hint));
            spans.push(Span::styled(
                if app.show_borders { "[O]utlines " } else { "[o]utlines " },
                Style::default().fg(if app.show_borders { Color::Green } else { Color::DarkGray }),
            ));
            spans.push(Span::styled("| hjkl:pan +/-:zoom click:open 0:reset ", hint));
        }
        ViewState::Failed { .. } => {
            spans.push(Span::styled(" F5:retry ", Style::default().fg(Color::Red)));
        }
        _ => {}
    }
    spans.push(Span::styled(nav_hints(app), hint));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn nav_hints(app: &App) -> String {
    let back = if app.router.can_go_back() { " ⌫:back" } else { "" };
    format!("| m:map w:world r:rate c:country b:births{back} ':':route q:quit")
}

/// A `width` x `height` rect in the middle of `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_regions() {
        let screen = layout(Rect::new(0, 0, 100, 40));
        assert_eq!(screen.header, Rect::new(0, 0, 100, 1));
        assert_eq!(screen.body, Rect::new(0, 1, 100, 38));
        assert_eq!(screen.inner, Rect::new(1, 2, 98, 36));
        assert_eq!(screen.status, Rect::new(0, 39, 100, 1));
    }

    #[test]
    fn test_centered() {
        assert_eq!(centered(Rect::new(10, 10, 20, 10), 10, 4), Rect::new(15, 13, 10, 4));
        assert_eq!(centered(Rect::new(0, 0, 5, 5), 10, 10), Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn test_back_hint_only_with_history() {
        use crate::config::Settings;
        use crate::loader::Loader;
        use crate::source::memory::MemorySource;
        use std::sync::Arc;

        let loader = Loader::new(Arc::new(MemorySource::default()), Settings::default());
        let mut app = App::new(loader, 80, 24);
        app.navigate("#world");
        assert!(!nav_hints(&app).contains("back"));
        app.navigate("#map");
        assert!(nav_hints(&app).contains("⌫:back"));
        app.back();
        assert!(!nav_hints(&app).contains("back"));
    }

    #[test]
    fn test_fallback_panel_names_the_error() {
        let mut terminal = ratatui::Terminal::new(ratatui::backend::TestBackend::new(80, 10)).unwrap();
        let error = DashboardError::not_found("Atlantis", "population_total.csv");
        terminal
            .draw(|frame| render_fallback(frame, &error, frame.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Country not found"));
        assert!(text.contains("Atlantis"));
    }
}
