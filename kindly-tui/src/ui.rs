use kindly_core::{CATEGORY_OPTIONS, CategoryId, ResultDisplay, ResultViewModel, Route};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use crate::app::App;
use crate::pages::{page_body, page_title};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: navigation, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    draw_header(frame, app, *header_area);

    let view = app.view_model();
    match app.route() {
        Route::Services => draw_services(frame, app, view.as_ref(), *content_area),
        Route::Offers => draw_results(
            frame,
            app,
            view.as_ref(),
            page_title(Route::Offers),
            *content_area,
        ),
        route @ (Route::Home | Route::AboutUs | Route::Contact) => {
            draw_page(frame, route, *content_area);
        }
    }

    draw_status(frame, app, view.as_ref(), *status_area);
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let titles = Route::ALL
        .iter()
        .map(|route| route.title())
        .collect::<Vec<_>>();
    let selected = Route::ALL
        .iter()
        .position(|route| *route == app.route())
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Kindly"))
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_page(frame: &mut Frame<'_>, route: Route, area: Rect) {
    let paragraph = Paragraph::new(page_body(route))
        .block(Block::default().borders(Borders::ALL).title(page_title(route)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_services(frame: &mut Frame<'_>, app: &App, view: Option<&ResultViewModel>, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // intro
            Constraint::Length(3), // selector
            Constraint::Min(0),    // results
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [intro_area, selector_area, results_area] = chunks else {
        return;
    };

    let intro = Paragraph::new(page_body(Route::Services))
        .block(Block::default().borders(Borders::ALL).title(page_title(Route::Services)))
        .wrap(Wrap { trim: true });
    frame.render_widget(intro, *intro_area);

    let labels = CATEGORY_OPTIONS
        .iter()
        .enumerate()
        .map(|(idx, option)| format!("[{}] {}", idx + 1, option.label))
        .collect::<Vec<_>>();
    let selector = Tabs::new(labels)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Choose care (1-3 or ←/→ + Enter)"),
        )
        .select(app.selector_index)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(selector, *selector_area);

    draw_results(frame, app, view, "Providers", *results_area);
}

fn draw_results(
    frame: &mut Frame<'_>,
    app: &App,
    view: Option<&ResultViewModel>,
    heading: &str,
    area: Rect,
) {
    let title = match view.and_then(|model| model.category) {
        Some(category) => format!("{heading} · {} (↑/↓)", category.label()),
        None => heading.to_owned(),
    };

    let (items, has_rows) = match view.map(|model| &model.display) {
        Some(ResultDisplay::Entries(rows)) => {
            let items = rows
                .iter()
                .map(|row| {
                    let mut lines = vec![Line::from(row.title.clone())];
                    if let Some(detail) = &row.detail {
                        lines.push(Line::from(Span::styled(
                            format!("  {detail}"),
                            Style::default().fg(Color::Gray),
                        )));
                    }
                    ListItem::new(lines)
                })
                .collect::<Vec<_>>();
            (items, true)
        }
        Some(ResultDisplay::NoResults) | None => {
            (vec![ListItem::new("No providers to show.")], false)
        }
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if has_rows {
        state.select(Some(app.result_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame<'_>, app: &App, view: Option<&ResultViewModel>, area: Rect) {
    let nav_hint = match app.route() {
        Route::Services => "1/2/3 pick care · ↑/↓ scroll · Tab next page · q/Ctrl-C quit",
        Route::Offers => "↑/↓ scroll · r reload · Tab next page · q/Ctrl-C quit",
        Route::Home | Route::AboutUs | Route::Contact => {
            "Tab/Shift-Tab switch page · Enter next page · q/Ctrl-C quit"
        }
    };

    let pending = view.and_then(|model| model.pending);
    let failure = view.and_then(|model| model.failure.as_deref());

    let status_text = status_line(app.notice.as_deref(), pending, failure, nav_hint);

    let status_style = if app.notice.is_some() || failure.is_some() {
        Style::default().fg(Color::Red)
    } else if pending.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, area);
}

/// A notice replaces everything else. A failure stays visible while a retry loads.
fn status_line(
    notice: Option<&str>,
    pending: Option<CategoryId>,
    failure: Option<&str>,
    nav_hint: &str,
) -> String {
    if let Some(notice) = notice {
        return format!("{notice} · {nav_hint}");
    }

    let mut parts = Vec::with_capacity(3);
    if let Some(category) = pending {
        parts.push(format!("Loading {}…", category.label().to_lowercase()));
    }
    if let Some(msg) = failure {
        parts.push(msg.to_owned());
    }
    parts.push(nav_hint.to_owned());
    parts.join(" · ")
}
