//! Terminal views for the dashboard: header, search bar, filter bar and card grid

use news_verdict_domain::{Article, Verdict, usecases::DashboardState};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use time::macros::format_description;

const CARD_HEIGHT: u16 = 9;
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Which text field, if any, receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    Filter,
}

/// View-only state that the domain does not care about
#[derive(Debug, Clone)]
pub struct ViewState {
    pub mode: InputMode,
    /// Text being edited in Search or Filter mode
    pub input: String,
    /// Index into the visible articles
    pub selected: usize,
    /// Cards per row, from the last known terminal width
    pub columns: usize,
    pub dark: bool,
    pub spinner_frame: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: InputMode::Normal,
            input: String::new(),
            selected: 0,
            columns: 3,
            dark: true,
            spinner_frame: 0,
        }
    }
}

struct Theme {
    base: Style,
    muted: Style,
    accent: Style,
    link: Style,
    error: Style,
}

impl Theme {
    fn new(dark: bool) -> Self {
        if dark {
            Self {
                base: Style::default().fg(Color::White).bg(Color::Black),
                muted: Style::default().fg(Color::Gray),
                accent: Style::default().fg(Color::Cyan),
                link: Style::default().fg(Color::LightBlue),
                error: Style::default().fg(Color::LightRed),
            }
        } else {
            Self {
                base: Style::default().fg(Color::Black).bg(Color::White),
                muted: Style::default().fg(Color::DarkGray),
                accent: Style::default().fg(Color::Blue),
                link: Style::default().fg(Color::Blue),
                error: Style::default().fg(Color::Red),
            }
        }
    }
}

/// Cards per row for a terminal width
pub fn grid_columns(width: u16) -> usize {
    match width {
        w if w >= 120 => 3,
        w if w >= 80 => 2,
        _ => 1,
    }
}

/// "Fake News · 87% confidence" style summary, when the article is classified
pub fn verdict_line(article: &Article) -> Option<String> {
    let label = match article.verdict() {
        Verdict::Unclassified => return None,
        verdict => verdict.label(),
    };

    match article.confidence.filter(|c| *c != 0.0) {
        Some(confidence) => Some(format!("{} · {}% confidence", label, confidence)),
        None => Some(label.to_string()),
    }
}

pub fn render(frame: &mut Frame, state: &DashboardState, view: &ViewState) {
    let theme = Theme::new(view.dark);
    frame.render_widget(Block::default().style(theme.base), frame.area());

    let [header, search, filters, heading, status, grid] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(frame.area());

    render_header(frame, header, view, &theme);
    render_search_bar(frame, search, state, view, &theme);
    render_filter_bar(frame, filters, state, view, &theme);

    frame.render_widget(
        Paragraph::new(Line::from("Today's Headlines").style(Style::default().add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        heading,
    );

    render_status(frame, status, state, view, &theme);
    render_grid(frame, grid, state, view, &theme);
}

fn render_header(frame: &mut Frame, area: Rect, view: &ViewState, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).border_style(theme.muted);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [title, toggle] = Layout::horizontal([Constraint::Min(0), Constraint::Length(22)]).areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "FAKE NEWS DETECTOR",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        title,
    );

    let mode = if view.dark { "dark" } else { "light" };
    frame.render_widget(
        Paragraph::new(Span::styled(format!("[t] theme: {}", mode), theme.muted))
            .alignment(Alignment::Right),
        toggle,
    );
}

fn render_search_bar(
    frame: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &ViewState,
    theme: &Theme,
) {
    let editing = view.mode == InputMode::Search;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search ")
        .border_style(if editing { theme.accent } else { theme.muted });
    let inner = block.inner(area);

    let content = if editing {
        Line::from(view.input.as_str())
    } else if state.params.query.is_empty() {
        Line::from(Span::styled("Press / to search news...", theme.muted))
    } else {
        Line::from(state.params.query.as_str())
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if editing {
        let x = inner.x + (view.input.chars().count() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((x, inner.y));
    }
}

fn render_filter_bar(
    frame: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &ViewState,
    theme: &Theme,
) {
    let params = &state.params;
    let category = if params.category.is_empty() {
        "all"
    } else {
        params.category.as_str()
    };
    let label = if view.mode == InputMode::Filter {
        format!("{}_", view.input)
    } else if state.label_filter.is_empty() {
        "-".to_string()
    } else {
        state.label_filter.clone()
    };

    let mut spans = vec![
        Span::styled("[c] ", theme.muted),
        Span::raw(format!("category: {}  ", category)),
        Span::styled("[s] ", theme.muted),
        Span::raw(format!("sort: {}  ", params.sort_by)),
        Span::styled("[n/p] ", theme.muted),
        Span::raw(format!("page: {}  ", params.page)),
        Span::styled("[f] ", theme.muted),
        Span::styled(
            format!("filter: {}", label),
            if view.mode == InputMode::Filter {
                theme.accent
            } else {
                Style::default()
            },
        ),
    ];
    if let Some(ref country) = params.country {
        spans.push(Span::raw(format!("  country: {}", country)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &ViewState,
    theme: &Theme,
) {
    let line = if state.loading {
        let spin = SPINNER[view.spinner_frame % SPINNER.len()];
        Line::from(Span::styled(format!("{} Loading...", spin), theme.accent))
    } else if let Some(ref error) = state.error {
        Line::from(Span::styled(error.as_str(), theme.error))
    } else if !state.label_filter.is_empty() {
        Line::from(Span::styled(
            format!(
                "showing {} of {} articles",
                state.visible_articles().len(),
                state.articles.len()
            ),
            theme.muted,
        ))
    } else {
        Line::from(Span::styled(
            format!("{} articles", state.articles.len()),
            theme.muted,
        ))
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    state: &DashboardState,
    view: &ViewState,
    theme: &Theme,
) {
    let articles = state.visible_articles();
    if articles.is_empty() {
        if !state.loading {
            frame.render_widget(
                Paragraph::new(Span::styled("No articles to show.", theme.muted))
                    .alignment(Alignment::Center),
                area,
            );
        }
        return;
    }

    let columns = grid_columns(area.width);
    let rows_visible = (area.height / CARD_HEIGHT).max(1) as usize;
    let selected = view.selected.min(articles.len() - 1);
    let first_row = (selected / columns).saturating_sub(rows_visible - 1);

    for row in 0..rows_visible {
        let y = area.y + row as u16 * CARD_HEIGHT;
        if y >= area.bottom() {
            break;
        }
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: CARD_HEIGHT.min(area.bottom() - y),
        };
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_area);

        for (column, cell) in cells.iter().enumerate() {
            let index = (first_row + row) * columns + column;
            let Some(article) = articles.get(index) else {
                return;
            };
            frame.render_widget(card(article, index == selected, theme), *cell);
        }
    }
}

fn card<'a>(article: &'a Article, selected: bool, theme: &Theme) -> Paragraph<'a> {
    let mut lines = vec![Line::from(Span::styled(
        article.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    if let Some(ref description) = article.description {
        lines.push(Line::from(Span::styled(description.as_str(), theme.muted)));
    }

    if let Some(ref image) = article.url_to_image {
        lines.push(Line::from(Span::styled(
            format!("image: {}", image),
            theme.muted.add_modifier(Modifier::DIM),
        )));
    }

    if let Some(is_fake) = article.is_fake {
        let badge = if is_fake {
            Span::styled(
                " Fake News ",
                Style::default().fg(Color::White).bg(Color::Red),
            )
        } else {
            Span::styled(
                " Real News ",
                Style::default().fg(Color::Black).bg(Color::Green),
            )
        };
        let mut badge_line = vec![badge];
        if let Some(confidence) = article.confidence.filter(|c| *c != 0.0) {
            badge_line.push(Span::styled(
                format!(" {}% confidence", confidence),
                theme.muted,
            ));
        }
        lines.push(Line::from(badge_line));
    }

    lines.push(Line::from(Span::styled(
        format!("Read more → {}", article.url),
        theme.link,
    )));

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(if selected { theme.accent } else { theme.muted });
    if let Some(subtitle) = card_subtitle(article) {
        block = block.title(subtitle);
    }

    Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
}

fn card_subtitle(article: &Article) -> Option<String> {
    let date = article.published().and_then(|t| {
        t.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
            .ok()
    });

    match (article.source.name.is_empty(), date) {
        (true, None) => None,
        (true, Some(date)) => Some(format!(" {} ", date)),
        (false, None) => Some(format!(" {} ", article.source.name)),
        (false, Some(date)) => Some(format!(" {} · {} ", article.source.name, date)),
    }
}
