//! Dashboard command - interactive terminal view over the fetch-and-classify cycle

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use news_verdict_domain::{SearchUpdate, usecases::Dashboard};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use std::time::Duration;

use crate::args::DashboardArgs;
use crate::commands::classify::build_classifier;
use crate::commands::headlines::build_news_source;
use crate::config::{AppConfig, non_empty};
use crate::ui::{self, InputMode, ViewState};

const TICK: Duration = Duration::from_millis(150);

pub async fn execute(args: DashboardArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let params = config.initial_params()?.merged(SearchUpdate {
        query: args.query,
        category: args.category,
        country: args.country.as_deref().map(|c| non_empty(Some(c))),
        ..Default::default()
    });

    let source = build_news_source(&config)?;
    let classifier = build_classifier(&config)?;
    let dashboard = Dashboard::new(source, classifier, config.enrich_config(), params);

    tracing::info!("Starting dashboard");

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, App::new(dashboard)).await;
    ratatui::restore();

    tracing::info!("Dashboard closed");
    result
}

async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    app.dashboard.mount();

    loop {
        let size = terminal.size().context("Failed to read terminal size")?;
        app.view.columns = ui::grid_columns(size.width);
        terminal
            .draw(|frame| ui::render(frame, app.dashboard.state(), &app.view))
            .context("Failed to draw dashboard")?;

        tokio::select! {
            changed = app.dashboard.next_update() => {
                if changed {
                    app.clamp_selection();
                }
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key) == Flow::Quit {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                None => break,
            },
            _ = tick.tick() => {
                if app.dashboard.state().loading {
                    app.view.spinner_frame = app.view.spinner_frame.wrapping_add(1);
                }
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    dashboard: Dashboard,
    view: ViewState,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            view: ViewState::default(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.view.mode {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Search | InputMode::Filter => {
                self.handle_input_key(key.code);
                Flow::Continue
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Flow {
        let params = &self.dashboard.state().params;

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('/') => {
                self.view.input = params.query.clone();
                self.view.mode = InputMode::Search;
            }
            KeyCode::Char('f') => {
                self.view.input = self.dashboard.state().label_filter.clone();
                self.view.mode = InputMode::Filter;
            }
            KeyCode::Char('c') => {
                let category = params.next_category();
                self.reload_with(SearchUpdate {
                    category: Some(category),
                    page: Some(1),
                    ..Default::default()
                });
            }
            KeyCode::Char('s') => {
                let sort_by = params.sort_by.next();
                self.reload_with(SearchUpdate {
                    sort_by: Some(sort_by),
                    ..Default::default()
                });
            }
            KeyCode::Char('n') => {
                let page = params.page.saturating_add(1);
                self.reload_with(SearchUpdate {
                    page: Some(page),
                    ..Default::default()
                });
            }
            KeyCode::Char('p') if params.page > 1 => {
                let page = params.page - 1;
                self.reload_with(SearchUpdate {
                    page: Some(page),
                    ..Default::default()
                });
            }
            KeyCode::Char('r') => self.dashboard.refresh(),
            KeyCode::Char('t') => self.view.dark = !self.view.dark,
            KeyCode::Right | KeyCode::Char('l') => self.move_selection(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(self.view.columns as isize),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-(self.view.columns as isize)),
            _ => {}
        }

        Flow::Continue
    }

    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.view.input.push(c),
            KeyCode::Backspace => {
                self.view.input.pop();
            }
            KeyCode::Esc => {
                self.view.input.clear();
                self.view.mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.view.input);
                match self.view.mode {
                    InputMode::Search => self.dashboard.search(input.trim()),
                    InputMode::Filter => self.dashboard.set_label_filter(input.trim()),
                    InputMode::Normal => {}
                }
                self.view.mode = InputMode::Normal;
                self.view.selected = 0;
            }
            _ => {}
        }
    }

    fn reload_with(&mut self, update: SearchUpdate) {
        self.dashboard.change_filter(update);
        self.view.selected = 0;
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.dashboard.state().visible_articles().len();
        if count == 0 {
            self.view.selected = 0;
            return;
        }
        let target = self.view.selected as isize + delta;
        if (0..count as isize).contains(&target) {
            self.view.selected = target as usize;
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.dashboard.state().visible_articles().len();
        self.view.selected = self.view.selected.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_verdict_adapters::{StubClassifier, StubNewsSource};
    use news_verdict_domain::{SearchParams, SortBy, usecases::EnrichConfig};
    use std::sync::Arc;

    fn app() -> App {
        let dashboard = Dashboard::new(
            Arc::new(StubNewsSource::sample()),
            Arc::new(StubClassifier::heuristic()),
            EnrichConfig::default(),
            SearchParams::default(),
        );
        App::new(dashboard)
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn test_search_mode_submits_query() {
        let mut app = app();
        app.dashboard.mount();
        app.dashboard.settle().await;
        let all = app.dashboard.state().articles.len();

        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.view.mode, InputMode::Search);
        type_text(&mut app, "qx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.view.mode, InputMode::Normal);
        assert_eq!(app.dashboard.state().params.query, "q");
        assert!(app.dashboard.state().loading);
        app.dashboard.settle().await;
        assert!(app.dashboard.state().articles.len() <= all);
    }

    #[tokio::test]
    async fn test_escape_cancels_input_without_fetching() {
        let mut app = app();

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "ignored");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.view.mode, InputMode::Normal);
        assert!(app.dashboard.state().params.query.is_empty());
        assert!(!app.dashboard.state().loading);
    }

    #[tokio::test]
    async fn test_filter_keys_change_params() {
        let mut app = app();

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.dashboard.state().params.category, "business");
        assert!(app.dashboard.state().loading);

        press(&mut app, KeyCode::Char('s'));
        assert_ne!(app.dashboard.state().params.sort_by, SortBy::PublishedAt);

        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.dashboard.state().params.page, 1);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.dashboard.state().params.page, 2);

        app.dashboard.settle().await;
        assert!(!app.dashboard.state().loading);
    }

    #[tokio::test]
    async fn test_label_filter_is_local() {
        let mut app = app();
        app.dashboard.mount();
        app.dashboard.settle().await;

        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.view.mode, InputMode::Filter);
        type_text(&mut app, "zzz-no-match");
        press(&mut app, KeyCode::Enter);

        assert!(!app.dashboard.state().loading);
        assert_eq!(app.dashboard.state().label_filter, "zzz-no-match");
        assert!(app.dashboard.state().visible_articles().is_empty());
    }

    #[tokio::test]
    async fn test_selection_stays_in_bounds() {
        let mut app = app();
        app.dashboard.mount();
        app.dashboard.settle().await;
        let count = app.dashboard.state().visible_articles().len();

        press(&mut app, KeyCode::Left);
        assert_eq!(app.view.selected, 0);

        for _ in 0..count + 3 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.view.selected, count - 1);
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('t')), Flow::Continue);
        assert!(!app.view.dark);

        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Flow::Quit
        );
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
