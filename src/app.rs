use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use log::{error, info, warn};
use ratatui::prelude::*;
use ratatui::widgets::Tabs;
use tokio::sync::mpsc;

use crate::cli::{Cli, ViewConfig};
use crate::components::detail_popup::DetailPopup;
use crate::components::filter_bar::FilterBar;
use crate::components::help_popup::HelpPopup;
use crate::components::list_page::{ListPage, Page};
use crate::components::status_bar::StatusBar;
use crate::components::Component;
use crate::event::{spawn_event_reader, to_input, Action, AppMessage, Input};
use crate::loader::DataProvider;
use crate::model::entities::{Account, Automation, Client, RecurringJob, Reminder};
use crate::ui::layout::{AppLayout, PageLayout};
use crate::ui::theme::Theme;
use crate::ui::{Focus, Tab};

struct App {
    /// One page per tab, in `Tab::ALL` order.
    pages: Vec<Box<dyn Page>>,
    filter_bar: FilterBar,
    status_bar: StatusBar,
    help_popup: HelpPopup,
    detail_popup: DetailPopup,
    active_tab: Tab,
    focus: Focus,
    provider: Arc<dyn DataProvider>,
}

impl App {
    fn new(provider: Arc<dyn DataProvider>, view: &ViewConfig) -> Self {
        let page_size = view.page_size;
        let pages: Vec<Box<dyn Page>> = vec![
            Box::new(ListPage::<Account>::new(page_size)),
            Box::new(ListPage::<Client>::new(page_size)),
            Box::new(ListPage::<Automation>::new(page_size)),
            Box::new(ListPage::<RecurringJob>::new(page_size)),
            Box::new(ListPage::<Reminder>::new(page_size)),
        ];
        Self {
            pages,
            filter_bar: FilterBar::new(),
            status_bar: StatusBar::new(),
            help_popup: HelpPopup::new(),
            detail_popup: DetailPopup::new(),
            active_tab: view.tab,
            focus: Focus::Table,
            provider,
        }
    }

    fn page(&self) -> &dyn Page {
        self.pages[self.active_tab.index()].as_ref()
    }

    fn page_mut(&mut self) -> &mut dyn Page {
        self.pages[self.active_tab.index()].as_mut()
    }

    fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        self.focus = Focus::Table;
        self.filter_bar
            .set_applied(self.pages[tab.index()].filter_text());
    }

    fn draw(&mut self, frame: &mut Frame) {
        let status = self.page().status();
        let filtered = self.page().filter_text().is_some();
        self.status_bar.set_page(status, filtered);

        let layout = AppLayout::new(frame.area());

        let tab_titles: Vec<Line> = Tab::ALL
            .iter()
            .map(|t| {
                if *t == self.active_tab {
                    Line::styled(t.label(), Theme::tab_active())
                } else {
                    Line::styled(t.label(), Theme::tab_inactive())
                }
            })
            .collect();

        let tabs = Tabs::new(tab_titles)
            .select(self.active_tab.index())
            .divider(" │ ")
            .style(Theme::tab_bar_bg());

        frame.render_widget(tabs, layout.tab_bar);

        let page_layout = PageLayout::new(layout.content);
        self.filter_bar.render(
            frame,
            page_layout.filter_bar,
            self.focus == Focus::FilterBar,
        );
        let table_focused = self.focus == Focus::Table;
        self.page_mut()
            .render(frame, page_layout.table, table_focused);

        self.status_bar.render(frame, layout.status_bar, false);

        self.detail_popup.render(frame, frame.area(), true);
        self.help_popup.render(frame, frame.area(), true);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.status_bar.handle_key(key);

        if self.help_popup.visible {
            return self.help_popup.handle_key(key);
        }

        if self.detail_popup.is_visible() {
            return self.detail_popup.handle_key(key);
        }

        if self.filter_bar.is_input_mode() {
            let action = self.filter_bar.handle_key(key);
            if !self.filter_bar.is_input_mode() {
                self.focus = Focus::Table;
            }
            return action;
        }

        match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => return Some(Action::ToggleHelp),
            KeyCode::Char('1') => return Some(Action::SwitchTab(0)),
            KeyCode::Char('2') => return Some(Action::SwitchTab(1)),
            KeyCode::Char('3') => return Some(Action::SwitchTab(2)),
            KeyCode::Char('4') => return Some(Action::SwitchTab(3)),
            KeyCode::Char('5') => return Some(Action::SwitchTab(4)),
            KeyCode::Tab => return Some(Action::NextTab),
            KeyCode::BackTab => return Some(Action::PrevTab),
            KeyCode::Char('/') => return Some(Action::FocusFilter),
            KeyCode::Char('r') => return Some(Action::Reload),
            _ => {}
        }

        self.page_mut().handle_key(key)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        if self.help_popup.visible
            || self.detail_popup.is_visible()
            || self.filter_bar.is_input_mode()
        {
            return None;
        }
        self.page_mut().handle_mouse(mouse)
    }

    fn handle_action(&mut self, action: Action, msg_tx: &mpsc::UnboundedSender<AppMessage>) -> bool {
        match action {
            Action::Quit => return true,
            Action::SwitchTab(idx) => {
                if let Some(tab) = Tab::from_index(idx) {
                    self.select_tab(tab);
                }
            }
            Action::NextTab => self.select_tab(self.active_tab.next()),
            Action::PrevTab => self.select_tab(self.active_tab.prev()),
            Action::ToggleHelp => {
                self.help_popup.toggle();
            }
            Action::FocusFilter => {
                self.focus = Focus::FilterBar;
                self.filter_bar.start_editing();
            }
            Action::Reload => {
                spawn_load(self.provider.clone(), msg_tx.clone());
            }
            Action::SubmitFilter(filter_text) => {
                self.focus = Focus::Table;
                let title = self.page().title();
                match self.page_mut().apply_filter(&filter_text) {
                    Ok(()) => {
                        info!("{}: filter {:?}", title, filter_text);
                        self.status_bar.error_message = None;
                    }
                    Err(e) => {
                        warn!("{}: rejected filter {:?}: {:#}", title, filter_text, e);
                        self.filter_bar
                            .reject(self.pages[self.active_tab.index()].filter_text());
                        let _ = msg_tx.send(AppMessage::Error(format!("Filter error: {:#}", e)));
                    }
                }
            }
            Action::ShowDetail(detail) => self.detail_popup.show(detail),
            Action::CloseDetail => self.detail_popup.hide(),
            Action::Notify(notice) => self.status_bar.notice = Some(notice),
        }
        false
    }

    fn handle_message(&mut self, msg: &AppMessage) {
        for page in &mut self.pages {
            page.handle_message(msg);
        }
        self.status_bar.handle_message(msg);
    }
}

// --- Terminal setup ---

pub async fn run(cli: Cli) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        original_hook(info);
    }));

    enable_raw_mode().context("failed to enable raw mode")?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    io::stdout()
        .execute(EnableMouseCapture)
        .context("failed to enable mouse capture")?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cli).await;

    io::stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

// --- Event loop ---

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    cli: Cli,
) -> Result<()> {
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<AppMessage>();

    let provider = cli.command.provider();
    let mut app = App::new(provider.clone(), cli.command.view());

    spawn_load(provider, msg_tx.clone());

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    spawn_event_reader(event_tx);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        tokio::select! {
            Some(event) = event_rx.recv() => {
                let action = match to_input(&event) {
                    Some(Input::Key(key)) => app.handle_key(key),
                    Some(Input::Mouse(mouse)) => app.handle_mouse(mouse),
                    None => continue,
                };
                let Some(action) = action else { continue };
                if app.handle_action(action, &msg_tx) {
                    return Ok(());
                }
            }
            Some(msg) = msg_rx.recv() => {
                app.handle_message(&msg);
            }
        }
    }
}

// --- Background tasks ---

fn spawn_load(provider: Arc<dyn DataProvider>, msg_tx: mpsc::UnboundedSender<AppMessage>) {
    tokio::spawn(async move {
        let origin = provider.describe();
        info!("loading rows from {}", origin);
        let _ = msg_tx.send(AppMessage::LoadingStarted(format!("Reading {}...", origin)));

        match tokio::task::spawn_blocking(move || provider.fetch_rows()).await {
            Ok(Ok(dataset)) => {
                info!(
                    "loaded {} accounts, {} clients, {} automations, {} recurring jobs, {} reminders",
                    dataset.accounts.len(),
                    dataset.clients.len(),
                    dataset.automations.len(),
                    dataset.recurring_jobs.len(),
                    dataset.reminders.len()
                );
                let _ = msg_tx.send(AppMessage::DatasetReady(Arc::new(dataset)));
            }
            Ok(Err(e)) => {
                error!("load from {} failed: {:#}", origin, e);
                let _ = msg_tx.send(AppMessage::Error(format!("Load error: {:#}", e)));
            }
            Err(e) => {
                error!("load task for {} failed: {}", origin, e);
                let _ = msg_tx.send(AppMessage::Error(format!("Load error: {}", e)));
            }
        }

        let _ = msg_tx.send(AppMessage::LoadingFinished);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
    use ratatui::backend::TestBackend;

    use crate::loader::fixtures::FixtureProvider;
    use crate::model::entities::Dataset;

    struct FailingProvider;

    impl DataProvider for FailingProvider {
        fn describe(&self) -> String {
            "broken export".to_string()
        }

        fn fetch_rows(&self) -> Result<Dataset> {
            anyhow::bail!("export is truncated")
        }
    }

    fn app() -> App {
        App::new(Arc::new(FixtureProvider), &ViewConfig::default())
    }

    fn loaded_app() -> App {
        let mut app = app();
        let dataset = FixtureProvider.fetch_rows().unwrap();
        app.handle_message(&AppMessage::DatasetReady(Arc::new(dataset)));
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 20)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn app_new_default_state() {
        let app = app();
        assert_eq!(app.active_tab, Tab::Accounts);
        assert_eq!(app.focus, Focus::Table);
        assert_eq!(app.pages.len(), Tab::ALL.len());
        assert_eq!(app.page().title(), "Accounts");
    }

    #[test]
    fn app_new_honours_start_tab() {
        let view = ViewConfig {
            tab: Tab::Reminders,
            ..ViewConfig::default()
        };
        let app = App::new(Arc::new(FixtureProvider), &view);
        assert_eq!(app.page().title(), "Reminders");
    }

    #[test]
    fn pages_follow_tab_order() {
        let app = app();
        let titles: Vec<&str> = app.pages.iter().map(|p| p.title()).collect();
        assert_eq!(
            titles,
            vec!["Accounts", "Clients", "Automations", "Recurring jobs", "Reminders"]
        );
    }

    #[test]
    fn handle_key_quit() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn handle_key_help() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('?'))), Some(Action::ToggleHelp));
    }

    #[test]
    fn handle_key_tab_switch() {
        let mut app = app();
        for (ch, idx) in [('1', 0), ('2', 1), ('3', 2), ('4', 3), ('5', 4)] {
            assert_eq!(app.handle_key(key(KeyCode::Char(ch))), Some(Action::SwitchTab(idx)));
        }
        assert_eq!(app.handle_key(key(KeyCode::Tab)), Some(Action::NextTab));
        assert_eq!(app.handle_key(key(KeyCode::BackTab)), Some(Action::PrevTab));
    }

    #[test]
    fn handle_key_reload() {
        let mut app = app();
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Some(Action::Reload));
    }

    #[test]
    fn switching_tabs_shows_that_pages_filter() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        app.handle_action(Action::SubmitFilter("owner = 'Dana Lee'".into()), &tx);
        app.handle_action(Action::SwitchTab(1), &tx);
        assert_eq!(app.active_tab, Tab::Clients);
        assert!(app.filter_bar.text.is_empty());
        app.handle_action(Action::PrevTab, &tx);
        assert_eq!(app.filter_bar.text, "owner = 'Dana Lee'");
    }

    #[test]
    fn bad_filter_reports_error_and_keeps_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        app.handle_action(Action::SubmitFilter("open_jobs > 3".into()), &tx);
        app.handle_action(Action::SubmitFilter("balance > 3".into()), &tx);
        assert_eq!(app.page().filter_text(), Some("open_jobs > 3"));
        assert_eq!(app.filter_bar.applied_filter(), Some("open_jobs > 3"));
        let Ok(AppMessage::Error(msg)) = rx.try_recv() else {
            panic!("expected an error message");
        };
        assert!(msg.contains("unknown field 'balance'"));
    }

    #[test]
    fn filter_bar_captures_keys_while_editing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        let action = app.handle_key(key(KeyCode::Char('/'))).unwrap();
        app.handle_action(action, &tx);
        assert_eq!(app.focus, Focus::FilterBar);
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), None);
        let submit = app.handle_key(key(KeyCode::Enter));
        assert_eq!(submit, Some(Action::SubmitFilter("q".into())));
        assert_eq!(app.focus, Focus::Table);
    }

    #[test]
    fn enter_opens_detail_and_escape_closes_it() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        screen(&mut app);
        let action = app.handle_key(key(KeyCode::Enter)).unwrap();
        app.handle_action(action, &tx);
        assert!(app.detail_popup.is_visible());
        assert!(screen(&mut app).contains("Details"));

        let action = app.handle_key(key(KeyCode::Esc)).unwrap();
        app.handle_action(action, &tx);
        assert!(!app.detail_popup.is_visible());
    }

    #[test]
    fn row_action_becomes_notice() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        screen(&mut app);
        let action = app.handle_key(key(KeyCode::Char('@'))).unwrap();
        app.handle_action(action, &tx);
        assert!(screen(&mut app).contains("'email' is not available for acc-1001"));
    }

    #[test]
    fn draw_shows_tabs_rows_and_status() {
        let mut app = loaded_app();
        let text = screen(&mut app);
        assert!(text.contains("1:Accounts"));
        assert!(text.contains("5:Reminders"));
        assert!(text.contains("Birch & Hale LLP"));
        assert!(text.contains("Rows: 8"));
    }

    #[test]
    fn mouse_is_ignored_under_popups() {
        let mut app = loaded_app();
        screen(&mut app);
        app.help_popup.toggle();
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(app.handle_mouse(click), None);
        assert_eq!(app.page().status().selected, 0);
    }

    #[test]
    fn mouse_header_checkbox_selects_page() {
        let mut app = loaded_app();
        screen(&mut app);
        // Tab bar, filter bar, then the table border; the header follows.
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(click);
        assert_eq!(app.page().status().selected, 8);
    }

    #[tokio::test]
    async fn load_sends_dataset_then_finishes() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_load(Arc::new(FixtureProvider), tx);
        assert!(matches!(rx.recv().await, Some(AppMessage::LoadingStarted(_))));
        let Some(AppMessage::DatasetReady(dataset)) = rx.recv().await else {
            panic!("expected dataset");
        };
        assert_eq!(dataset.accounts.len(), 8);
        assert!(matches!(rx.recv().await, Some(AppMessage::LoadingFinished)));
    }

    #[tokio::test]
    async fn load_failure_is_reported() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_load(Arc::new(FailingProvider), tx);
        assert!(matches!(rx.recv().await, Some(AppMessage::LoadingStarted(_))));
        let Some(AppMessage::Error(msg)) = rx.recv().await else {
            panic!("expected error");
        };
        assert!(msg.contains("export is truncated"));
        assert!(matches!(rx.recv().await, Some(AppMessage::LoadingFinished)));
    }
}
