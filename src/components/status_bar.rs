use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::Frame;

use crate::event::{Action, AppMessage};
use crate::ui::theme::Theme;

use super::list_page::PageStatus;
use super::Component;

const ERROR_DISPLAY_MAX_LEN: usize = 40;
const ERROR_TRUNCATED_LEN: usize = ERROR_DISPLAY_MAX_LEN - 3; // room for "..."

pub struct StatusBar {
    pub page: PageStatus,
    pub filter_active: bool,
    pub loading_message: Option<String>,
    pub error_message: Option<String>,
    /// Transient notice, cleared by the next key press.
    pub notice: Option<String>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            page: PageStatus::default(),
            filter_active: false,
            loading_message: None,
            error_message: None,
            notice: None,
        }
    }

    pub fn set_page(&mut self, page: PageStatus, filter_active: bool) {
        self.page = page;
        self.filter_active = filter_active;
    }

    fn row_text(&self) -> String {
        let page = &self.page;
        let rows = if self.filter_active {
            format!(" Rows: {}/{} (filtered)", page.matching_rows, page.total_rows)
        } else {
            format!(" Rows: {}", page.total_rows)
        };
        format!(
            "{} | Page {}/{} | Selected: {}",
            rows, page.page, page.page_count, page.selected
        )
    }
}

impl Component for StatusBar {
    fn handle_key(&mut self, _key: KeyEvent) -> Option<Action> {
        self.notice = None;
        None
    }

    fn handle_message(&mut self, msg: &AppMessage) -> Option<Action> {
        match msg {
            AppMessage::LoadingStarted(msg) => {
                self.loading_message = Some(msg.clone());
                self.error_message = None;
            }
            AppMessage::LoadingFinished | AppMessage::DatasetReady(_) => {
                self.loading_message = None;
            }
            AppMessage::Error(err) => {
                self.error_message = Some(err.clone());
                self.loading_message = None;
            }
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let mut spans = vec![Span::styled(self.row_text(), Theme::status_bar())];

        if let Some(ref sort) = self.page.sort {
            spans.push(Span::styled(format!(" | Sort: {}", sort), Theme::status_bar()));
        }

        if let Some(ref column) = self.page.reordering {
            spans.push(Span::styled(
                format!(" | Moving: {} (m to drop, Esc to cancel)", column),
                Theme::status_notice(),
            ));
        }

        if let Some(ref err) = self.error_message {
            let err_display = if err.chars().count() > ERROR_DISPLAY_MAX_LEN {
                let head: String = err.chars().take(ERROR_TRUNCATED_LEN).collect();
                format!(" | Error: {}...", head)
            } else {
                format!(" | Error: {}", err)
            };
            spans.push(Span::styled(err_display, Theme::status_error()));
        } else if let Some(ref msg) = self.loading_message {
            spans.push(Span::styled(
                format!(" | Loading: {}", msg),
                Theme::status_loading(),
            ));
        } else if let Some(ref notice) = self.notice {
            spans.push(Span::styled(format!(" | {}", notice), Theme::status_notice()));
        }

        // Right-aligned key hints
        let hints = " q:quit ?:help ";
        let used_width: usize = spans.iter().map(|s| s.width()).sum();
        let remaining = area.width as usize - used_width.min(area.width as usize);
        if remaining > hints.len() {
            let padding = " ".repeat(remaining - hints.len());
            spans.push(Span::styled(padding, Theme::status_bar()));
            spans.push(Span::styled(hints, Theme::status_key_hint()));
        }

        let line = Line::from(spans);
        // Fill entire status bar background
        let bar = ratatui::widgets::Paragraph::new(line).style(Theme::status_bar());
        frame.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(bar: &mut StatusBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 1)).unwrap();
        terminal
            .draw(|frame| bar.render(frame, frame.area(), false))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn page_status() -> PageStatus {
        PageStatus {
            total_rows: 8,
            matching_rows: 3,
            page: 1,
            page_count: 2,
            selected: 2,
            sort: Some("Owner ↓".into()),
            reordering: None,
        }
    }

    #[test]
    fn new_status_bar_defaults() {
        let bar = StatusBar::new();
        assert_eq!(bar.page, PageStatus::default());
        assert!(bar.loading_message.is_none());
        assert!(bar.error_message.is_none());
    }

    #[test]
    fn handle_loading_messages() {
        let mut bar = StatusBar::new();
        bar.handle_message(&AppMessage::LoadingStarted("reading dataset".into()));
        assert_eq!(bar.loading_message.as_deref(), Some("reading dataset"));
        assert!(bar.error_message.is_none());

        bar.handle_message(&AppMessage::LoadingFinished);
        assert!(bar.loading_message.is_none());
    }

    #[test]
    fn handle_error_clears_loading() {
        let mut bar = StatusBar::new();
        bar.handle_message(&AppMessage::LoadingStarted("loading".into()));
        bar.handle_message(&AppMessage::Error("dataset not found".into()));
        assert!(bar.loading_message.is_none());
        assert_eq!(bar.error_message.as_deref(), Some("dataset not found"));
    }

    #[test]
    fn shows_filtered_counts_sort_and_selection() {
        let mut bar = StatusBar::new();
        bar.set_page(page_status(), true);
        let text = rendered(&mut bar);
        assert!(text.contains("Rows: 3/8 (filtered)"));
        assert!(text.contains("Page 1/2"));
        assert!(text.contains("Selected: 2"));
        assert!(text.contains("Sort: Owner ↓"));
    }

    #[test]
    fn shows_column_being_moved() {
        let mut bar = StatusBar::new();
        bar.set_page(
            PageStatus {
                reordering: Some("Due".into()),
                ..page_status()
            },
            false,
        );
        let text = rendered(&mut bar);
        assert!(text.contains("Rows: 8 |"));
        assert!(text.contains("Moving: Due"));
    }

    #[test]
    fn long_errors_are_truncated() {
        let mut bar = StatusBar::new();
        bar.handle_message(&AppMessage::Error("é".repeat(60)));
        let text = rendered(&mut bar);
        assert!(text.contains(&format!("Error: {}...", "é".repeat(ERROR_TRUNCATED_LEN))));
    }

    #[test]
    fn notice_clears_on_next_key() {
        let mut bar = StatusBar::new();
        bar.notice = Some("'archive' is not available".into());
        assert!(rendered(&mut bar).contains("'archive' is not available"));
        bar.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE));
        assert!(bar.notice.is_none());
    }
}
