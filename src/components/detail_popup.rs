use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::event::{Action, AppMessage, RecordDetail};
use crate::ui::theme::Theme;

use super::Component;

const POPUP_WIDTH: u16 = 72;
const POPUP_MARGIN: u16 = 4;
const LABEL_WIDTH: usize = 12;

/// Read-only view of every field of one row.
pub struct DetailPopup {
    detail: Option<RecordDetail>,
}

impl DetailPopup {
    pub fn new() -> Self {
        Self { detail: None }
    }

    pub fn show(&mut self, detail: RecordDetail) {
        self.detail = Some(detail);
    }

    pub fn hide(&mut self) {
        self.detail = None;
    }

    pub fn is_visible(&self) -> bool {
        self.detail.is_some()
    }

    fn popup_area(area: Rect, rows: u16) -> Rect {
        let width = POPUP_WIDTH.min(area.width.saturating_sub(POPUP_MARGIN));
        // Title, blank line, fields, blank line, hint, two borders.
        let height = (rows + 6).min(area.height.saturating_sub(POPUP_MARGIN));
        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        Rect::new(area.x + x, area.y + y, width, height)
    }
}

impl Component for DetailPopup {
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.is_visible() {
            return None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(Action::CloseDetail),
            _ => None,
        }
    }

    fn handle_message(&mut self, _msg: &AppMessage) -> Option<Action> {
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _focused: bool) {
        let Some(detail) = &self.detail else {
            return;
        };

        let popup = Self::popup_area(area, detail.fields.len() as u16);
        frame.render_widget(Clear, popup);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::styled(format!(" {}", detail.title), Theme::title()));
        lines.push(Line::raw(""));
        for (label, value) in &detail.fields {
            let value = if value.is_empty() { "-" } else { value.as_str() };
            lines.push(Line::from(vec![
                Span::styled(format!("  {:width$}", label, width = LABEL_WIDTH), Theme::label()),
                Span::styled(value.to_string(), Theme::value()),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            " Press Esc or Enter to close",
            Theme::status_key_hint(),
        ));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .border_style(Theme::border_focused());

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, popup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn detail() -> RecordDetail {
        RecordDetail {
            title: "client cli-02".into(),
            fields: vec![
                ("Name".into(), "Thomas Hale".into()),
                ("Phone".into(), String::new()),
            ],
        }
    }

    #[test]
    fn hidden_popup_ignores_keys() {
        let mut popup = DetailPopup::new();
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(popup.handle_key(key), None);
    }

    #[test]
    fn escape_asks_to_close() {
        let mut popup = DetailPopup::new();
        popup.show(detail());
        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(popup.handle_key(key), Some(Action::CloseDetail));
        popup.hide();
        assert!(!popup.is_visible());
    }

    #[test]
    fn renders_labels_and_placeholder_for_empty_values() {
        let mut popup = DetailPopup::new();
        popup.show(detail());
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|frame| popup.render(frame, frame.area(), true))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("client cli-02"));
        assert!(text.contains("Thomas Hale"));
        assert!(text.contains("Phone       -"));
    }
}
