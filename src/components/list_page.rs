use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use log::{debug, info};
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::event::{Action, AppMessage, RecordDetail};
use crate::model::entities::Entity;
use crate::model::filter::{parse_filter, Filter};
use crate::model::record::{Record, RecordSet};
use crate::ui::theme::Theme;

use super::table_view::{TableEvent, TableView};
use super::Component;

/// Snapshot of a page's counters for the status bar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageStatus {
    pub total_rows: usize,
    pub matching_rows: usize,
    /// 1-based.
    pub page: usize,
    pub page_count: usize,
    pub selected: usize,
    /// Active sort as "Label ↑".
    pub sort: Option<String>,
    /// Column picked up by an unfinished reorder.
    pub reordering: Option<String>,
}

/// A tab of the application: one list view with its own filter.
pub trait Page: Component {
    fn title(&self) -> &'static str;

    fn status(&self) -> PageStatus;

    /// Parse and apply a filter expression. An empty string clears the
    /// filter; on error the previous filter stays applied.
    fn apply_filter(&mut self, text: &str) -> Result<()>;

    fn filter_text(&self) -> Option<&str>;
}

/// Host page for one entity type. Owns the full row list, filters and pages
/// it, and hands the visible slice to a [`TableView`].
pub struct ListPage<T: Entity> {
    records: RecordSet<T>,
    table: TableView<T>,
    filter: Option<(String, Filter)>,
    page: usize,
    page_size: usize,
    loaded: bool,
}

impl<T: Entity> ListPage<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: RecordSet::new(Vec::new(), T::columns()),
            table: TableView::new(T::columns()),
            filter: None,
            page: 0,
            page_size: page_size.max(1),
            loaded: false,
        }
    }

    fn page_count(&self, matching: usize) -> usize {
        matching.div_ceil(self.page_size).max(1)
    }

    fn clamp_page(&mut self) {
        let matching = matching_rows(&self.records, active(&self.filter)).len();
        self.page = self.page.min(self.page_count(matching) - 1);
    }

    fn next_page(&mut self) {
        self.page += 1;
        self.clamp_page();
    }

    fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    fn detail(&self, id: &str) -> Option<RecordDetail> {
        let row = self.records.row(id)?;
        Some(RecordDetail {
            title: format!("{} {}", T::NOUN, row.id()),
            fields: self
                .records
                .fields()
                .iter()
                .map(|f| (f.column.label.clone(), f.value(row).to_string()))
                .collect(),
        })
    }

    fn on_table_event(&self, event: TableEvent) -> Option<Action> {
        match event {
            TableEvent::SelectionChanged(selected) => {
                debug!("{}: {} rows selected", T::TITLE, selected.len());
                None
            }
            TableEvent::ColumnOrderChanged(columns) => {
                let ids: Vec<&str> = columns.iter().map(|c| c.id.as_str()).collect();
                debug!("{}: column order {:?}", T::TITLE, ids);
                None
            }
            TableEvent::SortChanged(state) => {
                debug!("{}: sort {:?}", T::TITLE, state);
                None
            }
            TableEvent::RowActivated(id) => self.detail(&id).map(Action::ShowDetail),
            TableEvent::RowAction { id, action } => {
                info!("{}: {} requested for {}", T::TITLE, action.label(), id);
                Some(Action::Notify(format!(
                    "'{}' is not available for {}",
                    action.label(),
                    id
                )))
            }
        }
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let noun = T::NOUN;
        let lines = if !self.loaded {
            vec![Line::styled(
                format!("Loading {}s...", noun),
                Theme::empty_message(),
            )]
        } else if self.records.is_empty() {
            vec![
                Line::styled(format!("No {}s yet", noun), Theme::empty_message()),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("Press ", Theme::empty_message()),
                    Span::styled("N", Theme::call_to_action()),
                    Span::styled(format!(" to add the first {}", noun), Theme::empty_message()),
                ]),
            ]
        } else {
            vec![
                Line::styled(
                    format!("No {}s match the current filter", noun),
                    Theme::empty_message(),
                ),
                Line::raw(""),
                Line::from(vec![
                    Span::styled("Press ", Theme::empty_message()),
                    Span::styled("/", Theme::call_to_action()),
                    Span::styled(" to change it", Theme::empty_message()),
                ]),
            ]
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", T::TITLE))
            .border_style(if focused {
                Theme::border_focused()
            } else {
                Theme::border_unfocused()
            });
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }
}

fn active(filter: &Option<(String, Filter)>) -> Option<&Filter> {
    filter.as_ref().map(|(_, f)| f)
}

fn matching_rows<'a, T: Record>(records: &'a RecordSet<T>, filter: Option<&Filter>) -> Vec<&'a T> {
    records
        .rows()
        .iter()
        .filter(|row| filter.is_none_or(|f| f.matches(*row, records.fields())))
        .collect()
}

fn page_slice<T>(ordered: Vec<&T>, page: usize, page_size: usize) -> Vec<&T> {
    ordered
        .into_iter()
        .skip(page * page_size)
        .take(page_size)
        .collect()
}

impl<T: Entity> Component for ListPage<T> {
    fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('n') => {
                self.next_page();
                None
            }
            KeyCode::Char('p') => {
                self.prev_page();
                None
            }
            KeyCode::Char('N') if self.loaded && self.records.is_empty() => Some(Action::Notify(
                format!("Adding {}s is not available", T::NOUN),
            )),
            _ => {
                let matching = matching_rows(&self.records, active(&self.filter));
                let rows = page_slice(self.table.order_rows(&matching), self.page, self.page_size);
                let event = self.table.handle_key(key, &rows)?;
                self.on_table_event(event)
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        let matching = matching_rows(&self.records, active(&self.filter));
        if matching.is_empty() {
            return None;
        }
        let rows = page_slice(self.table.order_rows(&matching), self.page, self.page_size);
        let event = self.table.handle_mouse(mouse, &rows)?;
        self.on_table_event(event)
    }

    fn handle_message(&mut self, msg: &AppMessage) -> Option<Action> {
        if let AppMessage::DatasetReady(dataset) = msg {
            self.records.replace_rows(T::rows(dataset).to_vec());
            self.loaded = true;
            self.clamp_page();
            debug!("{}: {} rows loaded", T::TITLE, self.records.len());
        }
        None
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        let matching = matching_rows(&self.records, active(&self.filter));
        if matching.is_empty() {
            self.render_empty(frame, area, focused);
            return;
        }
        let rows = page_slice(self.table.order_rows(&matching), self.page, self.page_size);
        self.table.render(frame, area, focused, &rows, T::TITLE);
    }
}

impl<T: Entity> Page for ListPage<T> {
    fn title(&self) -> &'static str {
        T::TITLE
    }

    fn status(&self) -> PageStatus {
        let matching = matching_rows(&self.records, active(&self.filter)).len();
        let state = self.table.sort_state();
        let sort = state.field.as_ref().and_then(|id| {
            self.table
                .columns()
                .iter()
                .find(|c| &c.id == id)
                .map(|c| format!("{} {}", c.label, state.direction.indicator()))
        });
        PageStatus {
            total_rows: self.records.len(),
            matching_rows: matching,
            page: self.page + 1,
            page_count: self.page_count(matching),
            selected: self.table.selection().len(),
            sort,
            reordering: self.table.reorder_source().map(|c| c.label.clone()),
        }
    }

    fn apply_filter(&mut self, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            self.filter = None;
        } else {
            let filter = parse_filter(text)?;
            filter.check_fields(self.table.columns())?;
            self.filter = Some((text.to_string(), filter));
        }
        self.page = 0;
        Ok(())
    }

    fn filter_text(&self) -> Option<&str> {
        self.filter.as_ref().map(|(text, _)| text.as_str())
    }
}
