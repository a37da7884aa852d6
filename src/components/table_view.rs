use std::collections::BTreeSet;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use crate::model::column_order::ColumnOrderModel;
use crate::model::record::{find_field, ColumnDescriptor, Field, Record};
use crate::model::selection::SelectionTracker;
use crate::model::sort::{SortModel, SortState};
use crate::ui::theme::Theme;

const PAGE_SCROLL_SIZE: usize = 10;
const WIDTH_SAMPLE_ROWS: usize = 100;
const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 32;
const CHECKBOX_WIDTH: u16 = 3;
const COLUMN_SPACING: u16 = 1;
const ROW_ACTIONS: &str = "e:edit x:archive @:email";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Archive,
    Email,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            RowAction::Edit => "edit",
            RowAction::Archive => "archive",
            RowAction::Email => "email",
        }
    }
}

/// Changes a table reports to its host page.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    SelectionChanged(BTreeSet<String>),
    ColumnOrderChanged(Vec<ColumnDescriptor>),
    SortChanged(SortState),
    RowActivated(String),
    RowAction { id: String, action: RowAction },
}

/// Where things were drawn last frame, for mouse hit-testing.
#[derive(Debug, Default, Clone)]
struct HitMap {
    header_y: Option<u16>,
    body: Rect,
    checkbox: (u16, u16),
    columns: Vec<(u16, u16)>,
    offset: usize,
}

impl HitMap {
    fn column_at(&self, x: u16) -> Option<usize> {
        self.columns
            .iter()
            .position(|&(start, end)| x >= start && x < end)
    }

    fn on_checkbox(&self, x: u16) -> bool {
        x >= self.checkbox.0 && x < self.checkbox.1
    }

    fn row_at(&self, y: u16) -> Option<usize> {
        let body = self.body;
        (y >= body.y && y < body.y + body.height).then(|| self.offset + (y - body.y) as usize)
    }
}

/// Sortable, reorderable, selectable table over host-owned rows.
///
/// The host passes the rows to show on every call, already in display order
/// (see [`TableView::order_rows`]); the view only keeps the column order,
/// sort, selection and focus for them. Row focus indexes those rows.
pub struct TableView<T> {
    fields: Vec<Field<T>>,
    order: ColumnOrderModel,
    sort: SortModel,
    selection: SelectionTracker,
    table_state: TableState,
    column_cursor: usize,
    mouse_press: Option<usize>,
    refocus: Option<String>,
    hits: HitMap,
}

impl<T: Record> TableView<T> {
    pub fn new(fields: Vec<Field<T>>) -> Self {
        let order = ColumnOrderModel::new(fields.iter().map(|f| f.column.clone()).collect());
        Self {
            fields,
            order,
            sort: SortModel::new(),
            selection: SelectionTracker::new(),
            table_state: TableState::default(),
            column_cursor: 0,
            mouse_press: None,
            refocus: None,
            hits: HitMap::default(),
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.order.columns()
    }

    pub fn sort_state(&self) -> &SortState {
        self.sort.state()
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    /// Column picked up by an unfinished reorder gesture.
    pub fn reorder_source(&self) -> Option<&ColumnDescriptor> {
        self.order
            .pending_source()
            .and_then(|i| self.order.get(i))
    }

    /// `rows` in display order under the current sort.
    pub fn order_rows<'a>(&self, rows: &[&'a T]) -> Vec<&'a T> {
        self.sort
            .sorted_indices(rows, &self.fields)
            .into_iter()
            .map(|i| rows[i])
            .collect()
    }

    pub fn focused_row<'a>(&self, rows: &[&'a T]) -> Option<&'a T> {
        let i = self.table_state.selected()?;
        rows.get(i).copied()
    }

    /// Keep row focus inside `rows`, following the focused row after a sort.
    pub fn sync_rows(&mut self, rows: &[&T]) {
        if let Some(id) = self.refocus.take() {
            if let Some(i) = rows.iter().position(|r| r.id() == id) {
                self.table_state.select(Some(i));
                return;
            }
        }
        let len = rows.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub fn toggle_sort_at(&mut self, index: usize) -> Option<TableEvent> {
        let column = self.order.get(index)?;
        if !column.sortable {
            return None;
        }
        let id = column.id.clone();
        let state = self.sort.toggle_sort(&id).clone();
        Some(TableEvent::SortChanged(state))
    }

    fn sort_column(&mut self, index: usize, rows: &[&T]) -> Option<TableEvent> {
        let focused = self.focused_row(rows).map(|r| r.id().to_string());
        let event = self.toggle_sort_at(index)?;
        self.refocus = focused;
        Some(event)
    }

    pub fn toggle_row(&mut self, id: &str) -> TableEvent {
        TableEvent::SelectionChanged(self.selection.toggle(id).clone())
    }

    pub fn select_all(&mut self, rows: &[&T]) -> TableEvent {
        let ids: Vec<&str> = rows.iter().map(|r| r.id()).collect();
        TableEvent::SelectionChanged(self.selection.select_all(&ids).clone())
    }

    pub fn begin_reorder(&mut self, source: usize) {
        self.order.begin_reorder(source);
    }

    pub fn complete_reorder(&mut self, target: usize) -> Option<TableEvent> {
        if !self.order.complete_reorder(target) {
            return None;
        }
        self.column_cursor = target.min(self.order.len().saturating_sub(1));
        Some(TableEvent::ColumnOrderChanged(self.order.columns().to_vec()))
    }

    fn move_up(&mut self) {
        let i = self.table_state.selected().unwrap_or(0);
        self.table_state.select(Some(i.saturating_sub(1)));
    }

    fn move_down(&mut self, len: usize) {
        let i = self.table_state.selected().unwrap_or(0);
        if i + 1 < len {
            self.table_state.select(Some(i + 1));
        }
    }

    fn page_up(&mut self) {
        let i = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(i.saturating_sub(PAGE_SCROLL_SIZE)));
    }

    fn page_down(&mut self, len: usize) {
        let i = self.table_state.selected().unwrap_or(0);
        let max = len.saturating_sub(1);
        self.table_state
            .select(Some((i + PAGE_SCROLL_SIZE).min(max)));
    }

    fn column_left(&mut self) {
        self.column_cursor = self.column_cursor.saturating_sub(1);
    }

    fn column_right(&mut self) {
        if !self.order.is_empty() {
            self.column_cursor = (self.column_cursor + 1).min(self.order.len() - 1);
        }
    }

    fn row_action(&self, rows: &[&T], action: RowAction) -> Option<TableEvent> {
        let row = self.focused_row(rows)?;
        Some(TableEvent::RowAction {
            id: row.id().to_string(),
            action,
        })
    }

    pub fn handle_key(&mut self, key: KeyEvent, rows: &[&T]) -> Option<TableEvent> {
        self.sync_rows(rows);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down(rows.len());
                None
            }
            KeyCode::PageUp => {
                self.page_up();
                None
            }
            KeyCode::PageDown => {
                self.page_down(rows.len());
                None
            }
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                None
            }
            KeyCode::Char('G') => {
                if !rows.is_empty() {
                    self.table_state.select(Some(rows.len() - 1));
                }
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.column_left();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.column_right();
                None
            }
            KeyCode::Char(' ') => {
                let id = self.focused_row(rows)?.id().to_string();
                Some(self.toggle_row(&id))
            }
            KeyCode::Char('a') => Some(self.select_all(rows)),
            KeyCode::Char('s') => self.sort_column(self.column_cursor, rows),
            KeyCode::Char('m') => {
                if self.order.pending_source().is_some() {
                    self.complete_reorder(self.column_cursor)
                } else {
                    self.begin_reorder(self.column_cursor);
                    None
                }
            }
            KeyCode::Esc => {
                self.order.cancel_reorder();
                None
            }
            KeyCode::Enter => {
                let row = self.focused_row(rows)?;
                Some(TableEvent::RowActivated(row.id().to_string()))
            }
            KeyCode::Char('e') => self.row_action(rows, RowAction::Edit),
            KeyCode::Char('x') => self.row_action(rows, RowAction::Archive),
            KeyCode::Char('@') => self.row_action(rows, RowAction::Email),
            _ => None,
        }
    }

    /// Pressing a header starts a reorder; releasing on another header drops
    /// the column there, releasing on the same header counts as a click.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, rows: &[&T]) -> Option<TableEvent> {
        self.sync_rows(rows);
        let (x, y) = (mouse.column, mouse.row);
        let on_header = self.hits.header_y == Some(y);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if on_header => {
                if self.hits.on_checkbox(x) {
                    return Some(self.select_all(rows));
                }
                let index = self.hits.column_at(x)?;
                self.mouse_press = Some(index);
                self.column_cursor = index;
                self.begin_reorder(index);
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let index = self.hits.row_at(y)?;
                let row = rows.get(index)?;
                self.table_state.select(Some(index));
                if self.hits.on_checkbox(x) {
                    return Some(self.toggle_row(row.id()));
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let source = self.mouse_press.take()?;
                let target = on_header.then(|| self.hits.column_at(x)).flatten();
                match target {
                    Some(target) if target == source => {
                        self.order.cancel_reorder();
                        self.sort_column(source, rows)
                    }
                    Some(target) => self.complete_reorder(target),
                    None => {
                        self.order.cancel_reorder();
                        None
                    }
                }
            }
            MouseEventKind::ScrollDown => {
                self.move_down(rows.len());
                None
            }
            MouseEventKind::ScrollUp => {
                self.move_up();
                None
            }
            _ => None,
        }
    }

    fn cell_text(&self, row: &T, column_id: &str) -> String {
        find_field(&self.fields, column_id)
            .map(|f| f.value(row).to_string())
            .unwrap_or_default()
    }

    fn header_label(&self, column: &ColumnDescriptor) -> String {
        match self.sort.indicator_for(&column.id) {
            Some(indicator) => format!("{} {}", column.label, indicator),
            None => column.label.clone(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, rows: &[&T], title: &str) {
        self.sync_rows(rows);

        let columns = self.order.columns();
        let pending = self.order.pending_source();
        let all_ids: Vec<&str> = rows.iter().map(|r| r.id()).collect();
        let labels: Vec<String> = columns.iter().map(|c| self.header_label(c)).collect();
        let texts: Vec<Vec<String>> = rows
            .iter()
            .map(|row| columns.iter().map(|c| self.cell_text(row, &c.id)).collect())
            .collect();

        let col_widths: Vec<u16> = labels
            .iter()
            .enumerate()
            .map(|(col_idx, label)| {
                let max_data_width = texts
                    .iter()
                    .take(WIDTH_SAMPLE_ROWS)
                    .map(|row| row[col_idx].chars().count())
                    .max()
                    .unwrap_or(0);
                let width = label
                    .chars()
                    .count()
                    .max(max_data_width)
                    .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
                width as u16
            })
            .collect();

        let all_selected = self.selection.is_all_selected(&all_ids);
        let mut header_cells = vec![Cell::from(checkbox(all_selected)).style(Theme::table_header())];
        for (i, label) in labels.into_iter().enumerate() {
            let style = if pending == Some(i) {
                Theme::column_dragging()
            } else if focused && i == self.column_cursor {
                Theme::column_cursor()
            } else {
                Theme::table_header()
            };
            header_cells.push(Cell::from(label).style(style));
        }
        header_cells.push(Cell::from(""));
        let header = Row::new(header_cells).height(1);

        let focused_index = self.table_state.selected();
        let body: Vec<Row> = rows
            .iter()
            .zip(texts)
            .enumerate()
            .map(|(i, (row, texts))| {
                let style = if i % 2 == 0 {
                    Theme::table_row_normal()
                } else {
                    Theme::table_row_alt()
                };
                let mut cells = vec![Cell::from(checkbox(self.selection.is_selected(row.id()))).style(style)];
                cells.extend(texts.into_iter().map(|t| Cell::from(t).style(style)));
                // Row actions are only revealed on the focused row.
                let actions = if focused_index == Some(i) { ROW_ACTIONS } else { "" };
                cells.push(Cell::from(actions).style(Theme::row_actions()));
                Row::new(cells).height(1)
            })
            .collect();

        let mut widths = vec![Constraint::Length(CHECKBOX_WIDTH)];
        widths.extend(col_widths.iter().map(|w| Constraint::Length(*w)));
        widths.push(Constraint::Min(0));

        let title = if self.selection.is_empty() {
            format!(" {} ({} rows) ", title, rows.len())
        } else {
            format!(
                " {} ({} rows, {} selected) ",
                title,
                rows.len(),
                self.selection.len()
            )
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(if focused {
                Theme::border_focused()
            } else {
                Theme::border_unfocused()
            });
        let inner = block.inner(area);

        let mut hits = HitMap {
            header_y: (inner.height > 0).then_some(inner.y),
            body: Rect {
                y: inner.y.saturating_add(1),
                height: inner.height.saturating_sub(1),
                ..inner
            },
            checkbox: (0, 0),
            columns: Vec::new(),
            offset: 0,
        };
        // Same split the table makes, so narrow areas shrink the hit ranges too.
        let cells = Layout::horizontal(widths.clone())
            .flex(Flex::Start)
            .spacing(COLUMN_SPACING)
            .split(Rect { height: 1, ..inner });
        if let Some(rect) = cells.first() {
            hits.checkbox = (rect.x, rect.right());
        }
        hits.columns = cells
            .iter()
            .skip(1)
            .take(col_widths.len())
            .map(|rect| (rect.x, rect.right()))
            .collect();

        let table = Table::new(body, &widths)
            .header(header)
            .block(block)
            .flex(Flex::Start)
            .column_spacing(COLUMN_SPACING)
            .row_highlight_style(Theme::table_row_selected());

        frame.render_stateful_widget(table, area, &mut self.table_state);
        hits.offset = self.table_state.offset();
        self.hits = hits;
    }
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}
