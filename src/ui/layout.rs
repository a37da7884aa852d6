use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Top-level layout splits the terminal into: tab bar (top), content area (middle), status bar (bottom).
pub struct AppLayout {
    pub tab_bar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // tab bar
                Constraint::Min(3),    // content area
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            tab_bar: chunks[0],
            content: chunks[1],
            status_bar: chunks[2],
        }
    }
}

/// Filter bar above the list table of a page.
pub struct PageLayout {
    pub filter_bar: Rect,
    pub table: Rect,
}

impl PageLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // filter bar
                Constraint::Min(3),    // list table
            ])
            .split(area);

        Self {
            filter_bar: chunks[0],
            table: chunks[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(w: u16, h: u16) -> Rect {
        Rect::new(0, 0, w, h)
    }

    #[test]
    fn app_layout_splits_correctly() {
        let layout = AppLayout::new(rect(80, 24));
        assert_eq!(layout.tab_bar.height, 1);
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.content.height, 22);
    }

    #[test]
    fn page_layout_has_filter_and_table() {
        let layout = PageLayout::new(rect(80, 20));
        assert_eq!(layout.filter_bar.height, 1);
        assert!(layout.table.height >= 3);
        assert_eq!(layout.table.y, 1);
    }
}
