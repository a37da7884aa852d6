use std::collections::BTreeSet;

/// Set of selected row ids.
///
/// Ids are never pruned when the rows underneath change, so a selection can
/// outlive a filter or reload that hides some of its rows.
#[derive(Debug, Default, Clone)]
pub struct SelectionTracker {
    selected: BTreeSet<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn toggle(&mut self, id: &str) -> &BTreeSet<String> {
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
        &self.selected
    }

    /// Clears the selection when it is already "full", otherwise selects every id.
    pub fn select_all<S: AsRef<str>>(&mut self, all_ids: &[S]) -> &BTreeSet<String> {
        if self.is_all_selected(all_ids) {
            self.selected.clear();
        } else {
            self.selected = all_ids.iter().map(|id| id.as_ref().to_string()).collect();
        }
        &self.selected
    }

    /// Count comparison, not set equality: a selection of the same size as
    /// `all_ids` reports as full even if it holds other ids.
    pub fn is_all_selected<S: AsRef<str>>(&self, all_ids: &[S]) -> bool {
        self.selected.len() == all_ids.len()
    }
}
