use super::record::ColumnDescriptor;

/// Ordered column descriptors plus an in-flight reorder gesture.
///
/// Reordering only ever permutes the columns given at construction.
#[derive(Debug, Clone)]
pub struct ColumnOrderModel {
    columns: Vec<ColumnDescriptor>,
    pending_source: Option<usize>,
}

impl ColumnOrderModel {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            columns,
            pending_source: None,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor> {
        self.columns.get(index)
    }

    /// Remove the column at `source` and insert it at `target` in the
    /// shortened sequence. An out-of-range source is ignored; the target is
    /// clamped to the last slot.
    pub fn move_column(&mut self, source: usize, target: usize) -> &[ColumnDescriptor] {
        if source < self.columns.len() && source != target {
            let column = self.columns.remove(source);
            let target = target.min(self.columns.len());
            self.columns.insert(target, column);
        }
        &self.columns
    }

    /// Record the drag source. Out-of-range indices leave no gesture pending.
    pub fn begin_reorder(&mut self, source: usize) {
        self.pending_source = (source < self.columns.len()).then_some(source);
    }

    /// Drop the pending column at `target`. Returns whether the order changed.
    pub fn complete_reorder(&mut self, target: usize) -> bool {
        let Some(source) = self.pending_source.take() else {
            return false;
        };
        let before: Vec<String> = self.columns.iter().map(|c| c.id.clone()).collect();
        self.move_column(source, target);
        self.columns.iter().map(|c| &c.id).ne(before.iter())
    }

    pub fn cancel_reorder(&mut self) {
        self.pending_source = None;
    }

    pub fn pending_source(&self) -> Option<usize> {
        self.pending_source
    }
}
