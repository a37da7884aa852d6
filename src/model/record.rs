use std::collections::HashSet;
use std::fmt;

use log::warn;

/// A row that can be shown in a table. The id must be unique within a table.
pub trait Record {
    fn id(&self) -> &str;
}

/// Scalar projected out of a row for display, sorting and filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{:.2}", n),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl<V: Into<CellValue>> From<Option<V>> for CellValue {
    fn from(v: Option<V>) -> Self {
        v.map_or(CellValue::Empty, Into::into)
    }
}

/// Metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Stable key, also the sort field when `sortable` is set.
    pub id: String,
    pub label: String,
    pub sortable: bool,
}

impl ColumnDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, sortable: bool) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            sortable,
        }
    }
}

pub type Accessor<T> = fn(&T) -> CellValue;

/// A column together with the accessor that projects a row into that column.
pub struct Field<T> {
    pub column: ColumnDescriptor,
    pub accessor: Accessor<T>,
}

impl<T> Field<T> {
    pub fn new(id: &str, label: &str, accessor: Accessor<T>) -> Self {
        Self {
            column: ColumnDescriptor::new(id, label, false),
            accessor,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.column.sortable = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.column.id
    }

    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}

// Manual impl: deriving would demand `T: Clone`.
impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        Self {
            column: self.column.clone(),
            accessor: self.accessor,
        }
    }
}

/// Look up a field by column id.
pub fn find_field<'a, T>(fields: &'a [Field<T>], id: &str) -> Option<&'a Field<T>> {
    fields.iter().find(|f| f.id() == id)
}

/// Rows and fields a table instance renders.
///
/// Row ids are de-duplicated on the way in: the first row with a given id
/// wins and later ones are dropped with a warning.
pub struct RecordSet<T> {
    rows: Vec<T>,
    fields: Vec<Field<T>>,
}

impl<T: Record> RecordSet<T> {
    pub fn new(rows: Vec<T>, fields: Vec<Field<T>>) -> Self {
        Self {
            rows: dedup_by_id(rows),
            fields,
        }
    }

    pub fn replace_rows(&mut self, rows: Vec<T>) {
        self.rows = dedup_by_id(rows);
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    pub fn row(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn dedup_by_id<T: Record>(rows: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        if seen.insert(row.id().to_string()) {
            out.push(row);
        } else {
            warn!("dropping row with duplicate id {:?}", row.id());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Item {
        id: &'static str,
        name: &'static str,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            self.id
        }
    }

    fn fields() -> Vec<Field<Item>> {
        vec![Field::new("name", "Name", |i: &Item| i.name.into()).sortable()]
    }

    #[test]
    fn record_set_drops_duplicate_ids() {
        let set = RecordSet::new(
            vec![
                Item { id: "1", name: "first" },
                Item { id: "2", name: "second" },
                Item { id: "1", name: "again" },
            ],
            fields(),
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.row("1").map(|i| i.name), Some("first"));
    }

    #[test]
    fn replace_rows_also_dedups() {
        let mut set = RecordSet::new(vec![], fields());
        assert!(set.is_empty());
        set.replace_rows(vec![Item { id: "a", name: "x" }, Item { id: "a", name: "y" }]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sortable_sets_descriptor_flag() {
        let set = RecordSet::new(vec![], fields());
        assert_eq!(set.fields()[0].column, ColumnDescriptor::new("name", "Name", true));
        assert_eq!(set.fields()[0].id(), "name");
    }

    #[test]
    fn cell_value_display() {
        assert_eq!(CellValue::Number(10.0).to_string(), "10");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.50");
        assert_eq!(CellValue::from("Acme").to_string(), "Acme");
        assert_eq!(CellValue::from(None::<String>).to_string(), "");
        assert!(CellValue::from(None::<u32>).is_empty());
    }
}
