use std::borrow::Borrow;
use std::cmp::Ordering;

use super::record::{find_field, CellValue, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Active sort field and direction. `field == None` keeps the original row order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn is_sorted_by(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field)
    }
}

#[derive(Debug, Default)]
pub struct SortModel {
    state: SortState,
}

impl SortModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SortState {
        &self.state
    }

    /// Flip the direction when `field_id` is already the sort field, otherwise
    /// switch to it in ascending order. Sortability is checked by the caller.
    pub fn toggle_sort(&mut self, field_id: &str) -> &SortState {
        if self.state.is_sorted_by(field_id) {
            self.state.direction = self.state.direction.flip();
        } else {
            self.state.field = Some(field_id.to_string());
            self.state.direction = SortDirection::Asc;
        }
        &self.state
    }

    /// Header indicator for `field_id`, only present on the active sort column.
    pub fn indicator_for(&self, field_id: &str) -> Option<&'static str> {
        self.state
            .is_sorted_by(field_id)
            .then(|| self.state.direction.indicator())
    }

    /// Row positions in display order. Uses a stable sort, so rows with equal
    /// keys keep their relative order in either direction.
    pub fn sorted_indices<T, R: Borrow<T>>(&self, rows: &[R], fields: &[Field<T>]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        let Some(field) = self
            .state
            .field
            .as_deref()
            .and_then(|id| find_field(fields, id))
        else {
            return indices;
        };

        let keys: Vec<CellValue> = rows.iter().map(|r| field.value(r.borrow())).collect();
        let direction = self.state.direction;
        indices.sort_by(|&a, &b| {
            let ord = compare_values(&keys[a], &keys[b]);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        indices
    }
}

/// Numeric comparison when both sides are numbers, collated text otherwise.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        _ => collate(&a.to_string(), &b.to_string()),
    }
}

/// Locale-style text ordering: letters compare without regard to accents or
/// case first, then accents, then case with lowercase ahead of uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    let primary = fold(a).cmp(&fold(b));
    if primary != Ordering::Equal {
        return primary;
    }
    let secondary = a.to_lowercase().cmp(&b.to_lowercase());
    if secondary != Ordering::Equal {
        return secondary;
    }
    let case_a = a.chars().map(char::is_uppercase);
    let case_b = b.chars().map(char::is_uppercase);
    case_a.cmp(case_b)
}

fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => out.push('a'),
            'ç' | 'ć' | 'č' => out.push('c'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' | 'ī' => out.push('i'),
            'ñ' | 'ń' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => out.push('o'),
            'ù' | 'ú' | 'û' | 'ü' | 'ū' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'š' | 'ś' => out.push('s'),
            'ž' | 'ź' | 'ż' => out.push('z'),
            'ł' => out.push('l'),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Row {
        id: u32,
        name: &'static str,
        count: u32,
    }

    fn fields() -> Vec<Field<Row>> {
        vec![
            Field::new("name", "Name", |r: &Row| r.name.into()).sortable(),
            Field::new("count", "Count", |r: &Row| r.count.into()).sortable(),
        ]
    }

    fn row(id: u32, name: &'static str, count: u32) -> Row {
        Row { id, name, count }
    }

    fn ids(rows: &[Row], order: &[usize]) -> Vec<u32> {
        order.iter().map(|&i| rows[i].id).collect()
    }

    #[test]
    fn toggle_same_field_flips_direction() {
        let mut model = SortModel::new();
        model.toggle_sort("name");
        assert_eq!(model.state().direction, SortDirection::Asc);

        model.toggle_sort("name");
        assert_eq!(model.state().field.as_deref(), Some("name"));
        assert_eq!(model.state().direction, SortDirection::Desc);

        model.toggle_sort("name");
        assert_eq!(model.state().direction, SortDirection::Asc);
    }

    #[test]
    fn toggle_new_field_resets_to_ascending() {
        let mut model = SortModel::new();
        model.toggle_sort("name");
        model.toggle_sort("name");
        assert_eq!(model.state().direction, SortDirection::Desc);

        let state = model.toggle_sort("count");
        assert_eq!(state.field.as_deref(), Some("count"));
        assert_eq!(state.direction, SortDirection::Asc);
    }

    #[test]
    fn unsorted_keeps_original_order() {
        let rows = vec![row(1, "B", 0), row(2, "A", 0)];
        let model = SortModel::new();
        assert_eq!(ids(&rows, &model.sorted_indices(&rows, &fields())), vec![1, 2]);
    }

    #[test]
    fn ties_preserve_original_order() {
        let rows = vec![row(1, "B", 0), row(2, "A", 0), row(3, "A", 0)];
        let mut model = SortModel::new();
        model.toggle_sort("name");
        assert_eq!(
            ids(&rows, &model.sorted_indices(&rows, &fields())),
            vec![2, 3, 1]
        );

        model.toggle_sort("name");
        assert_eq!(
            ids(&rows, &model.sorted_indices(&rows, &fields())),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn numbers_compare_numerically() {
        let rows = vec![row(1, "x", 9), row(2, "y", 10)];
        let mut model = SortModel::new();
        model.toggle_sort("count");
        assert_eq!(ids(&rows, &model.sorted_indices(&rows, &fields())), vec![1, 2]);
    }

    #[test]
    fn unknown_field_keeps_original_order() {
        let rows = vec![row(1, "B", 0), row(2, "A", 0)];
        let mut model = SortModel::new();
        model.toggle_sort("missing");
        assert_eq!(ids(&rows, &model.sorted_indices(&rows, &fields())), vec![1, 2]);
    }

    #[test]
    fn sorts_borrowed_rows() {
        let rows = vec![row(1, "b", 0), row(2, "a", 0)];
        let refs: Vec<&Row> = rows.iter().collect();
        let mut model = SortModel::new();
        model.toggle_sort("name");
        assert_eq!(model.sorted_indices(&refs, &fields()), vec![1, 0]);
    }

    #[test]
    fn mixed_values_fall_back_to_text() {
        assert_eq!(
            compare_values(&CellValue::Number(10.0), &CellValue::from("9")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&CellValue::Empty, &CellValue::from("a")),
            Ordering::Less
        );
    }

    #[test]
    fn collation_ignores_case_and_accents_first() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Émile", "Eva"), Ordering::Less);
        assert_eq!(collate("a", "A"), Ordering::Less);
        assert_eq!(collate("Zoë", "zoe"), Ordering::Greater);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn indicator_only_on_active_field() {
        let mut model = SortModel::new();
        assert_eq!(model.indicator_for("name"), None);
        model.toggle_sort("name");
        assert_eq!(model.indicator_for("name"), Some("↑"));
        assert_eq!(model.indicator_for("count"), None);
        model.toggle_sort("name");
        assert_eq!(model.indicator_for("name"), Some("↓"));
    }
}
