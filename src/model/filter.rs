use anyhow::{bail, Result};

use super::record::{CellValue, ColumnDescriptor, Field};
use super::sort::compare_values;

/// Row filter parsed from the search bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Bare text, matched case-insensitively against every cell.
    Text(String),
    Compare {
        field: String,
        op: CompareOp,
        value: CellValue,
    },
    IsEmpty(String),
    IsNotEmpty(String),
    In {
        field: String,
        values: Vec<CellValue>,
    },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
}

/// Parse a filter expression.
///
/// Supported syntax:
/// - `field > value`, `field < value`, `field >= value`, `field <= value`
/// - `field = value`, `field != value`, `field = 'quoted value'`
/// - `field IS EMPTY`, `field IS NOT EMPTY`
/// - `field IN ('a', 'b', 'c')`
/// - Combinators: `expr AND expr`, `expr OR expr`
/// - Anything else is free text searched across all cells.
///
/// Fields are referenced by column id or label, case-insensitively.
pub fn parse_filter(input: &str) -> Result<Filter> {
    let input = input.trim();
    if input.is_empty() {
        bail!("empty filter expression");
    }
    let upper = input.to_uppercase();
    for keyword in ["AND", "OR"] {
        if upper.starts_with(&format!("{} ", keyword))
            || upper.ends_with(&format!(" {}", keyword))
        {
            bail!("dangling {} in filter expression", keyword);
        }
    }
    parse_or_expr(input)
}

fn parse_or_expr(input: &str) -> Result<Filter> {
    let Some((left, right)) = split_combinator(input, " OR ") else {
        return parse_and_expr(input);
    };
    let l = parse_and_expr(left)?;
    let r = parse_or_expr(right)?;
    Ok(Filter::Or(Box::new(l), Box::new(r)))
}

fn parse_and_expr(input: &str) -> Result<Filter> {
    let Some((left, right)) = split_combinator(input, " AND ") else {
        return parse_term(input);
    };
    let l = parse_term(left)?;
    let r = parse_and_expr(right)?;
    Ok(Filter::And(Box::new(l), Box::new(r)))
}

/// Split on first occurrence of combinator, respecting quoted strings.
fn split_combinator<'a>(input: &'a str, combinator: &str) -> Option<(&'a str, &'a str)> {
    find_keyword_pos(input, combinator).map(|i| {
        let left = &input[..i];
        let right = &input[i + combinator.len()..];
        (left.trim(), right.trim())
    })
}

fn parse_term(input: &str) -> Result<Filter> {
    let input = input.trim();
    if input.is_empty() {
        bail!("missing expression around AND/OR");
    }
    if let Some(col) = strip_suffix_ci(input, " IS NOT EMPTY") {
        return Ok(Filter::IsNotEmpty(field_name(col)?));
    }

    if let Some(col) = strip_suffix_ci(input, " IS EMPTY") {
        return Ok(Filter::IsEmpty(field_name(col)?));
    }

    if let Some(in_pos) = find_keyword_pos(input, " IN ") {
        let col = &input[..in_pos];
        let list_part = input[in_pos + 4..].trim();
        if list_part.starts_with('(') && list_part.ends_with(')') {
            let inner = &list_part[1..list_part.len() - 1];
            let values = parse_list_values(inner).into_iter().map(parse_value).collect();
            return Ok(Filter::In {
                field: field_name(col)?,
                values,
            });
        }
        bail!("invalid IN expression: {}", input);
    }

    let operators = [
        (">=", CompareOp::GtEq),
        ("<=", CompareOp::LtEq),
        ("!=", CompareOp::NotEq),
        (">", CompareOp::Gt),
        ("<", CompareOp::Lt),
        ("=", CompareOp::Eq),
    ];
    for (token, op) in operators {
        let Some(pos) = find_keyword_pos(input, token) else {
            continue;
        };
        let col = &input[..pos];
        let val_str = input[pos + token.len()..].trim();
        if val_str.is_empty() {
            bail!("missing value after '{}' in: {}", token, input);
        }
        return Ok(Filter::Compare {
            field: field_name(col)?,
            op,
            value: parse_value(val_str),
        });
    }

    Ok(Filter::Text(unquote(input).to_lowercase()))
}

/// `input` without an ASCII `suffix`, matched case-insensitively.
fn strip_suffix_ci<'a>(input: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = input.len().checked_sub(suffix.len())?;
    if !input.is_char_boundary(cut) {
        return None;
    }
    let (head, tail) = input.split_at(cut);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

fn field_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        bail!("missing field name");
    }
    Ok(name.to_string())
}

/// Position of `keyword` (matched case-insensitively) outside of quotes.
fn find_keyword_pos(input: &str, keyword: &str) -> Option<usize> {
    let upper = input.to_uppercase();
    if upper.len() != input.len() {
        // Case mapping changed byte offsets; fall back to an exact match.
        return find_outside_quotes(input, keyword);
    }
    find_outside_quotes(&upper, &keyword.to_uppercase())
}

fn find_outside_quotes(haystack: &str, needle: &str) -> Option<usize> {
    let mut in_quote = false;
    for (i, c) in haystack.char_indices() {
        if c == '\'' {
            in_quote = !in_quote;
        }
        if !in_quote && haystack[i..].starts_with(needle) {
            return Some(i);
        }
    }
    None
}

fn parse_list_values(input: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in input.chars() {
        match c {
            '\'' => in_quote = !in_quote,
            ',' if !in_quote => {
                let trimmed = current.trim().to_string();
                if !trimmed.is_empty() {
                    values.push(format!("'{}'", trimmed));
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let trimmed = current.trim().to_string();
    if !trimmed.is_empty() {
        values.push(format!("'{}'", trimmed));
    }
    values
}

fn unquote(val: &str) -> &str {
    let val = val.trim();
    if val.len() >= 2 && val.starts_with('\'') && val.ends_with('\'') {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

/// Quoted values are text; unquoted values become numbers when they parse as one.
fn parse_value<S: AsRef<str>>(val: S) -> CellValue {
    let val = val.as_ref().trim();
    let inner = unquote(val);
    if inner.len() != val.len() {
        return CellValue::Text(inner.to_string());
    }
    match val.parse::<f64>() {
        Ok(n) => CellValue::Number(n),
        Err(_) => CellValue::Text(val.to_string()),
    }
}

impl Filter {
    /// Fail when the filter names a field the table does not have.
    pub fn check_fields(&self, columns: &[ColumnDescriptor]) -> Result<()> {
        match self {
            Filter::Text(_) => Ok(()),
            Filter::Compare { field, .. }
            | Filter::IsEmpty(field)
            | Filter::IsNotEmpty(field)
            | Filter::In { field, .. } => {
                if columns.iter().any(|c| column_matches(c, field)) {
                    Ok(())
                } else {
                    bail!("unknown field '{}'", field)
                }
            }
            Filter::And(l, r) | Filter::Or(l, r) => {
                l.check_fields(columns)?;
                r.check_fields(columns)
            }
        }
    }

    pub fn matches<T>(&self, row: &T, fields: &[Field<T>]) -> bool {
        match self {
            Filter::Text(needle) => fields
                .iter()
                .any(|f| f.value(row).to_string().to_lowercase().contains(needle)),
            Filter::Compare { field, op, value } => {
                cell(row, fields, field).is_some_and(|c| compare(&c, *op, value))
            }
            Filter::IsEmpty(field) => cell(row, fields, field).is_some_and(|c| c.is_empty()),
            Filter::IsNotEmpty(field) => cell(row, fields, field).is_some_and(|c| !c.is_empty()),
            Filter::In { field, values } => cell(row, fields, field)
                .is_some_and(|c| values.iter().any(|v| compare(&c, CompareOp::Eq, v))),
            Filter::And(l, r) => l.matches(row, fields) && r.matches(row, fields),
            Filter::Or(l, r) => l.matches(row, fields) || r.matches(row, fields),
        }
    }
}

fn column_matches(column: &ColumnDescriptor, name: &str) -> bool {
    column.id.eq_ignore_ascii_case(name) || column.label.eq_ignore_ascii_case(name)
}

fn cell<T>(row: &T, fields: &[Field<T>], name: &str) -> Option<CellValue> {
    fields
        .iter()
        .find(|f| column_matches(&f.column, name))
        .map(|f| f.value(row))
}

fn compare(cell: &CellValue, op: CompareOp, value: &CellValue) -> bool {
    let ord = match (cell, value) {
        (CellValue::Number(_), CellValue::Number(_)) => compare_values(cell, value),
        _ => cell
            .to_string()
            .to_lowercase()
            .cmp(&value.to_string().to_lowercase()),
    };
    match op {
        CompareOp::Eq => ord.is_eq(),
        CompareOp::NotEq => ord.is_ne(),
        CompareOp::Gt => ord.is_gt(),
        CompareOp::Lt => ord.is_lt(),
        CompareOp::GtEq => ord.is_ge(),
        CompareOp::LtEq => ord.is_le(),
    }
}
