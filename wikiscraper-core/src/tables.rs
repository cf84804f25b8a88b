// Table extraction: HTML table -> labelled grid -> value counts

use crate::error::{CoreError, Result};
use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};
use serde::Serialize;
use std::collections::HashMap;
use wikiscraper_scanner::document::element_text;

lazy_static! {
    static ref ROW: Selector = Selector::parse("tr").expect("valid selector");
}

/// Upper bound for `colspan`/`rowspan` so a broken attribute cannot blow up the grid.
const MAX_SPAN: usize = 1000;

/// A table as labelled rows and columns.
///
/// `rows[i]` holds the data cells of the row labelled `index[i]`; every row
/// has exactly `columns.len()` cells. Header and row labels are not data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableGrid {
    pub index_name: Option<String>,
    pub columns: Vec<String>,
    pub index: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableExtraction {
    pub grid: TableGrid,
    pub value_counts: Vec<ValueCount>,
}

/// Pick the `number`-th table (1-based).
pub fn get_nth_table<T: Copy>(tables: &[T], number: usize) -> Result<T> {
    if number < 1 || number > tables.len() {
        return Err(CoreError::Range {
            requested: number,
            available: tables.len(),
        });
    }
    Ok(tables[number - 1])
}

/// Ways of reading a cell matrix as a grid, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridStrategy {
    /// First column holds the row labels.
    RowLabelled,
    /// Rows are labelled by their position.
    Positional,
}

const GRID_STRATEGIES: [GridStrategy; 2] = [GridStrategy::RowLabelled, GridStrategy::Positional];

impl GridStrategy {
    fn build(self, matrix: &[Vec<String>], first_row_is_header: bool) -> Option<TableGrid> {
        let width = matrix.first()?.len();
        let label_columns = match self {
            GridStrategy::RowLabelled if width < 2 => return None,
            GridStrategy::RowLabelled => 1,
            GridStrategy::Positional => 0,
        };

        let (header, body) = if first_row_is_header {
            let (first, rest) = matrix.split_first()?;
            (Some(first), rest)
        } else {
            (None, matrix)
        };

        let columns = (label_columns..width)
            .map(|position| match header {
                Some(labels) if !labels[position].is_empty() => labels[position].clone(),
                _ => position.to_string(),
            })
            .collect();
        let index_name = match (self, header) {
            (GridStrategy::RowLabelled, Some(labels)) if !labels[0].is_empty() => Some(labels[0].clone()),
            _ => None,
        };

        let mut index = Vec::with_capacity(body.len());
        let mut rows = Vec::with_capacity(body.len());
        for (position, row) in body.iter().enumerate() {
            index.push(match self {
                GridStrategy::RowLabelled => row[0].clone(),
                GridStrategy::Positional => position.to_string(),
            });
            rows.push(row[label_columns..].to_vec());
        }

        Some(TableGrid {
            index_name,
            columns,
            index,
            rows,
        })
    }
}

/// Parse `table` into a grid.
///
/// With `first_row_is_header` the first row labels the columns, otherwise the
/// columns are labelled by position. Data rows and columns that are empty in
/// every data cell are dropped; a table with no data left is an error.
pub fn to_grid(table: ElementRef<'_>, first_row_is_header: bool) -> Result<TableGrid> {
    let matrix = cell_matrix(table);
    let mut grid = GRID_STRATEGIES
        .iter()
        .find_map(|strategy| strategy.build(&matrix, first_row_is_header))
        .ok_or_else(|| CoreError::EmptyContent("table has no rows".to_string()))?;

    drop_empty(&mut grid);
    if grid.rows.is_empty() || grid.columns.is_empty() {
        return Err(CoreError::EmptyContent(
            "table has no data rows after cleaning".to_string(),
        ));
    }
    Ok(grid)
}

/// Count each distinct trimmed, non-empty data cell value.
///
/// Sorted by descending count; equal counts keep first-encounter order
/// (row by row, left to right).
pub fn value_counts(grid: &TableGrid) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for cell in grid.rows.iter().flatten() {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        match positions.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn extract_table(table: ElementRef<'_>, first_row_is_header: bool) -> Result<TableExtraction> {
    let grid = to_grid(table, first_row_is_header)?;
    let value_counts = value_counts(&grid);
    Ok(TableExtraction { grid, value_counts })
}

/// Rows that belong to `table` itself, not to tables nested in its cells.
fn own_rows<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    let table_id = table.id();
    table.select(&ROW).filter(move |row| {
        row.ancestors()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "table")
            .is_some_and(|owner| owner.id() == table_id)
    })
}

fn span(cell: ElementRef<'_>, attr: &str) -> usize {
    cell.value()
        .attr(attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
        .min(MAX_SPAN)
}

/// Cell texts as a rectangular matrix, `colspan`/`rowspan` expanded by
/// repeating the spanning cell's text.
fn cell_matrix(table: ElementRef<'_>) -> Vec<Vec<String>> {
    let mut matrix: Vec<Vec<String>> = Vec::new();
    // Per column: remaining rows and text of a cell spanning down into them
    let mut carried: Vec<Option<(usize, String)>> = Vec::new();

    for row in own_rows(table) {
        let mut cells = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "td" | "th"));
        let mut out: Vec<String> = Vec::new();

        loop {
            let col = out.len();
            if let Some(text) = take_carried(&mut carried, col) {
                out.push(text);
                continue;
            }
            let Some(cell) = cells.next() else {
                if carried.iter().skip(col).any(Option::is_some) {
                    out.push(String::new());
                    continue;
                }
                break;
            };

            let text = element_text(cell);
            let rowspan = span(cell, "rowspan");
            for _ in 0..span(cell, "colspan") {
                let col = out.len();
                if rowspan > 1 {
                    if carried.len() <= col {
                        carried.resize(col + 1, None);
                    }
                    carried[col] = Some((rowspan - 1, text.clone()));
                }
                out.push(text.clone());
            }
        }

        if !out.is_empty() {
            matrix.push(out);
        }
    }

    let width = matrix.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut matrix {
        row.resize(width, String::new());
    }
    matrix
}

fn take_carried(carried: &mut [Option<(usize, String)>], col: usize) -> Option<String> {
    let slot = carried.get_mut(col)?;
    let (remaining, text) = slot.as_mut()?;
    let value = text.clone();
    *remaining -= 1;
    if *remaining == 0 {
        *slot = None;
    }
    Some(value)
}

fn drop_empty(grid: &mut TableGrid) {
    let keep_rows: Vec<bool> = grid
        .rows
        .iter()
        .map(|row| row.iter().any(|c| !c.trim().is_empty()))
        .collect();
    let mut keep = keep_rows.iter();
    grid.index.retain(|_| *keep.next().unwrap_or(&false));
    let mut keep = keep_rows.iter();
    grid.rows.retain(|_| *keep.next().unwrap_or(&false));

    let keep_columns: Vec<bool> = (0..grid.columns.len())
        .map(|c| grid.rows.iter().any(|row| !row[c].trim().is_empty()))
        .collect();
    let mut keep = keep_columns.iter();
    grid.columns.retain(|_| *keep.next().unwrap_or(&false));
    for row in &mut grid.rows {
        let mut keep = keep_columns.iter();
        row.retain(|_| *keep.next().unwrap_or(&false));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_table_grid(html: &str, header: bool) -> Result<TableGrid> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse("table").unwrap();
        let table = doc.select(&selector).next().unwrap();
        to_grid(table, header)
    }

    #[test]
    fn test_get_nth_table_bounds() {
        let tables = ["a", "b"];
        assert_eq!(get_nth_table(&tables, 1).unwrap(), "a");
        assert_eq!(get_nth_table(&tables, 2).unwrap(), "b");
        assert!(matches!(
            get_nth_table(&tables, 0),
            Err(CoreError::Range { requested: 0, available: 2 })
        ));
        assert!(matches!(
            get_nth_table(&tables, 3),
            Err(CoreError::Range { requested: 3, available: 2 })
        ));
    }

    #[test]
    fn test_colspan_and_rowspan_are_expanded() {
        let grid = first_table_grid(
            r#"<table>
                <tr><th>Name</th><th colspan="2">Stats</th></tr>
                <tr><td rowspan="2">Ekans</td><td>1</td><td>2</td></tr>
                <tr><td>3</td><td>4</td></tr>
            </table>"#,
            true,
        )
        .unwrap();
        assert_eq!(grid.index_name.as_deref(), Some("Name"));
        assert_eq!(grid.columns, vec!["Stats", "Stats"]);
        assert_eq!(grid.index, vec!["Ekans", "Ekans"]);
        assert_eq!(grid.rows, vec![vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn test_single_column_table_falls_back_to_positional_index() {
        let grid = first_table_grid("<table><tr><td>a</td></tr><tr><td>b</td></tr></table>", false).unwrap();
        assert_eq!(grid.index, vec!["0", "1"]);
        assert_eq!(grid.columns, vec!["0"]);
        assert_eq!(grid.rows, vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_empty_rows_and_columns_are_dropped() {
        let grid = first_table_grid(
            r#"<table>
                <tr><td>x</td><td>1</td><td></td></tr>
                <tr><td>y</td><td> </td><td></td></tr>
                <tr><td>z</td><td>2</td></tr>
            </table>"#,
            false,
        )
        .unwrap();
        assert_eq!(grid.index, vec!["x", "z"]);
        assert_eq!(grid.columns, vec!["1"]);
        assert_eq!(grid.rows, vec![vec!["1"], vec!["2"]]);
    }

    #[test]
    fn test_table_without_data_is_empty_content() {
        let err = first_table_grid("<table><tr><th>Only</th><th>Header</th></tr></table>", true).unwrap_err();
        assert!(matches!(err, CoreError::EmptyContent(_)));
    }

    #[test]
    fn test_value_counts_ties_keep_first_encounter() {
        let grid = TableGrid {
            index_name: None,
            columns: vec!["1".into(), "2".into()],
            index: vec!["a".into(), "b".into()],
            rows: vec![vec!["y".into(), "x".into()], vec!["x ".into(), "y".into()]],
        };
        let counts = value_counts(&grid);
        assert_eq!(
            counts,
            vec![
                ValueCount { value: "y".into(), count: 2 },
                ValueCount { value: "x".into(), count: 2 },
            ]
        );
    }
}
