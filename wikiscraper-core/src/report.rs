// Plain-text rendering of results

use crate::article::ArticleWordCount;
use crate::crawl::CrawlSummary;
use crate::frequency::ComparisonRow;
use crate::tables::{TableGrid, ValueCount};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Lay out `header` and `rows` as left-aligned columns separated by two spaces.
fn render_columns(header: &[String], rows: &[Vec<String>]) -> String {
    let width_of = |s: &str| s.chars().count();
    let mut widths: Vec<usize> = header.iter().map(|h| width_of(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i >= widths.len() {
                widths.push(0);
            }
            widths[i] = widths[i].max(width_of(cell));
        }
    }

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{}{}", cell, " ".repeat(widths[i] - width_of(cell))))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(header));
    out.push('\n');
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    out.push_str(&"─".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn render_grid(grid: &TableGrid) -> String {
    let mut header = vec![grid.index_name.clone().unwrap_or_default()];
    header.extend(grid.columns.iter().cloned());
    let rows: Vec<Vec<String>> = grid
        .index
        .iter()
        .zip(&grid.rows)
        .map(|(label, cells)| {
            let mut row = vec![label.clone()];
            row.extend(cells.iter().cloned());
            row
        })
        .collect();
    render_columns(&header, &rows)
}

pub fn render_value_counts(counts: &[ValueCount]) -> String {
    let header = vec!["Value".to_string(), "Count".to_string()];
    let rows: Vec<Vec<String>> = counts
        .iter()
        .map(|c| vec![c.value.clone(), c.count.to_string()])
        .collect();
    render_columns(&header, &rows)
}

fn format_ratio(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

pub fn render_comparison(rows: &[ComparisonRow]) -> String {
    let header = vec![
        "Word".to_string(),
        "Article".to_string(),
        "Language".to_string(),
    ];
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| vec![r.word.clone(), format_ratio(r.article), format_ratio(r.language)])
        .collect();
    render_columns(&header, &body)
}

pub fn render_word_count(outcome: &ArticleWordCount) -> String {
    format!(
        "Counted {} words ({} distinct) in '{}'; {} now holds {} distinct words\n",
        outcome.article_words,
        outcome.article_distinct,
        outcome.phrase,
        outcome.store_path.display(),
        outcome.store_distinct
    )
}

/// Generate a crawl report from a finished crawl
pub fn render_crawl_report(summary: &CrawlSummary) -> String {
    let report = &summary.report;
    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n\n# Summary:\n");
    out.push_str(&format!("  Pages processed: {}\n", report.pages_processed()));
    out.push_str(&format!("  Deepest level: {}\n", report.max_depth_reached()));
    let total_links: usize = report.pages.iter().map(|p| p.links_found).sum();
    out.push_str(&format!("  Total links found: {}\n", total_links));
    out.push_str(&format!(
        "  Word store: {} ({} distinct, {} total)\n",
        summary.store_path.display(),
        summary.distinct_words,
        summary.total_words
    ));
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");

    for page in &report.pages {
        out.push_str(&format!(
            "  [{}] {} ({} links, {} queued)\n",
            page.depth, page.phrase, page.links_found, page.links_queued
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid_aligns_columns() {
        let grid = TableGrid {
            index_name: Some("Type".to_string()),
            columns: vec!["Jessie".to_string(), "James".to_string()],
            index: vec!["Fire".to_string(), "Water".to_string()],
            rows: vec![
                vec!["2".to_string(), "1".to_string()],
                vec!["2".to_string(), "3".to_string()],
            ],
        };
        let text = render_grid(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Type   Jessie  James");
        assert_eq!(lines[2], "Fire   2       1");
        assert_eq!(lines[3], "Water  2       3");
    }

    #[test]
    fn test_render_comparison_marks_missing_values() {
        let rows = vec![ComparisonRow {
            word: "rocket".to_string(),
            article: Some(1.0),
            language: None,
        }];
        let text = render_comparison(&rows);
        assert!(text.lines().nth(2).unwrap().starts_with("rocket  1.0000"));
        assert!(text.lines().nth(2).unwrap().ends_with('-'));
    }
}
