//! Plain-text tables for terminal output.

use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Renders `rows` under `headers`, two spaces between columns, with a dashed
/// rule below the header. Columns without an explicit alignment are left
/// aligned; trailing whitespace is trimmed from every line.
pub fn render_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| cell_width(h).max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&header_cells, &widths, &[]));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let rule_cells = rule.iter().map(String::as_str).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&rule_cells, &widths, &[]));
    for row in rows {
        let cells = row.iter().map(String::as_str).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", format_line(&cells, &widths, aligns));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) {
    print!("{}", render_table(headers, rows, aligns));
}

fn format_line(cells: &[&str], widths: &[usize], aligns: &[Align]) -> String {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = flatten(cells.get(idx).copied().unwrap_or(""));
        let padding = width.saturating_sub(cell_width(&cell));
        match aligns.get(idx).copied().unwrap_or_default() {
            Align::Left => {
                line.push_str(&cell);
                line.push_str(&" ".repeat(padding));
            }
            Align::Right => {
                line.push_str(&" ".repeat(padding));
                line.push_str(&cell);
            }
        }
    }
    line.trim_end().to_string()
}

fn cell_width(value: &str) -> usize {
    value.chars().count()
}

/// Line breaks and tabs would tear the grid apart.
fn flatten(value: &str) -> String {
    value
        .chars()
        .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
        .collect()
}
