/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - Box-drawn table layout
/// - Column sizing against the terminal width
/// - Text truncation and padding
///
/// It accepts a ResultTable from the report module and renders it.
///
/// ## Output Flexibility
///
/// `TableWriter` writes to any `std::io::Write` destination, so the same
/// rendering backs stdout and in-memory buffers in tests.

use crate::report::ResultTable;
use std::io::{self, Write};
use std::sync::OnceLock;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest a column is allowed to shrink to
const MIN_COLUMN_WIDTH: usize = 8;

/// Writer for result tables
pub struct TableWriter<W: Write> {
    writer: W,
    max_width: usize,
}

impl<W: Write> TableWriter<W> {
    /// Create a new table writer that fits tables into `max_width` columns
    pub fn new(writer: W, max_width: usize) -> Self {
        Self { writer, max_width }
    }

    /// Write a full table: top border, header, separator, rows, bottom border
    pub fn write_table(&mut self, table: &ResultTable) -> io::Result<()> {
        let cells: Vec<Vec<String>> =
            table.lines().map(|row| row.iter().map(|c| c.to_string()).collect()).collect();
        let widths = column_widths(&cells, self.max_width);
        if widths.is_empty() {
            return Ok(());
        }

        self.write_border(&widths, '┌', '┬', '┐')?;
        let mut lines = cells.iter();
        if let Some(header) = lines.next() {
            self.write_row(header, &widths)?;
            self.write_border(&widths, '├', '┼', '┤')?;
        }
        for row in lines {
            self.write_row(row, &widths)?;
        }
        self.write_border(&widths, '└', '┴', '┘')
    }

    fn write_border(&mut self, widths: &[usize], left: char, mid: char, right: char) -> io::Result<()> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        writeln!(self.writer, "{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn write_row(&mut self, row: &[String], widths: &[usize]) -> io::Result<()> {
        let displays: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| truncate_with_padding(row.get(i).map(|s| s.as_str()).unwrap_or(""), *width))
            .collect();
        writeln!(self.writer, "│ {} │", displays.join(" │ "))
    }
}

/// Natural column widths, shrunk (widest first) until the table fits `max_width`
pub fn column_widths(rows: &[Vec<String>], max_width: usize) -> Vec<usize> {
    let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            // Multi-line cells are rendered on one line
            widths[i] = widths[i].max(display_width(&cell.replace('\n', " ")));
        }
    }

    // Borders: "│ " before each column, " │" after the last, " │ " between
    let borders = columns * 3 + 1;
    loop {
        let total: usize = widths.iter().sum::<usize>() + borders;
        if total <= max_width {
            break;
        }
        let Some((widest, &w)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if w <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[widest] = w.saturating_sub(total - max_width).max(MIN_COLUMN_WIDTH);
    }
    widths
}

//
// Console Width
//

static CONSOLE_WIDTH_OVERRIDE: OnceLock<usize> = OnceLock::new();

/// Set console width override (for testing)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH_OVERRIDE.set(width);
}

/// Get terminal width or default to 120
pub fn get_terminal_width() -> usize {
    if let Some(&w) = CONSOLE_WIDTH_OVERRIDE.get() {
        return w;
    }
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let s = s.replace('\n', " ");
    let display_w = display_width(&s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
            if current_width + c_width > target_width {
                break;
            }
            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        // Pad if needed
        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        format!("{}{}", s, " ".repeat(width - display_w))
    }
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
