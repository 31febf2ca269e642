//! Console output for result tables.

use super::types::ResultTable;
use crate::console_format::{TableWriter, get_terminal_width};
use std::io;

/// Format a table as plain lines, cells separated by a single space.
pub fn format_plain(table: &ResultTable) -> String {
    let mut out = String::new();
    for row in table.lines() {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out
}

/// Print a table as plain lines.
pub fn print_plain(table: &ResultTable) {
    print!("{}", format_plain(table));
}

/// Print a table with box borders, sized to the terminal.
pub fn print_pretty(table: &ResultTable) -> io::Result<()> {
    let stdout = io::stdout();
    let mut writer = TableWriter::new(stdout.lock(), get_terminal_width());
    writer.write_table(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Cell;

    #[test]
    fn test_format_plain() {
        let mut table = ResultTable::new(&["Status", "Count"]);
        table.push_row(vec![Cell::from("Final"), Cell::Count(2)]);
        table.push_row(vec![Cell::from("Total"), Cell::Count(2)]);
        assert_eq!(format_plain(&table), "Status Count\nFinal 2\nTotal 2\n");
    }
}
