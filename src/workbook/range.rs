use std::fmt;

use crate::workbook::{col_to_letters, make_cell_ref};

/// Rectangular block of cells. Rows are 1-based, columns 0-based, as in
/// [`SheetWriter`](crate::workbook::sheet::SheetWriter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub first_row: u32,
    pub first_col: u32,
    pub last_row: u32,
    pub last_col: u32,
}

impl CellRange {
    pub fn new(first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> Self {
        CellRange {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }

    pub fn cell(row: u32, col: u32) -> Self {
        CellRange::new(row, col, row, col)
    }

    /// A run of rows inside one column, e.g. `F3:F7`.
    pub fn column(col: u32, first_row: u32, last_row: u32) -> Self {
        CellRange::new(first_row, col, last_row, col)
    }

    pub fn row(row: u32, first_col: u32, last_col: u32) -> Self {
        CellRange::new(row, first_col, row, last_col)
    }

    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_col..=self.last_col).contains(&col)
    }

    pub fn row_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }

    /// Same range qualified by a sheet name, e.g. `'Resultados Tests'!F3:F7`.
    pub fn on_sheet(&self, sheet: &str) -> String {
        format!("{}!{}", quote_sheet_name(sheet), self)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_cell() {
            return f.write_str(&make_cell_ref(self.first_row, self.first_col));
        }
        write!(
            f,
            "{}{}:{}{}",
            col_to_letters(self.first_col),
            self.first_row,
            col_to_letters(self.last_col),
            self.last_row
        )
    }
}

/// Sheet names with anything but letters, digits or `_` must be quoted in formulas.
pub fn quote_sheet_name(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return name.to_string();
    }
    format!("'{}'", name.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(CellRange::row(1, 0, 9).to_string(), "A1:J1");
        assert_eq!(CellRange::column(5, 3, 7).to_string(), "F3:F7");
        assert_eq!(CellRange::cell(4, 1).to_string(), "B4");
    }

    #[test]
    fn normalizes_corners() {
        assert_eq!(CellRange::new(7, 5, 3, 5), CellRange::column(5, 3, 7));
    }

    #[test]
    fn sheet_qualified_refs() {
        let r = CellRange::column(5, 3, 7);
        assert_eq!(r.on_sheet("Resultados Tests"), "'Resultados Tests'!F3:F7");
        assert_eq!(r.on_sheet("Resultados"), "Resultados!F3:F7");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
    }

    #[test]
    fn contains_and_count() {
        let r = CellRange::column(5, 3, 7);
        assert!(r.contains(3, 5));
        assert!(!r.contains(8, 5));
        assert_eq!(r.row_count(), 5);
    }
}
