//! In-memory form of the template: plain data that can be inspected before
//! anything is written to disk.

use std::{collections::BTreeMap, path::Path};

use tracing::debug;

use crate::{
    Result,
    error::Error,
    workbook::{
        builder::WorkbookBuilder, cell::CellValue, range::CellRange, style::Style,
        validation::DataValidation,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: Style,
}

/// One worksheet. Rows are 1-based, columns 0-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    cells: BTreeMap<(u32, u32), Cell>,
    merges: Vec<CellRange>,
    dropdowns: Vec<DataValidation>,
    column_widths: BTreeMap<u32, f64>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            dropdowns: Vec::new(),
            column_widths: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes or replaces a cell.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue, style: &Style) {
        self.cells.insert(
            (row, col),
            Cell {
                value,
                style: style.clone(),
            },
        );
    }

    /// Writes `values` left to right from column A, one style for all of them.
    pub fn set_row<S: AsRef<str>>(&mut self, row: u32, values: &[S], style: &Style) {
        for (col, v) in values.iter().enumerate() {
            self.set(row, col as u32, CellValue::text_or_blank(v.as_ref()), style);
        }
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    pub fn value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cell(row, col).map(|c| &c.value)
    }

    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        self.value(row, col).and_then(CellValue::as_text)
    }

    pub fn formula(&self, row: u32, col: u32) -> Option<&str> {
        self.value(row, col).and_then(CellValue::as_formula)
    }

    /// First row whose column A holds exactly `label`.
    pub fn find_row(&self, label: &str) -> Option<u32> {
        self.cells
            .iter()
            .find(|((_, col), cell)| *col == 0 && cell.value.as_text() == Some(label))
            .map(|((row, _), _)| *row)
    }

    pub fn last_row(&self) -> u32 {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0)
    }

    /// Title cell spanning `range`, value stored in its top-left corner.
    pub fn merge(&mut self, range: CellRange, value: CellValue, style: &Style) {
        self.set(range.first_row, range.first_col, value, style);
        self.merges.push(range);
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn add_dropdown(&mut self, validation: DataValidation) {
        self.dropdowns.push(validation);
    }

    pub fn dropdowns(&self) -> &[DataValidation] {
        &self.dropdowns
    }

    /// Dropdown covering `(row, col)`, if any.
    pub fn dropdown_at(&self, row: u32, col: u32) -> Option<&DataValidation> {
        self.dropdowns.iter().find(|dv| dv.range.contains(row, col))
    }

    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col, width);
    }

    pub fn column_width(&self, col: u32) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Streams the sheet through a workbook writer in row order.
    fn write_to(&self, wb: &mut crate::workbook::Workbook) -> Result<()> {
        let writer = wb.add_sheet(&self.name)?;
        for (&col, &width) in &self.column_widths {
            writer.set_column_width(col, width);
        }
        for range in &self.merges {
            writer.merge_range(*range)?;
        }
        for dv in &self.dropdowns {
            writer.add_data_validation(dv.clone());
        }

        let mut rows: BTreeMap<u32, Vec<(u32, &Cell)>> = BTreeMap::new();
        for (&(row, col), cell) in &self.cells {
            rows.entry(row).or_default().push((col, cell));
        }
        for (row, cells) in rows {
            writer.write_cells_at(
                row,
                cells
                    .into_iter()
                    .map(|(col, cell)| (col, &cell.value, Some(&cell.style))),
            )?;
        }
        debug!(sheet = %self.name, rows = self.last_row(), "sheet written");
        Ok(())
    }
}

/// Ordered collection of sheets saved as one workbook.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    sheets: Vec<Sheet>,
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    pub fn push(&mut self, sheet: Sheet) -> Result<()> {
        if self.sheet(sheet.name()).is_some() {
            return Err(Error::AlreadyExists(format!(
                "Sheet '{}' already exists",
                sheet.name()
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Writes the workbook to `path`, overwriting any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut wb = WorkbookBuilder::new(path).build()?;
        for sheet in &self.sheets {
            sheet.write_to(&mut wb)?;
        }
        wb.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_existing_cell() {
        let mut sheet = Sheet::new("S");
        let style = Style::new();
        sheet.set(3, 3, CellValue::Blank, &style);
        sheet.set(3, 3, CellValue::formula("TODAY()"), &style.clone().bold());
        assert_eq!(sheet.formula(3, 3), Some("TODAY()"));
        assert!(sheet.cell(3, 3).unwrap().style.font.bold);
    }

    #[test]
    fn set_row_stores_empty_strings_as_blank() {
        let mut sheet = Sheet::new("S");
        sheet.set_row(2, &["A", "", "C"], &Style::new());
        assert_eq!(sheet.text(2, 0), Some("A"));
        assert_eq!(sheet.value(2, 1), Some(&CellValue::Blank));
        assert_eq!(sheet.find_row("A"), Some(2));
        assert_eq!(sheet.last_row(), 2);
    }

    #[test]
    fn duplicate_sheet_names_are_rejected() {
        let mut doc = Document::new();
        doc.push(Sheet::new("Uno")).unwrap();
        assert!(doc.push(Sheet::new("Uno")).is_err());
        assert_eq!(doc.sheet_names(), ["Uno"]);
    }

    #[test]
    fn dropdown_lookup_by_cell() {
        let mut sheet = Sheet::new("S");
        sheet.add_dropdown(DataValidation::list(CellRange::column(5, 3, 7), &["Pass"]));
        assert!(sheet.dropdown_at(7, 5).is_some());
        assert!(sheet.dropdown_at(8, 5).is_none());
    }
}
