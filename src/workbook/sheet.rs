use std::{
    cell::RefCell,
    io::{BufWriter, Write},
    rc::Rc,
};

use tempfile::NamedTempFile;

use crate::{
    Result,
    error::Error,
    workbook::{
        cell::CellValue,
        make_cell_ref,
        range::CellRange,
        style::{Style, StyleRegistry},
        validation::{DataValidation, data_validations_xml},
        write_cell,
    },
};

/// Streams one worksheet's rows to a temp file. Rows are 1-based and must be
/// written in ascending order; columns are 0-based.
pub struct SheetWriter {
    name: String,
    pub(crate) temp: BufWriter<NamedTempFile>,
    styles: Rc<RefCell<StyleRegistry>>,
    current_row: u32,
    max_col: u32,
    col_widths: Vec<(u32, f64)>,
    merges: Vec<CellRange>,
    validations: Vec<DataValidation>,
}

impl SheetWriter {
    pub(crate) fn new(name: &str, styles: Rc<RefCell<StyleRegistry>>) -> Result<Self> {
        let temp_file = NamedTempFile::new()?;

        Ok(SheetWriter {
            name: name.to_string(),
            temp: BufWriter::new(temp_file),
            styles,
            current_row: 0,
            max_col: 0,
            col_widths: Vec::new(),
            merges: Vec::new(),
            validations: Vec::new(),
        })
    }

    pub fn current_row(&self) -> u32 {
        self.current_row
    }

    pub fn write_row(&mut self, cells: &[CellValue]) -> Result<()> {
        let row = self.current_row + 1;
        self.write_cells_at(row, cells.iter().enumerate().map(|(c, v)| (c as u32, v, None)))
    }

    pub fn write_row_with_style(&mut self, cells: &[CellValue], style: &Style) -> Result<()> {
        let row = self.current_row + 1;
        self.write_cells_at(
            row,
            cells.iter().enumerate().map(|(c, v)| (c as u32, v, Some(style))),
        )
    }

    /// Writes `(column, value, style)` triples into `row`. Skipped rows stay empty.
    pub fn write_cells_at<'a, I>(&mut self, row: u32, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = (u32, &'a CellValue, Option<&'a Style>)>,
    {
        if row == 0 || row <= self.current_row {
            return Err(Error::RowOutOfOrder {
                sheet: self.name.clone(),
                row,
                last: self.current_row,
            });
        }
        self.current_row = row;

        let mut opened = false;
        for (col, value, style) in cells {
            if !opened {
                write!(self.temp, "<row r=\"{row}\">")?;
                opened = true;
            }
            self.max_col = self.max_col.max(col + 1);
            let style_idx = style.map(|s| self.styles.borrow_mut().register(s));
            let cell_ref = make_cell_ref(row, col); // e.g "A1", "B2"
            write_cell(&mut self.temp, &cell_ref, value, style_idx)?;
        }
        if opened {
            writeln!(self.temp, "</row>")?;
        }

        Ok(())
    }

    pub fn merge_range(&mut self, range: CellRange) -> Result<()> {
        if range.is_single_cell() {
            return Ok(());
        }
        if let Some(other) = self.merges.iter().find(|m| overlaps(m, &range)) {
            return Err(Error::AlreadyExists(format!(
                "merged range {range} overlaps {other} in sheet '{}'",
                self.name
            )));
        }
        self.merges.push(range);
        Ok(())
    }

    pub fn add_data_validation(&mut self, validation: DataValidation) {
        self.validations.push(validation);
    }

    /// Width in Excel character units for a 0-based column.
    pub fn set_column_width(&mut self, col: u32, width: f64) {
        match self.col_widths.iter_mut().find(|(c, _)| *c == col) {
            Some(entry) => entry.1 = width,
            None => self.col_widths.push((col, width)),
        }
    }

    pub(crate) fn head_xml(&self) -> String {
        let mut out = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        ));
        if self.current_row > 0 && self.max_col > 0 {
            out.push_str(&format!(
                "<dimension ref=\"{}\"/>",
                CellRange::new(1, 0, self.current_row, self.max_col - 1)
            ));
        }
        out.push_str(r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#);
        out.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);

        if !self.col_widths.is_empty() {
            let mut widths = self.col_widths.clone();
            widths.sort_by_key(|(c, _)| *c);
            out.push_str("<cols>");
            for (col, width) in widths {
                let n = col + 1;
                out.push_str(&format!(
                    "<col min=\"{n}\" max=\"{n}\" width=\"{width}\" customWidth=\"1\"/>"
                ));
            }
            out.push_str("</cols>");
        }
        out.push_str("<sheetData>");
        out
    }

    pub(crate) fn tail_xml(&self) -> String {
        let mut out = String::from("</sheetData>");
        if !self.merges.is_empty() {
            out.push_str(&format!("<mergeCells count=\"{}\">", self.merges.len()));
            for m in &self.merges {
                out.push_str(&format!("<mergeCell ref=\"{m}\"/>"));
            }
            out.push_str("</mergeCells>");
        }
        out.push_str(&data_validations_xml(&self.validations));
        out.push_str(
            "<pageMargins left=\"0.75\" right=\"0.75\" top=\"1\" bottom=\"1\" header=\"0.5\" footer=\"0.5\"/>",
        );
        out.push_str("</worksheet>");
        out
    }

    pub(crate) fn finalize(&mut self) -> Result<()> {
        self.temp.flush()?;
        Ok(())
    }
}

fn overlaps(a: &CellRange, b: &CellRange) -> bool {
    a.first_row <= b.last_row
        && b.first_row <= a.last_row
        && a.first_col <= b.last_col
        && b.first_col <= a.last_col
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> SheetWriter {
        SheetWriter::new("Test", Rc::new(RefCell::new(StyleRegistry::new()))).unwrap()
    }

    fn no_cells<'a>() -> Vec<(u32, &'a CellValue, Option<&'a Style>)> {
        Vec::new()
    }

    #[test]
    fn rows_must_ascend() {
        let mut sheet = writer();
        sheet.write_row(&[CellValue::text("a")]).unwrap();
        sheet.write_cells_at(3, no_cells()).unwrap();
        let err = sheet.write_cells_at(2, no_cells()).unwrap_err();
        assert!(matches!(err, Error::RowOutOfOrder { row: 2, last: 3, .. }));
    }

    #[test]
    fn overlapping_merges_are_rejected() {
        let mut sheet = writer();
        sheet.merge_range(CellRange::row(1, 0, 9)).unwrap();
        assert!(sheet.merge_range(CellRange::row(1, 3, 4)).is_err());
        sheet.merge_range(CellRange::row(2, 0, 1)).unwrap();
    }

    #[test]
    fn sections_follow_schema_order() {
        let mut sheet = writer();
        sheet.write_row(&[CellValue::text("title")]).unwrap();
        sheet.set_column_width(1, 12.0);
        sheet.set_column_width(0, 20.0);
        sheet.merge_range(CellRange::row(1, 0, 3)).unwrap();
        sheet.add_data_validation(DataValidation::list(CellRange::column(0, 2, 4), &["x"]));

        let head = sheet.head_xml();
        assert!(head.contains("<dimension ref=\"A1\"/>"));
        assert!(head.ends_with(
            "<cols><col min=\"1\" max=\"1\" width=\"20\" customWidth=\"1\"/><col min=\"2\" max=\"2\" width=\"12\" customWidth=\"1\"/></cols><sheetData>"
        ));

        let tail = sheet.tail_xml();
        let merge = tail.find("<mergeCells").unwrap();
        let dv = tail.find("<dataValidations").unwrap();
        let margins = tail.find("<pageMargins").unwrap();
        assert!(merge < dv && dv < margins);
    }
}
