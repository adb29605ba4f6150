use std::path::PathBuf;

use crate::{Result, workbook::Workbook};

pub struct WorkbookBuilder {
    path: PathBuf,
    sheets: Vec<String>,
}

impl WorkbookBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheets: vec![],
        }
    }

    /// Sheets created up front, in tab order.
    pub fn set_sheets<S: Into<String>>(mut self, sheets: Vec<S>) -> Self {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<Workbook> {
        Workbook::new_with_builder(self.path, self.sheets)
    }
}
