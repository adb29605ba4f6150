//! The manual QA results workbook: a results sheet with one row per smoke
//! test, an instructions sheet and a KPI sheet whose formulas point back at
//! the results.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::{Result, template::config::TemplateConfig, template::model::Document};

pub mod config;
pub mod instructions;
pub mod model;
pub mod results;
pub mod styles;
pub mod summary;

pub struct TemplateBuilder {
    config: TemplateConfig,
}

impl TemplateBuilder {
    pub fn new(config: TemplateConfig) -> Self {
        Self { config }
    }

    /// Lays out all three sheets in memory.
    pub fn build(&self) -> Result<Document> {
        let mut doc = Document::new();

        let (results_sheet, layout) = results::build(&self.config)?;
        debug!(seeds = layout.count, status_range = %layout.status_range(), "results sheet built");
        doc.push(results_sheet)?;

        doc.push(instructions::build())?;
        debug!(lines = instructions::LINES.len(), "instructions sheet built");

        doc.push(summary::build(&layout, &self.config.seeds))?;
        debug!("summary sheet built");

        Ok(doc)
    }

    /// Builds the document and writes it to the configured path, replacing any
    /// existing file.
    pub fn generate(&self) -> Result<PathBuf> {
        let doc = self.build()?;
        let path = self.config.output_path.clone();
        doc.save(&path)?;
        info!(path = %path.display(), sheets = doc.sheets().len(), "workbook saved");
        Ok(path)
    }
}

pub fn generate(config: TemplateConfig) -> Result<PathBuf> {
    TemplateBuilder::new(config).generate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_sheets_in_order() {
        let doc = TemplateBuilder::new(TemplateConfig::default()).build().unwrap();
        assert_eq!(
            doc.sheet_names(),
            [results::SHEET_NAME, instructions::SHEET_NAME, summary::SHEET_NAME]
        );
        assert_eq!(doc.sheet_names(), ["Resultados Tests", "Instrucciones", "Resumen KPIs"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = TemplateConfig::default().with_output_path(dir.path().join("nope/out.xlsx"));
        assert!(generate(config).is_err());
    }
}
