use std::path::PathBuf;

use crate::template::results::{SeedRecord, smoke_tests};

pub const DEFAULT_OUTPUT_PATH: &str =
    "/Users/nahueljaffe/Desktop/Resultados_Testing_Manual_Mishu.xlsx";

pub const DEFAULT_TESTERS: [&str; 3] = ["Nahuel", "QA Team", "Automated"];

/// Everything the generator needs. `Default` is the fixed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateConfig {
    pub output_path: PathBuf,
    pub seeds: Vec<SeedRecord>,
    pub testers: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        TemplateConfig {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            seeds: smoke_tests(),
            testers: DEFAULT_TESTERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl TemplateConfig {
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<SeedRecord>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_testers<S: Into<String>>(mut self, testers: Vec<S>) -> Self {
        self.testers = testers.into_iter().map(Into::into).collect();
        self
    }
}
