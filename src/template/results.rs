use std::fmt;

use crate::{
    Result,
    error::Error,
    template::{config::TemplateConfig, model::Sheet, styles},
    workbook::{cell::CellValue, range::CellRange, validation::DataValidation},
};

pub const SHEET_NAME: &str = "Resultados Tests";
pub const TITLE: &str = "RESULTADOS DE TESTING MANUAL - MISHU QA";

pub const HEADER_ROW: u32 = 2;
pub const FIRST_SEED_ROW: u32 = 3;

pub const HEADERS: [&str; 10] = [
    "Test Scenario",
    "ID",
    "Test Case",
    "Fecha",
    "Tester",
    "Estado",
    "Observaciones",
    "Evidencia",
    "Screenshot",
    "Notas Adicionales",
];

pub const COL_DATE: u32 = 3;
pub const COL_TESTER: u32 = 4;
pub const COL_STATUS: u32 = 5;

const COLUMN_WIDTHS: [f64; 10] = [20.0, 12.0, 30.0, 15.0, 15.0, 12.0, 40.0, 20.0, 20.0, 30.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Fail,
    Skip,
    Blocked,
    Pending,
}

impl Status {
    /// Dropdown order.
    pub const ALL: [Status; 5] = [
        Status::Pass,
        Status::Fail,
        Status::Skip,
        Status::Blocked,
        Status::Pending,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
            Status::Skip => "Skip",
            Status::Blocked => "Blocked",
            Status::Pending => "Pendiente",
        }
    }

    pub fn from_label(label: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One pre-filled test case row awaiting manual execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRecord {
    pub scenario: String,
    pub id: String,
    pub title: String,
    pub tester: String,
    pub status: Status,
    pub observations: String,
    pub evidence: String,
    pub screenshot: String,
    pub notes: String,
}

impl SeedRecord {
    pub fn pending(scenario: &str, id: &str, title: &str) -> Self {
        SeedRecord {
            scenario: scenario.into(),
            id: id.into(),
            title: title.into(),
            tester: String::new(),
            status: Status::Pending,
            observations: String::new(),
            evidence: String::new(),
            screenshot: String::new(),
            notes: String::new(),
        }
    }

    /// Cells A..J, with the date column left empty.
    fn columns(&self) -> [&str; 10] {
        [
            self.scenario.as_str(),
            self.id.as_str(),
            self.title.as_str(),
            "",
            self.tester.as_str(),
            self.status.label(),
            self.observations.as_str(),
            self.evidence.as_str(),
            self.screenshot.as_str(),
            self.notes.as_str(),
        ]
    }
}

pub fn smoke_tests() -> Vec<SeedRecord> {
    [
        ("SMK-01", "Smoke – Login"),
        ("SMK-02", "Smoke – Navegación principal"),
        ("SMK-03", "Smoke – Connections list"),
        ("SMK-04", "Smoke – Mensajes en conversación"),
        ("SMK-05", "Smoke – Settings"),
    ]
    .into_iter()
    .map(|(id, title)| SeedRecord::pending("Smoke Test", id, title))
    .collect()
}

/// Where the seed rows landed, so other sheets can point at them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultsLayout {
    pub first_row: u32,
    pub count: u32,
}

impl ResultsLayout {
    pub fn last_row(&self) -> u32 {
        self.first_row + self.count - 1
    }

    pub fn status_range(&self) -> CellRange {
        CellRange::column(COL_STATUS, self.first_row, self.last_row())
    }

    pub fn tester_range(&self) -> CellRange {
        CellRange::column(COL_TESTER, self.first_row, self.last_row())
    }

    pub fn status_cell(&self, index: u32) -> CellRange {
        CellRange::cell(self.first_row + index, COL_STATUS)
    }
}

pub fn build(config: &TemplateConfig) -> Result<(Sheet, ResultsLayout)> {
    if config.seeds.is_empty() {
        return Err(Error::InvalidTemplate("no seed records".into()));
    }
    if config.testers.is_empty() {
        return Err(Error::InvalidTemplate("tester list is empty".into()));
    }
    for (i, seed) in config.seeds.iter().enumerate() {
        if config.seeds[..i].iter().any(|s| s.id == seed.id) {
            return Err(Error::InvalidTemplate(format!("duplicate test id '{}'", seed.id)));
        }
    }

    let layout = ResultsLayout {
        first_row: FIRST_SEED_ROW,
        count: config.seeds.len() as u32,
    };
    let statuses: Vec<&str> = Status::ALL.into_iter().map(Status::label).collect();
    let status_list = DataValidation::list(layout.status_range(), &statuses);
    let tester_list = DataValidation::list(layout.tester_range(), &config.testers);
    for (what, list) in [("status", &status_list), ("tester", &tester_list)] {
        list.check_list()
            .map_err(|e| Error::InvalidTemplate(format!("{what} dropdown: {e}")))?;
    }

    let mut sheet = Sheet::new(SHEET_NAME);

    sheet.merge(
        CellRange::row(1, 0, HEADERS.len() as u32 - 1),
        CellValue::text(TITLE),
        &styles::title(),
    );
    sheet.set_row(HEADER_ROW, &HEADERS, &styles::header());

    let body = styles::body();
    for (i, seed) in config.seeds.iter().enumerate() {
        let row = FIRST_SEED_ROW + i as u32;
        sheet.set_row(row, &seed.columns(), &body);
        sheet.set(
            row,
            COL_STATUS,
            CellValue::text(seed.status.label()),
            &styles::status(seed.status),
        );
    }

    sheet.add_dropdown(status_list);
    sheet.add_dropdown(tester_list);

    for (col, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        sheet.set_column_width(col as u32, width);
    }

    for row in layout.first_row..=layout.last_row() {
        sheet.set(row, COL_DATE, CellValue::formula("TODAY()"), &styles::date());
    }

    Ok((sheet, layout))
}
