use crate::{
    template::{
        model::Sheet,
        results::{self, ResultsLayout, SeedRecord, Status},
        styles,
    },
    workbook::{cell::CellValue, range::CellRange, style::Style},
};

pub const SHEET_NAME: &str = "Resumen KPIs";
pub const TITLE: &str = "RESUMEN Y KPIS DE TESTING";
pub const TOTAL_LABEL: &str = "Total Tests Ejecutados";

const COL_VALUE: u32 = 1;
const COLUMN_WIDTHS: [f64; 4] = [25.0, 30.0, 25.0, 15.0];
const AUTO_FORMULA: &str = "Fórmula automática";
const AUTO_REFERENCE: &str = "Referencia automática";

fn count_label(status: Status) -> &'static str {
    match status {
        Status::Pass => "Tests Pass",
        Status::Fail => "Tests Fail",
        Status::Skip => "Tests Skip",
        Status::Blocked => "Tests Blocked",
        Status::Pending => "Tests Pendientes",
    }
}

/// Appends rows one after another and remembers where they went.
struct RowCursor {
    sheet: Sheet,
    row: u32,
    section: Style,
    body: Style,
}

impl RowCursor {
    /// Section style lands on the row holding `title`, wherever the cursor is.
    fn section(&mut self, title: &str) {
        let style = self.section.clone();
        self.sheet.set_row(self.row, &[title, "", "", ""], &style);
        self.row += 1;
    }

    fn blank(&mut self) {
        let style = self.body.clone();
        self.sheet.set_row(self.row, &["", "", "", ""], &style);
        self.row += 1;
    }

    /// Label, formula, note and unit; returns the row written.
    fn formula(&mut self, label: &str, formula: String, note: &str, unit: &str) -> u32 {
        self.formula_styled(label, formula, note, unit, None)
    }

    fn formula_styled(
        &mut self,
        label: &str,
        formula: String,
        note: &str,
        unit: &str,
        value_style: Option<Style>,
    ) -> u32 {
        let row = self.row;
        let body = self.body.clone();
        self.sheet.set_row(row, &[label, "", note, unit], &body);
        self.sheet.set(
            row,
            COL_VALUE,
            CellValue::formula(formula),
            value_style.as_ref().unwrap_or(&body),
        );
        self.row += 1;
        row
    }

    fn note(&mut self, cells: [&str; 4]) {
        let style = self.body.clone();
        self.sheet.set_row(self.row, &cells, &style);
        self.row += 1;
    }
}

fn value_ref(row: u32) -> String {
    CellRange::cell(row, COL_VALUE).to_string()
}

pub fn build(layout: &ResultsLayout, seeds: &[SeedRecord]) -> Sheet {
    let mut sheet = Sheet::new(SHEET_NAME);
    sheet.merge(CellRange::row(1, 0, 3), CellValue::text(TITLE), &styles::title());

    let mut rows = RowCursor {
        sheet,
        row: 2,
        section: styles::section(),
        body: styles::body(),
    };
    let status_range = layout.status_range().on_sheet(results::SHEET_NAME);

    rows.section("MÉTRICAS GENERALES");
    let total = rows.formula(TOTAL_LABEL, format!("COUNTA({status_range})"), AUTO_FORMULA, "");
    let mut counts = Vec::with_capacity(Status::ALL.len());
    for status in Status::ALL {
        let row = rows.formula(
            count_label(status),
            format!("COUNTIF({status_range},\"{}\")", status.label()),
            AUTO_FORMULA,
            "",
        );
        counts.push((status, row));
    }
    let count_row = |wanted: Status| {
        counts
            .iter()
            .find(|(s, _)| *s == wanted)
            .map(|(_, row)| *row)
            .unwrap_or(total)
    };
    let (total_ref, pass_ref, fail_ref, pending_ref) = (
        value_ref(total),
        value_ref(count_row(Status::Pass)),
        value_ref(count_row(Status::Fail)),
        value_ref(count_row(Status::Pending)),
    );
    rows.blank();

    rows.section("PORCENTAJES");
    rows.formula("% Pass Rate", format!("{pass_ref}/{total_ref}*100"), AUTO_FORMULA, "%");
    rows.formula("% Fail Rate", format!("{fail_ref}/{total_ref}*100"), AUTO_FORMULA, "%");
    rows.formula(
        "% Completion",
        format!("({total_ref}-{pending_ref})/{total_ref}*100"),
        AUTO_FORMULA,
        "%",
    );
    rows.blank();

    rows.section("ESTADO POR TEST");
    for (i, seed) in seeds.iter().enumerate() {
        let target = layout.status_cell(i as u32).on_sheet(results::SHEET_NAME);
        rows.formula(&seed.id, target, AUTO_REFERENCE, "");
    }
    rows.blank();

    rows.section("FECHAS");
    rows.formula_styled(
        "Fecha de Testing",
        "TODAY()".into(),
        AUTO_FORMULA,
        "",
        Some(styles::date()),
    );
    rows.formula_styled(
        "Última Actualización",
        "NOW()".into(),
        AUTO_FORMULA,
        "",
        Some(styles::timestamp()),
    );
    rows.blank();

    rows.section("NOTAS");
    rows.note(["Bugs Encontrados", "Contar manualmente", "Revisar columna Observaciones", ""]);
    rows.note(["Tests Críticos", "SMK-01, SMK-02", "Login y navegación", ""]);
    rows.note(["Próximos Pasos", "Automatizar tests que pasan", "Después de testing manual", ""]);

    let mut sheet = rows.sheet;
    for (col, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        sheet.set_column_width(col as u32, width);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::config::TemplateConfig;
    use pretty_assertions::assert_eq;

    fn built(seeds: Vec<SeedRecord>) -> Sheet {
        let config = TemplateConfig::default().with_seeds(seeds);
        let (_, layout) = results::build(&config).unwrap();
        build(&layout, &config.seeds)
    }

    #[test]
    fn kpi_formulas() {
        let sheet = built(results::smoke_tests());
        let formula_of = |label: &str| sheet.formula(sheet.find_row(label).unwrap(), COL_VALUE);

        assert_eq!(formula_of(TOTAL_LABEL), Some("COUNTA('Resultados Tests'!F3:F7)"));
        assert_eq!(formula_of("Tests Pass"), Some("COUNTIF('Resultados Tests'!F3:F7,\"Pass\")"));
        assert_eq!(
            formula_of("Tests Pendientes"),
            Some("COUNTIF('Resultados Tests'!F3:F7,\"Pendiente\")")
        );
        assert_eq!(formula_of("% Pass Rate"), Some("B4/B3*100"));
        assert_eq!(formula_of("% Fail Rate"), Some("B5/B3*100"));
        assert_eq!(formula_of("% Completion"), Some("(B3-B8)/B3*100"));
        assert_eq!(formula_of("SMK-03"), Some("'Resultados Tests'!F5"));
        assert_eq!(formula_of("Fecha de Testing"), Some("TODAY()"));
        assert_eq!(formula_of("Última Actualización"), Some("NOW()"));
    }

    #[test]
    fn total_range_follows_seed_count() {
        let seeds: Vec<_> = results::smoke_tests().into_iter().take(3).collect();
        let sheet = built(seeds);
        let row = sheet.find_row(TOTAL_LABEL).unwrap();
        assert_eq!(sheet.formula(row, COL_VALUE), Some("COUNTA('Resultados Tests'!F3:F5)"));
        assert!(sheet.find_row("SMK-04").is_none());
    }

    #[test]
    fn section_rows() {
        let sheet = built(results::smoke_tests());
        let sections: Vec<&str> = (2..=sheet.last_row())
            .filter(|row| sheet.cell(*row, 0).unwrap().style == styles::section())
            .filter_map(|row| sheet.text(row, 0))
            .collect();
        assert_eq!(
            sections,
            ["MÉTRICAS GENERALES", "PORCENTAJES", "ESTADO POR TEST", "FECHAS", "NOTAS"]
        );
        assert_eq!(sheet.find_row("PORCENTAJES"), Some(10));
        assert_eq!(sheet.last_row(), 29);
    }

    #[test]
    fn notes_and_units() {
        let sheet = built(results::smoke_tests());
        let row = sheet.find_row("% Completion").unwrap();
        assert_eq!(sheet.text(row, 2), Some(AUTO_FORMULA));
        assert_eq!(sheet.text(row, 3), Some("%"));
        let row = sheet.find_row("Tests Críticos").unwrap();
        assert_eq!(sheet.text(row, 1), Some("SMK-01, SMK-02"));
    }
}
