use crate::{
    template::{model::Sheet, styles},
    workbook::{cell::CellValue, range::CellRange},
};

pub const SHEET_NAME: &str = "Instrucciones";
pub const TITLE: &str = "INSTRUCCIONES PARA USAR ESTE EXCEL";
pub const FIRST_ROW: u32 = 2;

const COLUMN_WIDTHS: [f64; 4] = [35.0, 50.0, 20.0, 15.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Section,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub cells: [&'static str; 4],
}

const fn section(title: &'static str) -> Line {
    Line {
        kind: LineKind::Section,
        cells: [title, "", "", ""],
    }
}

const fn step(text: &'static str, detail: &'static str) -> Line {
    Line {
        kind: LineKind::Body,
        cells: [text, detail, "", ""],
    }
}

const fn legend(state: &'static str, meaning: &'static str, colour: &'static str, hex: &'static str) -> Line {
    Line {
        kind: LineKind::Body,
        cells: [state, meaning, colour, hex],
    }
}

const BLANK: Line = step("", "");

pub const LINES: &[Line] = &[
    section("CÓMO USAR ESTE EXCEL"),
    section("1. Ejecutar Test Manual"),
    step(
        "   - Abrir la aplicación en el navegador",
        "https://mishu-web--pr69-performance-and-prof-8fsc02so.web.app/",
    ),
    step("   - Seguir los pasos del test case", "Ver Excel v3 - All Test Cases"),
    step("   - Documentar resultado en esta hoja", "Columna 'Estado'"),
    BLANK,
    section("2. Llenar Información"),
    step("   - Tester: Tu nombre", "Nahuel"),
    step("   - Estado: Pass/Fail/Skip/Blocked", "Usar lista desplegable"),
    step("   - Observaciones: Qué pasó", "Detalles del resultado"),
    step("   - Evidencia: Link o referencia", "URL, ticket, etc."),
    step("   - Screenshot: Nombre del archivo", "screenshot_smk01_pass.png"),
    BLANK,
    section("3. Estados Posibles"),
    legend("   Pass ✅", "Test funcionó correctamente", "Verde", "D4EDDA"),
    legend("   Fail ❌", "Test falló o encontró bug", "Rojo", "F8D7DA"),
    legend("   Skip ⏭️", "Test saltado (no aplica)", "Amarillo", "FFF3CD"),
    legend("   Blocked 🚫", "Test bloqueado por otro bug", "Gris", "E2E3E5"),
    legend("   Pendiente ⏳", "Test no ejecutado aún", "Amarillo", "FFF3CD"),
    BLANK,
    section("4. Ejemplos de Observaciones"),
    step("   Pass: 'Login exitoso, redirige a /connections'", ""),
    step("   Fail: 'Error 500 al hacer login, mensaje: Internal Server Error'", ""),
    step("   Skip: 'Test no aplica en esta versión'", ""),
    step("   Blocked: 'No se puede probar por bug en SMK-01'", ""),
    BLANK,
    section("5. Screenshots"),
    step(
        "   - Tomar screenshot cuando encuentres bugs",
        "Cmd+Shift+4 (Mac) o Snipping Tool (Windows)",
    ),
    step("   - Guardar con nombre descriptivo", "screenshot_smk01_fail_login_error.png"),
    step("   - Referenciar en columna 'Screenshot'", "Nombre del archivo"),
    BLANK,
    section("6. Buenas Prácticas"),
    step("   - Ser específico en observaciones", "No solo 'no funciona'"),
    step("   - Incluir pasos para reproducir bugs", "1. Hacer login 2. Ver error"),
    step("   - Documentar fecha y hora", "Automático con fórmula"),
    step("   - Revisar antes de marcar como Pass", "Verificar que realmente funciona"),
];

pub fn build() -> Sheet {
    let mut sheet = Sheet::new(SHEET_NAME);
    sheet.merge(CellRange::row(1, 0, 3), CellValue::text(TITLE), &styles::title());

    let section_style = styles::section();
    let body_style = styles::body();
    for (i, line) in LINES.iter().enumerate() {
        // Styled by kind, so headings keep the section style when lines move.
        // A fixed-row layout would style rows 2, 7, 14, 21, 26 and 31 here.
        let style = match line.kind {
            LineKind::Section => &section_style,
            LineKind::Body => &body_style,
        };
        sheet.set_row(FIRST_ROW + i as u32, &line.cells, style);
    }

    for (col, width) in COLUMN_WIDTHS.into_iter().enumerate() {
        sheet.set_column_width(col as u32, width);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn section_rows_are_the_headings() {
        let sheet = build();
        let sections: Vec<(u32, &str)> = (FIRST_ROW..=sheet.last_row())
            .filter(|row| sheet.cell(*row, 0).unwrap().style == styles::section())
            .map(|row| (row, sheet.text(row, 0).unwrap()))
            .collect();
        assert_eq!(
            sections,
            vec![
                (2, "CÓMO USAR ESTE EXCEL"),
                (3, "1. Ejecutar Test Manual"),
                (8, "2. Llenar Información"),
                (15, "3. Estados Posibles"),
                (22, "4. Ejemplos de Observaciones"),
                (28, "5. Screenshots"),
                (33, "6. Buenas Prácticas"),
            ]
        );
    }

    #[test]
    fn every_row_is_four_bordered_cells() {
        let sheet = build();
        assert_eq!(sheet.last_row(), FIRST_ROW + LINES.len() as u32 - 1);
        for row in FIRST_ROW..=sheet.last_row() {
            for col in 0..4 {
                let cell = sheet.cell(row, col).unwrap();
                assert_eq!(cell.style.border.left, styles::body().border.left);
            }
        }
    }

    #[test]
    fn status_legend_lists_all_five_states() {
        let sheet = build();
        let row = sheet.find_row("   Blocked 🚫").unwrap();
        assert_eq!(sheet.text(row, 3), Some("E2E3E5"));
        assert_eq!(sheet.merges(), [CellRange::row(1, 0, 3)]);
        assert_eq!(sheet.column_width(1), Some(50.0));
    }
}
