use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::Write as _,
    fs::File,
    io::{self, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use zip::{ZipWriter, write::SimpleFileOptions};

use crate::{
    Result,
    error::Error,
    workbook::{cell::CellValue, sheet::SheetWriter, style::StyleRegistry},
};
pub mod builder;
pub mod cell;
pub mod range;
pub mod sheet;
pub mod style;
pub mod validation;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

const RELS_DOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#,
    r#"</Relationships>"#,
);

fn workbook_xml(order: &[String]) -> String {
    let mut out = String::from(XML_DECL);
    let _ = write!(
        out,
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="{REL_NS}">"#
    );
    out.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews><sheets>"#);
    for (i, name) in order.iter().enumerate() {
        let id = i + 1;
        let _ = write!(
            out,
            r#"<sheet name="{}" sheetId="{id}" r:id="rId{id}"/>"#,
            xml_escape(name)
        );
    }
    // Formulas are stored without cached values; ask the reader to compute them.
    out.push_str(r#"</sheets><calcPr calcId="191029" fullCalcOnLoad="1"/></workbook>"#);
    out
}

/// Worksheets take rId1..=rIdN, styles comes last.
fn workbook_rels_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for i in 1..=sheet_count {
        let _ = write!(
            out,
            r#"<Relationship Id="rId{i}" Type="{REL_NS}/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        );
    }
    let _ = write!(
        out,
        r#"<Relationship Id="rId{}" Type="{REL_NS}/styles" Target="styles.xml"/>"#,
        sheet_count + 1
    );
    out.push_str("</Relationships>");
    out
}

fn content_types_xml(sheet_count: usize) -> String {
    let mut out = String::from(XML_DECL);
    out.push_str(concat!(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
    ));
    for i in 1..=sheet_count {
        let _ = write!(
            out,
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="{CT_WORKSHEET}"/>"#
        );
    }
    out.push_str("</Types>");
    out
}

pub struct Workbook {
    output_path: PathBuf,
    sheets: HashMap<String, SheetWriter>,
    insertion_order: Vec<String>,
    style_reg: Rc<RefCell<StyleRegistry>>,
}

impl Workbook {
    pub(crate) fn new_with_builder(path: PathBuf, sheets: Vec<String>) -> Result<Self> {
        let mut wb = Self {
            output_path: path,
            sheets: HashMap::new(),
            insertion_order: vec![],
            style_reg: Rc::new(RefCell::new(StyleRegistry::new())),
        };
        sheets.iter().try_for_each(|name| wb.add_sheet(name).map(|_| ()))?;
        Ok(wb)
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.insertion_order
    }

    pub fn get_sheet(&mut self, name: &str) -> Option<&mut SheetWriter> {
        self.sheets.get_mut(name)
    }

    pub fn add_sheet(&mut self, name: &str) -> Result<&mut SheetWriter> {
        validate_sheet_name(name)?;
        if self
            .insertion_order
            .iter()
            .any(|s| s.eq_ignore_ascii_case(name))
        {
            return Err(Error::AlreadyExists(format!(
                "Sheet '{name}' already exists"
            )));
        }
        let writer = SheetWriter::new(name, Rc::clone(&self.style_reg))?;
        self.insertion_order.push(name.to_string());
        Ok(self.sheets.entry(name.to_string()).or_insert(writer))
    }

    /// Writes the package to the output path, replacing any existing file.
    pub fn finish(mut self) -> Result<()> {
        if self.insertion_order.is_empty() {
            return Err(Error::NotFound("workbook has no sheets".into()));
        }
        for name in &self.insertion_order {
            match self.sheets.get_mut(name) {
                Some(s) => s.finalize()?,
                None => {
                    return Err(Error::NotFound(format!("Sheet name : {name}!!")));
                }
            }
        }

        let output_file = File::create(&self.output_path)?;
        let mut zip = ZipWriter::new(output_file);
        // Fixed timestamp keeps repeated runs byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        zip_write_str(
            &mut zip,
            "[Content_Types].xml",
            &content_types_xml(self.insertion_order.len()),
            options,
        )?;
        zip_write_str(&mut zip, "_rels/.rels", RELS_DOT_RELS, options)?;
        zip_write_str(
            &mut zip,
            "xl/workbook.xml",
            &workbook_xml(&self.insertion_order),
            options,
        )?;
        zip_write_str(
            &mut zip,
            "xl/_rels/workbook.xml.rels",
            &workbook_rels_xml(self.insertion_order.len()),
            options,
        )?;

        let styles_xml = self.style_reg.borrow().to_xml();
        zip_write_str(&mut zip, "xl/styles.xml", &styles_xml, options)?;

        for (i, name) in self.insertion_order.iter().enumerate() {
            let Some(sheet) = self.sheets.get_mut(name) else {
                return Err(Error::NotFound(format!("Sheet name : {name}!!")));
            };
            let zip_path = format!("xl/worksheets/sheet{}.xml", i + 1);

            zip.start_file(zip_path.as_str(), options)?;
            zip.write_all(sheet.head_xml().as_bytes())?;

            let temp_file = sheet.temp.get_mut();
            temp_file.seek(SeekFrom::Start(0))?;
            io::copy(temp_file, &mut zip)?;

            zip.write_all(sheet.tail_xml().as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Excel rejects names longer than 31 characters or containing `[]:*?/\`.
pub fn validate_sheet_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0
        || len > 31
        || name.contains(['[', ']', ':', '*', '?', '/', '\\'])
        || name.starts_with('\'')
        || name.ends_with('\'')
    {
        return Err(Error::InvalidSheetName(name.to_string()));
    }
    Ok(())
}

pub(crate) fn make_cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", col_to_letters(col), row)
}

/// 0-based column index to letters: 0 -> "A", 26 -> "AA".
pub(crate) fn col_to_letters(mut col: u32) -> String {
    let mut result = Vec::new();
    loop {
        result.push(char::from(b'A' + (col % 26) as u8));
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result.iter().rev().collect()
}

pub(crate) fn xml_escape(s: &str) -> String {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
pub(crate) fn write_cell<W: Write>(
    w: &mut W,
    cell_ref: &str,
    value: &CellValue,
    style_idx: Option<usize>,
) -> Result<()> {
    let s = match style_idx {
        Some(0) | None => String::new(),
        Some(n) => format!(" s=\"{n}\""),
    };

    match value {
        CellValue::Blank => {
            write!(w, "<c r=\"{cell_ref}\"{s}/>")?;
        }
        CellValue::Number(n) => {
            write!(w, "<c r=\"{cell_ref}\"{s}><v>{n}</v></c>")?;
        }
        CellValue::Text(text) => {
            let escaped = xml_escape(text);
            let space = if text.trim() != text { " xml:space=\"preserve\"" } else { "" };
            write!(
                w,
                "<c r=\"{cell_ref}\"{s} t=\"inlineStr\"><is><t{space}>{escaped}</t></is></c>"
            )?;
        }
        CellValue::Bool(b) => {
            let val = if *b { 1 } else { 0 };
            write!(w, "<c r=\"{cell_ref}\"{s} t=\"b\"><v>{val}</v></c>")?;
        }
        CellValue::Formula(f) => {
            let escaped = xml_escape(f);
            write!(w, "<c r=\"{cell_ref}\"{s}><f>{escaped}</f></c>")?;
        }
    }
    Ok(())
}

pub(crate) fn zip_write_str<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &str,
    content: &str,
    options: SimpleFileOptions,
) -> Result<()> {
    zip.start_file(path, options)?;
    zip.write_all(content.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell_xml(value: &CellValue, style: Option<usize>) -> String {
        let mut out = Vec::new();
        write_cell(&mut out, "B3", value, style).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(9), "J");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(701), "ZZ");
        assert_eq!(make_cell_ref(3, 5), "F3");
    }

    #[test]
    fn formula_cells_carry_no_cached_value() {
        assert_eq!(
            cell_xml(&CellValue::formula("COUNTIF(A1:A5,\"Pass\")"), Some(4)),
            "<c r=\"B3\" s=\"4\"><f>COUNTIF(A1:A5,&quot;Pass&quot;)</f></c>"
        );
    }

    #[test]
    fn leading_spaces_are_preserved() {
        assert_eq!(
            cell_xml(&CellValue::text("   - Paso"), None),
            "<c r=\"B3\" t=\"inlineStr\"><is><t xml:space=\"preserve\">   - Paso</t></is></c>"
        );
    }

    #[test]
    fn default_style_is_omitted() {
        assert_eq!(cell_xml(&CellValue::Blank, Some(0)), "<c r=\"B3\"/>");
        assert_eq!(cell_xml(&CellValue::num(2.5), None), "<c r=\"B3\"><v>2.5</v></c>");
    }

    #[test]
    fn sheet_names() {
        assert!(validate_sheet_name("Resultados Tests").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("'quoted'").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
    }

    #[test]
    fn duplicate_sheets_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut wb = builder::WorkbookBuilder::new(dir.path().join("a.xlsx"))
            .set_sheets(vec!["Uno"])
            .build()
            .unwrap();
        assert!(matches!(wb.add_sheet("uno"), Err(Error::AlreadyExists(_))));
        wb.add_sheet("Dos").unwrap();
        assert_eq!(wb.sheet_names(), ["Uno", "Dos"]);
    }

    #[test]
    fn finished_workbook_reads_back() {
        use crate::{reader::XlsxReader, workbook::style::Style};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("b.xlsx");
        let mut wb = builder::WorkbookBuilder::new(&path)
            .set_sheets(vec!["Data"])
            .build()
            .unwrap();
        let sheet = wb.get_sheet("Data").unwrap();
        sheet
            .write_row_with_style(
                &[CellValue::text("Name"), CellValue::text("Score")],
                &Style::new().bold(),
            )
            .unwrap();
        sheet
            .write_row(&[CellValue::text("a"), CellValue::num(3.0), CellValue::bool(true)])
            .unwrap();
        sheet
            .write_row(&[CellValue::Blank, CellValue::formula("=SUM(B2:B2)")])
            .unwrap();
        wb.finish().unwrap();

        let reader = XlsxReader::open(&path).unwrap();
        assert_eq!(reader.sheet_names(), ["Data"]);
        let data = reader.sheet("Data").unwrap();
        assert_eq!(data.text(1, 1), Some("Score"));
        assert_ne!(data.cells[&(1, 0)].style, 0);
        assert_eq!(data.value(2, 1), Some(&crate::reader::ReadValue::Number(3.0)));
        assert_eq!(data.value(2, 2), Some(&crate::reader::ReadValue::Bool(true)));
        assert_eq!(data.formula(3, 1), Some("SUM(B2:B2)"));
        assert!(reader.sheet("Missing").is_err());
    }

    #[test]
    fn empty_workbook_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let wb = builder::WorkbookBuilder::new(dir.path().join("c.xlsx")).build().unwrap();
        assert!(matches!(wb.finish(), Err(Error::NotFound(_))));
    }
}
