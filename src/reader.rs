//! Reads back a saved workbook: sheet order, cell values and formulas, merged
//! ranges, list validations and column widths.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use quick_xml::Reader as XmlReader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::{Result, error::Error};

#[derive(Debug, Clone, PartialEq)]
pub enum ReadValue {
    Text(String),
    Number(f64),
    Bool(bool),
    /// Formula text without `=`.
    Formula(String),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadCell {
    pub value: ReadValue,
    /// Index into `cellXfs`; 0 when the cell has no `s` attribute.
    pub style: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadValidation {
    pub kind: String,
    pub sqref: String,
    pub formula1: String,
}

impl ReadValidation {
    /// Items of a `"a,b,c"` list formula.
    pub fn list_items(&self) -> Vec<String> {
        self.formula1
            .trim_matches('"')
            .split(',')
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetContents {
    /// Keyed by (1-based row, 0-based column).
    pub cells: BTreeMap<(u32, u32), ReadCell>,
    pub merges: Vec<String>,
    pub validations: Vec<ReadValidation>,
    /// (first column, last column, width), columns 1-based as stored.
    pub column_widths: Vec<(u32, u32, f64)>,
}

impl SheetContents {
    pub fn value(&self, row: u32, col: u32) -> Option<&ReadValue> {
        self.cells.get(&(row, col)).map(|c| &c.value)
    }

    pub fn text(&self, row: u32, col: u32) -> Option<&str> {
        match self.value(row, col)? {
            ReadValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn formula(&self, row: u32, col: u32) -> Option<&str> {
        match self.value(row, col)? {
            ReadValue::Formula(f) => Some(f),
            _ => None,
        }
    }

    pub fn find_row(&self, label: &str) -> Option<u32> {
        self.cells
            .iter()
            .find(|((_, col), cell)| *col == 0 && cell.value == ReadValue::Text(label.into()))
            .map(|((row, _), _)| *row)
    }

    pub fn last_row(&self) -> u32 {
        self.cells.keys().map(|(row, _)| *row).max().unwrap_or(0)
    }

    /// Width of a 0-based column, if a `<col>` entry covers it.
    pub fn column_width(&self, col: u32) -> Option<f64> {
        let n = col + 1;
        self.column_widths
            .iter()
            .find(|(min, max, _)| (*min..=*max).contains(&n))
            .map(|(_, _, w)| *w)
    }
}

#[inline]
fn attr_val(attr: &quick_xml::events::attributes::Attribute) -> String {
    let raw = std::str::from_utf8(attr.value.as_ref()).unwrap_or("");
    quick_xml::escape::unescape(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}

#[inline]
fn text_val(e: &quick_xml::events::BytesText) -> String {
    let raw = std::str::from_utf8(e.as_ref()).unwrap_or("");
    quick_xml::escape::unescape(raw)
        .unwrap_or(Cow::Borrowed(raw))
        .into_owned()
}

fn attrs(e: &BytesStart) -> HashMap<Vec<u8>, String> {
    e.attributes()
        .flatten()
        .map(|a| (a.key.as_ref().to_vec(), attr_val(&a)))
        .collect()
}

pub struct XlsxReader {
    path: PathBuf,
    sheet_paths: HashMap<String, String>,
    sheet_order: Vec<String>,
}

impl XlsxReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut archive = ZipArchive::new(File::open(&path)?)?;

        let (sheet_order, rid_to_name) = parse_workbook(&mut archive)?;
        let rid_to_path = parse_workbook_rels(&mut archive)?;

        let sheet_paths: HashMap<String, String> = rid_to_name
            .into_iter()
            .filter_map(|(rid, name)| rid_to_path.get(&rid).map(|p| (name, p.clone())))
            .collect();

        Ok(XlsxReader {
            path,
            sheet_paths,
            sheet_order,
        })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_order
    }

    /// Raw bytes of a package part, e.g. `xl/worksheets/sheet1.xml`.
    pub fn part(&self, part: &str) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(File::open(&self.path)?)?;
        slurp_entry(&mut archive, part)
    }

    pub fn part_names(&self) -> Result<Vec<String>> {
        let archive = ZipArchive::new(File::open(&self.path)?)?;
        Ok(archive.file_names().map(str::to_string).collect())
    }

    pub fn sheet(&self, sheet_name: &str) -> Result<SheetContents> {
        let zip_path = self
            .sheet_paths
            .get(sheet_name)
            .ok_or_else(|| Error::NotFound(format!("sheet '{sheet_name}' not found")))?;
        let xml = self.part(zip_path)?;
        parse_worksheet(&xml)
    }
}

#[derive(Clone, Copy)]
enum CellType {
    Number,
    Inline,
    Bool,
}

#[derive(Clone, Copy, PartialEq)]
enum Capture {
    None,
    Value,
    Formula,
    Validation,
}

fn parse_worksheet(bytes: &[u8]) -> Result<SheetContents> {
    let mut xml = XmlReader::from_reader(bytes);
    // Inline strings may carry significant leading spaces.
    xml.config_mut().trim_text(false);

    let mut out = SheetContents::default();
    let mut buf = Vec::new();

    let mut pos = (0u32, 0u32);
    let mut style = 0usize;
    let mut cell_type = CellType::Number;
    let mut capture = Capture::None;
    let mut value_buf = String::new();
    let mut formula_buf = String::new();
    let mut validation: Option<ReadValidation> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) if e.name().as_ref() == b"c" => {
                let (at, s, _) = cell_start(e, pos);
                pos = at;
                out.cells.insert(pos, ReadCell { value: ReadValue::Blank, style: s });
            }

            Event::Start(ref e) if e.name().as_ref() == b"c" => {
                (pos, style, cell_type) = cell_start(e, pos);
                value_buf.clear();
                formula_buf.clear();
            }

            Event::Start(ref e) => match e.name().as_ref() {
                b"v" | b"t" => capture = Capture::Value,
                b"f" => capture = Capture::Formula,
                b"formula1" if validation.is_some() => capture = Capture::Validation,
                b"dataValidation" => {
                    let a = attrs(e);
                    validation = Some(ReadValidation {
                        kind: a.get(b"type".as_slice()).cloned().unwrap_or_default(),
                        sqref: a.get(b"sqref".as_slice()).cloned().unwrap_or_default(),
                        formula1: String::new(),
                    });
                }
                _ => {}
            },

            Event::Empty(ref e) => match e.name().as_ref() {
                b"mergeCell" => {
                    if let Some(r) = attrs(e).remove(b"ref".as_slice()) {
                        out.merges.push(r);
                    }
                }
                b"col" => {
                    let a = attrs(e);
                    let num = |k: &[u8]| a.get(k).and_then(|v| v.parse::<f64>().ok());
                    if let (Some(min), Some(max), Some(width)) =
                        (num(b"min"), num(b"max"), num(b"width"))
                    {
                        out.column_widths.push((min as u32, max as u32, width));
                    }
                }
                _ => {}
            },

            Event::Text(ref e) => match capture {
                Capture::Value => value_buf.push_str(&text_val(e)),
                Capture::Formula => formula_buf.push_str(&text_val(e)),
                Capture::Validation => {
                    if let Some(v) = validation.as_mut() {
                        v.formula1.push_str(&text_val(e));
                    }
                }
                Capture::None => {}
            },

            Event::End(ref e) => match e.name().as_ref() {
                b"v" | b"t" | b"f" | b"formula1" => capture = Capture::None,
                b"c" => {
                    let value = if !formula_buf.is_empty() {
                        ReadValue::Formula(std::mem::take(&mut formula_buf))
                    } else {
                        cell_value(cell_type, std::mem::take(&mut value_buf))
                    };
                    out.cells.insert(pos, ReadCell { value, style });
                }
                b"dataValidation" => {
                    if let Some(v) = validation.take() {
                        out.validations.push(v);
                    }
                }
                _ => {}
            },

            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

/// Position, style index and type of a `<c>` element.
fn cell_start(e: &BytesStart, fallback: (u32, u32)) -> ((u32, u32), usize, CellType) {
    let a = attrs(e);
    let pos = a.get(b"r".as_slice()).map(|r| parse_cell_ref(r)).unwrap_or(fallback);
    let style = a
        .get(b"s".as_slice())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    let cell_type = match a.get(b"t".as_slice()).map(String::as_str) {
        Some("inlineStr") => CellType::Inline,
        Some("b") => CellType::Bool,
        _ => CellType::Number,
    };
    (pos, style, cell_type)
}

fn cell_value(cell_type: CellType, raw: String) -> ReadValue {
    match cell_type {
        CellType::Inline => ReadValue::Text(raw),
        CellType::Bool => ReadValue::Bool(raw.trim() == "1"),
        CellType::Number => match raw.trim().parse::<f64>() {
            Ok(n) => ReadValue::Number(n),
            Err(_) => ReadValue::Blank,
        },
    }
}

fn parse_workbook(
    archive: &mut ZipArchive<File>,
) -> Result<(Vec<String>, HashMap<String, String>)> {
    let bytes = slurp_entry(archive, "xl/workbook.xml")?;
    let mut xml = XmlReader::from_reader(bytes.as_slice());
    xml.config_mut().trim_text(true);

    let mut order = Vec::new();
    let mut rid_map = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"sheet" => {
                let (mut name, mut rid) = (String::new(), String::new());
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"name" => name = attr_val(&attr),
                        b"r:id" | b"id" => rid = attr_val(&attr),
                        _ => {}
                    }
                }
                if !name.is_empty() && !rid.is_empty() {
                    order.push(name.clone());
                    rid_map.insert(rid, name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok((order, rid_map))
}

fn parse_workbook_rels(archive: &mut ZipArchive<File>) -> Result<HashMap<String, String>> {
    let bytes = slurp_entry(archive, "xl/_rels/workbook.xml.rels")?;
    let mut xml = XmlReader::from_reader(bytes.as_slice());
    xml.config_mut().trim_text(true);

    let mut map = HashMap::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.name().as_ref() == b"Relationship" => {
                let (mut id, mut target, mut is_sheet) = (String::new(), String::new(), false);
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr_val(&attr),
                        b"Target" => target = attr_val(&attr),
                        b"Type" => is_sheet = attr_val(&attr).ends_with("/worksheet"),
                        _ => {}
                    }
                }
                if is_sheet && !id.is_empty() {
                    map.insert(id, normalize_path(&target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(map)
}

fn slurp_entry(archive: &mut ZipArchive<File>, path: &str) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(path)
        .map_err(|e| Error::NotFound(format!("'{path}': {e}")))?;
    let mut buf = Vec::with_capacity(entry.size() as usize);
    io::copy(&mut entry, &mut buf)?;
    Ok(buf)
}

fn normalize_path(target: &str) -> String {
    let t = target.trim_start_matches('/');
    if t.starts_with("xl/") {
        t.to_string()
    } else {
        format!("xl/{t}")
    }
}

/// "F3" -> (3, 5).
fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let digits_at = cell_ref
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(cell_ref.len());
    let (letters, digits) = cell_ref.split_at(digits_at);
    let col = letters
        .bytes()
        .fold(0u32, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A') as u32 + 1)
        .saturating_sub(1);
    (digits.parse().unwrap_or(0), col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_refs() {
        assert_eq!(parse_cell_ref("A1"), (1, 0));
        assert_eq!(parse_cell_ref("F3"), (3, 5));
        assert_eq!(parse_cell_ref("AA10"), (10, 26));
    }

    #[test]
    fn worksheet_contents() {
        let xml = concat!(
            r#"<worksheet><cols><col min="1" max="1" width="20" customWidth="1"/></cols><sheetData>"#,
            r#"<row r="1"><c r="A1" s="2" t="inlineStr"><is><t xml:space="preserve">   - Paso</t></is></c>"#,
            r#"<c r="B1"><f>COUNTIF(F3:F7,&quot;Pass&quot;)</f></c><c r="C1" s="1"/><c r="D1"><v>2.5</v></c></row>"#,
            "</sheetData><mergeCells count=\"1\"><mergeCell ref=\"A1:D1\"/></mergeCells>",
            r#"<dataValidations count="1"><dataValidation type="list" sqref="E3:E7"><formula1>"Nahuel,QA Team"</formula1></dataValidation></dataValidations>"#,
            "</worksheet>"
        );
        let sheet = parse_worksheet(xml.as_bytes()).unwrap();
        assert_eq!(sheet.text(1, 0), Some("   - Paso"));
        assert_eq!(sheet.cells[&(1, 0)].style, 2);
        assert_eq!(sheet.formula(1, 1), Some("COUNTIF(F3:F7,\"Pass\")"));
        assert_eq!(sheet.value(1, 2), Some(&ReadValue::Blank));
        assert_eq!(sheet.cells[&(1, 2)].style, 1);
        assert_eq!(sheet.value(1, 3), Some(&ReadValue::Number(2.5)));
        assert_eq!(sheet.merges, ["A1:D1"]);
        assert_eq!(sheet.validations[0].sqref, "E3:E7");
        assert_eq!(sheet.validations[0].list_items(), ["Nahuel", "QA Team"]);
        assert_eq!(sheet.column_width(0), Some(20.0));
        assert_eq!(sheet.column_width(1), None);
    }
}
