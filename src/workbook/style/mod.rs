use std::collections::HashMap;

use crate::workbook::{
    style::{
        alignment::{Alignment, HAlign, VAlign},
        border::{Border, BorderStyle},
        color::Color,
        fill::Fill,
        font::Font,
        number::NumberFormat,
    },
};
pub mod alignment;
pub mod border;
pub mod color;
pub mod fill;
pub mod font;
pub mod number;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub font: Font,
    pub fill: Fill,
    pub border: Border,
    pub alignment: Alignment,
    pub number_format: NumberFormat,
}

impl Style {
    pub fn new() -> Self {
        Style::default()
    }

    pub fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }
    pub fn font_size(mut self, pt: u32) -> Self {
        self.font.size = pt * 20;
        self
    }
    pub fn font_color(mut self, hex: &str) -> Self {
        self.font.color = Some(Color::new(hex));
        self
    }

    pub fn bg(mut self, hex: &str) -> Self {
        self.fill = Fill::Solid(Color::new(hex));
        self
    }

    pub fn border_all(mut self, style: BorderStyle) -> Self {
        self.border.left = style.clone();
        self.border.right = style.clone();
        self.border.top = style.clone();
        self.border.bottom = style;
        self
    }

    pub fn align(mut self, horizontal: HAlign) -> Self {
        self.alignment.horizontal = horizontal;
        self
    }
    pub fn valign(mut self, vertical: VAlign) -> Self {
        self.alignment.vertical = vertical;
        self
    }
    pub fn wrap(mut self) -> Self {
        self.alignment.wrap_text = true;
        self
    }

    pub fn format(mut self, fmt: NumberFormat) -> Self {
        self.number_format = fmt;
        self
    }
}

type XfKey = (usize, usize, usize, u32, Alignment);

/// Interns fonts, fills, borders, number formats and cell formats so equal
/// styles share one `cellXfs` entry.
pub struct StyleRegistry {
    fonts: Vec<Font>,
    fills: Vec<Fill>,
    borders: Vec<Border>,
    font_index: HashMap<Font, usize>,
    fill_index: HashMap<Fill, usize>,
    border_index: HashMap<Border, usize>,
    xfs: Vec<XfKey>,
    xf_index: HashMap<XfKey, usize>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        StyleRegistry::new()
    }
}

impl StyleRegistry {
    pub fn new() -> Self {
        let mut reg = StyleRegistry {
            fonts: Vec::new(),
            fills: Vec::new(),
            borders: Vec::new(),
            font_index: HashMap::new(),
            fill_index: HashMap::new(),
            border_index: HashMap::new(),
            xfs: Vec::new(),
            xf_index: HashMap::new(),
        };

        // Fill slots 0 and 1 are reserved (none, gray125).
        reg.intern_font(Font::default());
        reg.fills.push(Fill::None);
        reg.fills.push(Fill::Gray125);
        reg.fill_index.insert(Fill::None, 0);
        reg.fill_index.insert(Fill::Gray125, 1);
        reg.intern_border(Border::default());
        reg.intern_xf((0, 0, 0, 0, Alignment::default()));

        reg
    }

    /// Returns the `cellXfs` index for `style`.
    pub fn register(&mut self, style: &Style) -> usize {
        let font_id = self.intern_font(style.font.clone());
        let fill_id = self.intern_fill(style.fill.clone());
        let border_id = self.intern_border(style.border.clone());
        let fmt_id = style.number_format.builtin_id();
        self.intern_xf((font_id, fill_id, border_id, fmt_id, style.alignment))
    }

    pub fn cell_format_count(&self) -> usize {
        self.xfs.len()
    }

    fn intern_font(&mut self, font: Font) -> usize {
        if let Some(&i) = self.font_index.get(&font) {
            return i;
        }
        let i = self.fonts.len();
        self.font_index.insert(font.clone(), i);
        self.fonts.push(font);
        i
    }

    fn intern_fill(&mut self, fill: Fill) -> usize {
        if let Some(&i) = self.fill_index.get(&fill) {
            return i;
        }
        let i = self.fills.len();
        self.fill_index.insert(fill.clone(), i);
        self.fills.push(fill);
        i
    }

    fn intern_border(&mut self, border: Border) -> usize {
        if let Some(&i) = self.border_index.get(&border) {
            return i;
        }
        let i = self.borders.len();
        self.border_index.insert(border.clone(), i);
        self.borders.push(border);
        i
    }

    fn intern_xf(&mut self, key: XfKey) -> usize {
        if let Some(&i) = self.xf_index.get(&key) {
            return i;
        }
        let i = self.xfs.len();
        self.xf_index.insert(key, i);
        self.xfs.push(key);
        i
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        out.push_str(
            "<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\n",
        );

        out.push_str(&format!("<fonts count=\"{}\">\n", self.fonts.len()));
        for font in &self.fonts {
            out.push_str(&format!("{}\n", font.to_xml()));
        }
        out.push_str("</fonts>\n");

        out.push_str(&format!("<fills count=\"{}\">\n", self.fills.len()));
        for fill in &self.fills {
            out.push_str(&format!("{}\n", fill.to_xml()));
        }
        out.push_str("</fills>\n");

        out.push_str(&format!("<borders count=\"{}\">\n", self.borders.len()));
        for border in &self.borders {
            out.push_str(&format!("{}\n", border.to_xml()));
        }
        out.push_str("</borders>\n");

        out.push_str("<cellStyleXfs count=\"1\">\n");
        out.push_str("<xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/>\n");
        out.push_str("</cellStyleXfs>\n");

        out.push_str(&format!("<cellXfs count=\"{}\">\n", self.xfs.len()));
        for (font_id, fill_id, border_id, num_fmt_id, alignment) in &self.xfs {
            out.push_str(&format!(
                "<xf numFmtId=\"{num_fmt_id}\" fontId=\"{font_id}\" fillId=\"{fill_id}\" borderId=\"{border_id}\" xfId=\"0\""
            ));
            for (flag, applied) in [
                ("applyNumberFormat", *num_fmt_id != 0),
                ("applyFont", *font_id != 0),
                ("applyFill", *fill_id != 0),
                ("applyBorder", *border_id != 0),
                ("applyAlignment", !alignment.is_default()),
            ] {
                if applied {
                    out.push_str(&format!(" {flag}=\"1\""));
                }
            }
            match alignment.to_xml() {
                Some(a) => out.push_str(&format!(">{a}</xf>\n")),
                None => out.push_str("/>\n"),
            }
        }
        out.push_str("</cellXfs>\n");

        out.push_str("<cellStyles count=\"1\">\n");
        out.push_str("<cellStyle name=\"Normal\" xfId=\"0\" builtinId=\"0\"/>\n");
        out.push_str("</cellStyles>\n");

        out.push_str("</styleSheet>");
        out
    }
}
