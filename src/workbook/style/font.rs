use crate::workbook::{style::color::Color, xml_escape};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Font {
    pub bold: bool,
    /// Twentieths of a point.
    pub size: u32,
    pub color: Option<Color>,
    pub name: String,
}

impl Default for Font {
    fn default() -> Self {
        Font {
            bold: false,
            size: 220,
            color: None,
            name: "Calibri".into(),
        }
    }
}

impl Font {
    pub fn points(&self) -> f64 {
        f64::from(self.size) / 20.0
    }

    /// Child order follows CT_Font: b, sz, color, name.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<font>");
        if self.bold {
            xml.push_str("<b/>");
        }
        xml.push_str(&format!("<sz val=\"{}\"/>", self.points()));
        if let Some(c) = &self.color {
            xml.push_str(&format!("<color rgb=\"{}\"/>", c.as_argb()));
        }
        xml.push_str(&format!("<name val=\"{}\"/>", xml_escape(&self.name)));
        xml.push_str("</font>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_precedes_name() {
        let font = Font {
            bold: true,
            size: 280,
            color: Some(Color::new("2E86AB")),
            ..Font::default()
        };
        assert_eq!(
            font.to_xml(),
            "<font><b/><sz val=\"14\"/><color rgb=\"FF2E86AB\"/><name val=\"Calibri\"/></font>"
        );
    }
}
