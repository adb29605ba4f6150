use crate::workbook::style::color::Color;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
}

impl BorderStyle {
    fn as_xml_attr(&self) -> Option<&'static str> {
        match self {
            BorderStyle::None => None,
            BorderStyle::Thin => Some("thin"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Border {
    pub left: BorderStyle,
    pub right: BorderStyle,
    pub top: BorderStyle,
    pub bottom: BorderStyle,
    pub color: Option<Color>,
}

impl Border {
    fn side_xml(&self, tag: &str, style: &BorderStyle) -> String {
        let Some(s) = style.as_xml_attr() else {
            return format!("<{tag}/>");
        };
        match &self.color {
            Some(c) => format!("<{tag} style=\"{s}\"><color rgb=\"{}\"/></{tag}>", c.as_argb()),
            None => format!("<{tag} style=\"{s}\"><color indexed=\"64\"/></{tag}>"),
        }
    }

    pub fn to_xml(&self) -> String {
        format!(
            "<border>{}{}{}{}<diagonal/></border>",
            self.side_xml("left", &self.left),
            self.side_xml("right", &self.right),
            self.side_xml("top", &self.top),
            self.side_xml("bottom", &self.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_border_is_empty() {
        assert_eq!(
            Border::default().to_xml(),
            "<border><left/><right/><top/><bottom/><diagonal/></border>"
        );
    }

    #[test]
    fn thin_side_uses_automatic_colour() {
        let b = Border {
            left: BorderStyle::Thin,
            ..Border::default()
        };
        assert!(b.to_xml().starts_with("<border><left style=\"thin\"><color indexed=\"64\"/></left><right/>"));
    }
}
