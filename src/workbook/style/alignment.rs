#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAlign {
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAlign {
    Bottom,
    Center,
    Top,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alignment {
    pub horizontal: HAlign,
    pub vertical: VAlign,
    pub wrap_text: bool,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment {
            horizontal: HAlign::General,
            vertical: VAlign::Bottom,
            wrap_text: false,
        }
    }
}

impl Alignment {
    pub fn is_default(&self) -> bool {
        *self == Alignment::default()
    }

    /// `None` when the default alignment applies and the element can be left out.
    pub fn to_xml(&self) -> Option<String> {
        if self.is_default() {
            return None;
        }
        let mut xml = String::from("<alignment");
        match self.horizontal {
            HAlign::General => {}
            HAlign::Left => xml.push_str(" horizontal=\"left\""),
            HAlign::Center => xml.push_str(" horizontal=\"center\""),
            HAlign::Right => xml.push_str(" horizontal=\"right\""),
        }
        match self.vertical {
            VAlign::Bottom => {}
            VAlign::Center => xml.push_str(" vertical=\"center\""),
            VAlign::Top => xml.push_str(" vertical=\"top\""),
        }
        if self.wrap_text {
            xml.push_str(" wrapText=\"1\"");
        }
        xml.push_str("/>");
        Some(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_element() {
        assert_eq!(Alignment::default().to_xml(), None);
    }

    #[test]
    fn top_wrapped() {
        let a = Alignment {
            vertical: VAlign::Top,
            wrap_text: true,
            ..Alignment::default()
        };
        assert_eq!(a.to_xml().as_deref(), Some("<alignment vertical=\"top\" wrapText=\"1\"/>"));
    }
}
