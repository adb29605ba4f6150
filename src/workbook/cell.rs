/// Value stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Excel keeps every number as f64.
    Number(f64),
    /// Written as an inline string, not through sharedStrings, so rows can be streamed.
    Text(String),
    Bool(bool),
    /// Formula without the leading `=`, e.g. "SUM(A1:A10)".
    Formula(String),
    Blank,
}

impl CellValue {
    pub fn num(v: f64) -> Self { CellValue::Number(v) }
    pub fn text(v: impl Into<String>) -> Self { CellValue::Text(v.into()) }
    pub fn bool(v: bool) -> Self { CellValue::Bool(v) }
    pub fn formula(v: impl Into<String>) -> Self {
        let v = v.into();
        match v.strip_prefix('=') {
            Some(rest) => CellValue::Formula(rest.to_string()),
            None => CellValue::Formula(v),
        }
    }

    /// Empty text is stored as a blank cell.
    pub fn text_or_blank(v: &str) -> Self {
        if v.is_empty() { CellValue::Blank } else { CellValue::text(v) }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_formula(&self) -> Option<&str> {
        match self {
            CellValue::Formula(f) => Some(f),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_drops_leading_equals() {
        assert_eq!(CellValue::formula("=TODAY()"), CellValue::Formula("TODAY()".into()));
        assert_eq!(CellValue::formula("NOW()"), CellValue::Formula("NOW()".into()));
    }

    #[test]
    fn empty_text_is_blank() {
        assert!(CellValue::text_or_blank("").is_blank());
        assert_eq!(CellValue::text_or_blank("SMK-01").as_text(), Some("SMK-01"));
    }
}
