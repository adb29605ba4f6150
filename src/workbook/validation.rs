use crate::workbook::{range::CellRange, xml_escape};

/// Longest inline list Excel accepts in `<formula1>`, quotes excluded.
pub const MAX_LIST_LEN: usize = 255;

/// List-type data validation: the cells in `range` accept only one of `values`
/// and show an in-cell dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataValidation {
    pub range: CellRange,
    pub values: Vec<String>,
    pub allow_blank: bool,
}

impl DataValidation {
    pub fn list<S: AsRef<str>>(range: CellRange, values: &[S]) -> Self {
        DataValidation {
            range,
            values: values.iter().map(|v| v.as_ref().to_string()).collect(),
            allow_blank: true,
        }
    }

    /// `"Pass,Fail,Skip"` form stored in `<formula1>`.
    pub fn formula1(&self) -> String {
        format!("\"{}\"", self.values.join(","))
    }

    /// Items may not be empty or contain `,` or `"`, and the joined list must fit
    /// in [`MAX_LIST_LEN`] characters.
    pub fn check_list(&self) -> Result<(), String> {
        if let Some(item) = self
            .values
            .iter()
            .find(|v| v.is_empty() || v.contains([',', '"']))
        {
            return Err(format!("list item '{item}' is empty or contains ',' or '\"'"));
        }
        let len = self.values.iter().map(|v| v.chars().count()).sum::<usize>()
            + self.values.len().saturating_sub(1);
        if len > MAX_LIST_LEN {
            return Err(format!("list is {len} characters, limit is {MAX_LIST_LEN}"));
        }
        Ok(())
    }

    pub fn to_xml(&self) -> String {
        let allow_blank = if self.allow_blank { 1 } else { 0 };
        format!(
            "<dataValidation type=\"list\" allowBlank=\"{allow_blank}\" showInputMessage=\"1\" showErrorMessage=\"1\" sqref=\"{}\"><formula1>{}</formula1></dataValidation>",
            self.range,
            xml_escape(&self.formula1())
        )
    }
}

pub(crate) fn data_validations_xml(validations: &[DataValidation]) -> String {
    if validations.is_empty() {
        return String::new();
    }
    let mut out = format!("<dataValidations count=\"{}\">", validations.len());
    for dv in validations {
        out.push_str(&dv.to_xml());
    }
    out.push_str("</dataValidations>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_xml() {
        let dv = DataValidation::list(CellRange::column(4, 3, 7), &["Nahuel", "QA Team", "Automated"]);
        assert_eq!(
            dv.to_xml(),
            "<dataValidation type=\"list\" allowBlank=\"1\" showInputMessage=\"1\" showErrorMessage=\"1\" sqref=\"E3:E7\"><formula1>&quot;Nahuel,QA Team,Automated&quot;</formula1></dataValidation>"
        );
    }

    #[test]
    fn list_items_must_not_split_or_break_the_formula() {
        let range = CellRange::column(4, 3, 7);
        assert_eq!(DataValidation::list(range, &["Nahuel", "QA Team"]).check_list(), Ok(()));
        assert!(DataValidation::list(range, &["Doe, Jane"]).check_list().is_err());
        assert!(DataValidation::list(range, &["QA \"Lead\""]).check_list().is_err());
        assert!(DataValidation::list(range, &["a", ""]).check_list().is_err());
    }

    #[test]
    fn list_length_limit_counts_separators() {
        let range = CellRange::column(4, 3, 7);
        let fits = ["x".repeat(127), "y".repeat(127)];
        assert_eq!(DataValidation::list(range, &fits).check_list(), Ok(()));
        let over = ["x".repeat(128), "y".repeat(127)];
        assert!(DataValidation::list(range, &over).check_list().is_err());
    }

    #[test]
    fn empty_section_is_omitted() {
        assert_eq!(data_validations_xml(&[]), "");
    }
}
