use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    AlreadyExists(String),
    #[error("{0}")]
    NotFound(String),
    #[error("invalid sheet name '{0}'")]
    InvalidSheetName(String),
    #[error("row {row} written after row {last} in sheet '{sheet}'")]
    RowOutOfOrder { sheet: String, row: u32, last: u32 },
    #[error("invalid template: {0}")]
    InvalidTemplate(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
}
