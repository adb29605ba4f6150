pub mod error;
pub mod reader;
pub mod template;
pub mod workbook;

pub type Result<T> = std::result::Result<T, error::Error>;
