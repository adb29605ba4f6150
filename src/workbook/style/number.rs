#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum NumberFormat {
    #[default]
    General,
    Date,     // 2024-01-31
    DateTime, // 2024-01-31 14:30
}

impl NumberFormat {
    pub fn builtin_id(&self) -> u32 {
        match self {
            NumberFormat::General => 0,
            NumberFormat::Date => 14,     // "m/d/yyyy"
            NumberFormat::DateTime => 22, // "m/d/yyyy h:mm"
        }
    }
}
