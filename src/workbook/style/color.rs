/// ARGB colour as written in styles.xml, e.g. `FF2E86AB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    /// Accepts `RRGGBB` or `AARRGGBB`, with or without a leading `#`.
    pub fn new(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            Color(format!("FF{}", hex.to_uppercase()))
        } else {
            Color(hex.to_uppercase())
        }
    }

    pub fn as_argb(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn opaque_alpha_is_added() {
        let c = Color::new("#2e86ab");
        assert_eq!(c.as_argb(), "FF2E86AB");
        assert_eq!(Color::new("80FFC107").as_argb(), "80FFC107");
    }
}
