use crate::{
    template::results::Status,
    workbook::style::{
        Style,
        alignment::{HAlign, VAlign},
        border::BorderStyle,
        number::NumberFormat,
    },
};

pub const BRAND_BLUE: &str = "2E86AB";
pub const SECTION_BLUE: &str = "366092";
pub const SECTION_FILL: &str = "E8F4FD";

pub fn title() -> Style {
    Style::new()
        .bold()
        .font_color(BRAND_BLUE)
        .font_size(14)
        .align(HAlign::Center)
}

pub fn header() -> Style {
    Style::new()
        .bold()
        .font_color("FFFFFF")
        .font_size(12)
        .bg(BRAND_BLUE)
        .border_all(BorderStyle::Thin)
        .align(HAlign::Center)
        .valign(VAlign::Center)
}

pub fn section() -> Style {
    Style::new()
        .bold()
        .font_color(SECTION_BLUE)
        .font_size(11)
        .bg(SECTION_FILL)
        .border_all(BorderStyle::Thin)
        .valign(VAlign::Top)
        .wrap()
}

pub fn body() -> Style {
    Style::new()
        .font_size(10)
        .border_all(BorderStyle::Thin)
        .valign(VAlign::Top)
        .wrap()
}

pub fn date() -> Style {
    body().format(NumberFormat::Date)
}

pub fn timestamp() -> Style {
    body().format(NumberFormat::DateTime)
}

/// Font and fill colours for the statuses that have their own look.
/// Skip and Blocked fall back to the body style.
pub fn status_colors(status: Status) -> Option<(&'static str, &'static str)> {
    match status {
        Status::Pending => Some(("FFC107", "FFF3CD")),
        Status::Pass => Some(("28A745", "D4EDDA")),
        Status::Fail => Some(("DC3545", "F8D7DA")),
        Status::Skip | Status::Blocked => None,
    }
}

pub fn status(status: Status) -> Style {
    match status_colors(status) {
        Some((font, fill)) => Style::new()
            .bold()
            .font_color(font)
            .bg(fill)
            .border_all(BorderStyle::Thin)
            .valign(VAlign::Top)
            .wrap(),
        None => body(),
    }
}
