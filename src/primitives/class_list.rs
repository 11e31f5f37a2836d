//! Class Lists - Utility-class strings mapped onto the layout arrays.
//!
//! A small, terminal-sized subset of the familiar utility vocabulary:
//!
//! | class                          | effect                              |
//! |--------------------------------|-------------------------------------|
//! | `flex`                         | accepted (every box is flex)        |
//! | `flex-col[-reverse]`           | column direction                    |
//! | `flex-row[-reverse]`           | row direction                       |
//! | `items-{start,center,end,stretch}` | cross-axis alignment            |
//! | `justify-{start,center,end,between,around,evenly}` | main-axis alignment |
//! | `gap-N`, `p-N`, `px-N`, `py-N` | spacing                             |
//! | `w-full`, `h-full`, `w-N`, `h-N` | size                              |
//! | `grow`, `flex-1`               | flex grow 1                         |
//! | `mx-auto`                      | accepted (centering comes from the parent) |
//! | `text-[#rrggbb]`, `bg-[#rrggbb]` | colors                            |
//!
//! Spacing and size numbers use the 4-per-unit scale: `N` becomes
//! `max(1, N / 4)` cells for any `N > 0`, so `gap-4` is one row.
//! Unknown classes are ignored with a warning.

use crate::engine::arrays::layout::{self, Spacing};
use crate::engine::arrays::visual;
use crate::types::{AlignItems, Dimension, FlexDirection, JustifyContent, Rgba};

/// Styles collected from a class string. `None` leaves the array untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassStyle {
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub gap: Option<u16>,
    pub padding: Option<Spacing>,
    pub grow: Option<f32>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub fg: Option<Rgba>,
    pub bg: Option<Rgba>,
}

/// Convert a spacing-scale number to terminal cells.
pub fn spacing_cells(n: u16) -> u16 {
    if n == 0 { 0 } else { (n / 4).max(1) }
}

fn parse_spacing(value: &str) -> Option<u16> {
    value.parse::<u16>().ok().map(spacing_cells)
}

fn parse_size(value: &str) -> Option<Dimension> {
    match value {
        "full" => Some(Dimension::Percent(100.0)),
        "auto" => Some(Dimension::Auto),
        n => parse_spacing(n).map(Dimension::Cells),
    }
}

fn parse_bracket_color(value: &str) -> Option<Rgba> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;
    Rgba::from_hex(inner)
}

/// Parse a whitespace-separated class list. Later classes win.
pub fn parse_class_list(classes: &str) -> ClassStyle {
    let mut style = ClassStyle::default();

    for class in classes.split_whitespace() {
        let recognized = match class {
            "flex" | "mx-auto" => true,
            "flex-col" => set(&mut style.flex_direction, FlexDirection::Column),
            "flex-col-reverse" => set(&mut style.flex_direction, FlexDirection::ColumnReverse),
            "flex-row" => set(&mut style.flex_direction, FlexDirection::Row),
            "flex-row-reverse" => set(&mut style.flex_direction, FlexDirection::RowReverse),
            "items-start" => set(&mut style.align_items, AlignItems::FlexStart),
            "items-center" => set(&mut style.align_items, AlignItems::Center),
            "items-end" => set(&mut style.align_items, AlignItems::FlexEnd),
            "items-stretch" => set(&mut style.align_items, AlignItems::Stretch),
            "justify-start" => set(&mut style.justify_content, JustifyContent::FlexStart),
            "justify-center" => set(&mut style.justify_content, JustifyContent::Center),
            "justify-end" => set(&mut style.justify_content, JustifyContent::FlexEnd),
            "justify-between" => set(&mut style.justify_content, JustifyContent::SpaceBetween),
            "justify-around" => set(&mut style.justify_content, JustifyContent::SpaceAround),
            "justify-evenly" => set(&mut style.justify_content, JustifyContent::SpaceEvenly),
            "grow" | "flex-1" => set(&mut style.grow, 1.0),
            _ => parse_parametric(class, &mut style),
        };

        if !recognized {
            tracing::warn!(class, "ignoring unknown class");
        }
    }

    style
}

fn set<T>(slot: &mut Option<T>, value: T) -> bool {
    *slot = Some(value);
    true
}

fn parse_parametric(class: &str, style: &mut ClassStyle) -> bool {
    let Some((prefix, value)) = class.split_once('-') else {
        return false;
    };

    match prefix {
        "gap" => parse_spacing(value).map(|v| set(&mut style.gap, v)),
        "p" => parse_spacing(value).map(|v| set(&mut style.padding, Spacing::all(v))),
        "px" => parse_spacing(value).map(|v| {
            let mut padding = style.padding.unwrap_or_default();
            padding.left = v;
            padding.right = v;
            set(&mut style.padding, padding)
        }),
        "py" => parse_spacing(value).map(|v| {
            let mut padding = style.padding.unwrap_or_default();
            padding.top = v;
            padding.bottom = v;
            set(&mut style.padding, padding)
        }),
        "w" => parse_size(value).map(|v| set(&mut style.width, v)),
        "h" => parse_size(value).map(|v| set(&mut style.height, v)),
        "text" => parse_bracket_color(value).map(|v| set(&mut style.fg, v)),
        "bg" => parse_bracket_color(value).map(|v| set(&mut style.bg, v)),
        _ => None,
    }
    .unwrap_or(false)
}

/// Parse `classes` and write the result into the arrays at `index`.
pub fn apply_class_list(index: usize, classes: &str) {
    let style = parse_class_list(classes);
    tracing::trace!(index, classes, "applying class list");

    if let Some(v) = style.flex_direction {
        layout::set_flex_direction(index, v);
    }
    if let Some(v) = style.justify_content {
        layout::set_justify_content(index, v);
    }
    if let Some(v) = style.align_items {
        layout::set_align_items(index, v);
    }
    if let Some(v) = style.gap {
        layout::set_gap(index, v);
    }
    if let Some(v) = style.padding {
        layout::set_padding(index, v);
    }
    if let Some(v) = style.grow {
        layout::set_grow(index, v);
    }
    if let Some(v) = style.width {
        layout::set_width(index, v);
    }
    if let Some(v) = style.height {
        layout::set_height(index, v);
    }
    if let Some(v) = style.fg {
        visual::set_fg_color(index, v);
    }
    if let Some(v) = style.bg {
        visual::set_bg_color(index, v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_defaults() {
        let style = parse_class_list("flex flex-col-reverse items-center gap-4");
        assert_eq!(style.flex_direction, Some(FlexDirection::ColumnReverse));
        assert_eq!(style.align_items, Some(AlignItems::Center));
        assert_eq!(style.gap, Some(1));
        assert_eq!(style.padding, None);
    }

    #[test]
    fn test_spacing_scale() {
        assert_eq!(spacing_cells(0), 0);
        assert_eq!(spacing_cells(1), 1);
        assert_eq!(spacing_cells(4), 1);
        assert_eq!(spacing_cells(8), 2);
        assert_eq!(spacing_cells(10), 2);
    }

    #[test]
    fn test_sizes_and_padding() {
        let style = parse_class_list("w-full h-12 px-8 py-4");
        assert_eq!(style.width, Some(Dimension::Percent(100.0)));
        assert_eq!(style.height, Some(Dimension::Cells(3)));
        assert_eq!(style.padding, Some(Spacing::symmetric(1, 2)));
    }

    #[test]
    fn test_later_classes_win_and_unknown_ignored() {
        let style = parse_class_list("flex-row shadow-lg flex-col gap-x bg-[#ff0000]");
        assert_eq!(style.flex_direction, Some(FlexDirection::Column));
        assert_eq!(style.gap, None);
        assert_eq!(style.bg, Some(Rgba::RED));
    }

    #[test]
    fn test_apply_writes_arrays() {
        layout::reset();
        apply_class_list(3, "flex-col-reverse gap-8 w-full");
        assert_eq!(layout::get_flex_direction(3), FlexDirection::ColumnReverse);
        assert_eq!(layout::get_gap(3), 2);
        assert_eq!(layout::get_width(3), Dimension::Percent(100.0));
    }
}
