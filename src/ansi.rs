//! ANSI color escape translation
//!
//! Converts the SGR color escapes that commands write (`ESC[31m`, `ESC[0m`)
//! into span markup for the renderer. Only the numeric code is looked at:
//! `0` closes a span, anything else opens one tagged with the code.
//!
//! The output is trusted markup. Surrounding text is not escaped, spans are
//! not balanced, and only the first newline of each call becomes a line
//! break.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Color escape marker: ESC `[` digits `m`
static ESCAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[(\d*)m").expect("escape marker pattern is valid"));

/// Markup emitted for the reset code
const CLOSE_SPAN: &str = "</span>";

/// Markup emitted in place of the first newline
const LINE_BREAK: &str = "<br/>";

/// The eight basic ANSI colors, indexed by `code % 10`
pub const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// Translate color escapes in `text` into span markup.
///
/// ```
/// use webtty::ansi::translate;
///
/// assert_eq!(
///     translate("\x1b[31mhi\x1b[0m"),
///     r#"<span class="c31">hi</span>"#
/// );
/// ```
pub fn translate(text: &str) -> String {
    let spans = ESCAPE_REGEX.replace_all(text, |caps: &Captures| marker_markup(&caps[1]));
    // Only the first newline is converted
    spans.replacen('\n', LINE_BREAK, 1)
}

/// Markup for a single marker's numeric code
fn marker_markup(code: &str) -> String {
    if code == "0" {
        CLOSE_SPAN.to_string()
    } else {
        format!(r#"<span class="{}">"#, class_name(code))
    }
}

/// CSS class carried by the span opened for `code`
pub fn class_name(code: &str) -> String {
    format!("c{}", code)
}

/// What a numeric color code means to the stylesheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
    /// `30..=37`
    Foreground(&'static str),
    /// `40..=47`
    Background(&'static str),
    /// Any other code: the span is emitted but no rule styles it
    Unstyled,
}

/// Describe the styling a code receives
pub fn color_class(code: u32) -> ColorClass {
    match code {
        30..=37 => ColorClass::Foreground(COLOR_NAMES[(code - 30) as usize]),
        40..=47 => ColorClass::Background(COLOR_NAMES[(code - 40) as usize]),
        _ => ColorClass::Unstyled,
    }
}

/// Remove every color escape, leaving the plain text
pub fn strip(text: &str) -> String {
    ESCAPE_REGEX.replace_all(text, "").into_owned()
}

/// Stylesheet rules for the color classes, scoped under `scope`
pub fn stylesheet(scope: &str) -> String {
    let foreground = COLOR_NAMES
        .iter()
        .enumerate()
        .map(|(index, color)| format!(".{} span.c3{} {{ color: {}; }}", scope, index, color));
    let background = COLOR_NAMES.iter().enumerate().map(|(index, color)| {
        format!(
            ".{} span.c4{} {{ background-color: {}; }}",
            scope, index, color
        )
    });

    foreground.chain(background).collect::<Vec<_>>().join("\n")
}
