//! Property-based tests for escape translation

use proptest::prelude::*;
use webtty::ansi::{strip, translate};

proptest! {
    #[test]
    fn test_translate_doesnt_panic_on_random_input(s in "\\PC*") {
        let _ = translate(&s);
    }

    #[test]
    fn test_plain_text_unchanged(s in "[a-zA-Z0-9 .,:;<>&]{0,200}") {
        prop_assert_eq!(translate(&s), s);
    }

    #[test]
    fn test_colored_text_wrapped(text in "[a-zA-Z ]{0,100}", code in 30u8..48u8) {
        let markup = translate(&format!("\x1b[{}m{}\x1b[0m", code, text));
        prop_assert_eq!(markup, format!(r#"<span class="c{}">{}</span>"#, code, text));
    }

    #[test]
    fn test_at_most_one_line_break(lines in prop::collection::vec("[a-z]{0,10}", 1..6)) {
        let text = lines.join("\n");
        let markup = translate(&text);
        let newlines = text.matches('\n').count();
        prop_assert_eq!(markup.matches("<br/>").count(), newlines.min(1));
        prop_assert_eq!(markup.matches('\n').count(), newlines.saturating_sub(1));
    }

    #[test]
    fn test_strip_leaves_no_markers(text in "[a-z]{0,20}", codes in prop::collection::vec(0u8..50u8, 0..5)) {
        let colored: String = codes
            .iter()
            .map(|code| format!("\x1b[{}m{}", code, text))
            .collect();
        prop_assert!(!strip(&colored).contains('\x1b'));
    }
}
