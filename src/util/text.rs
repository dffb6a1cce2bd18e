use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string in terminal columns.
///
/// CJK and most emoji count as two columns, combining marks as zero.
///
/// ```
/// use lenta::util::display_width;
///
/// assert_eq!(display_width("Hello"), 5);
/// assert_eq!(display_width("Привет"), 6);
/// assert_eq!(display_width("你好"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` terminal columns.
///
/// Appends `...` when text is cut. Widths of 3 or less have no room for
/// "char + ellipsis", so as many characters as fit are returned without it.
/// Returns `Cow::Borrowed` when the string already fits.
///
/// ```
/// use lenta::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("你好世界", 7), "你好...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    if max_width <= ELLIPSIS_WIDTH {
        let mut byte_end = 0;
        let mut current_width = 0;
        for (idx, c) in s.char_indices() {
            let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
            if current_width + char_width > max_width {
                break;
            }
            current_width += char_width;
            byte_end = idx + c.len_utf8();
        }
        if byte_end == s.len() {
            return Cow::Borrowed(s);
        }
        return Cow::Owned(s[..byte_end].to_string());
    }

    let target_width = max_width - ELLIPSIS_WIDTH;
    let mut current_width = 0;
    let mut cut_point = None;

    for (idx, c) in s.char_indices() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);

        if cut_point.is_none() && current_width + char_width > target_width {
            cut_point = Some(idx);
        }
        if current_width + char_width > max_width {
            let cut = cut_point.unwrap_or(idx);
            return Cow::Owned(format!("{}{}", &s[..cut], ELLIPSIS));
        }
        current_width += char_width;
    }

    Cow::Borrowed(s)
}

/// Strip terminal control characters and ANSI escape sequences.
///
/// Article text comes from an external document and is written straight to
/// the terminal, so CSI (`ESC [` ... final byte), OSC (`ESC ]` ... BEL/ST),
/// bare ESC, DEL and C0 controls are removed. Tab, LF and CR are kept.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    fn is_stripped(b: u8) -> bool {
        b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
    }

    let bytes = s.as_bytes();
    if !bytes.iter().any(|&b| is_stripped(b)) {
        return Cow::Borrowed(s);
    }

    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];
        if b == 0x1b {
            match bytes.get(i + 1) {
                Some(b'[') => {
                    i += 2;
                    while i < len {
                        let c = bytes[i];
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 2;
                    while i < len {
                        if bytes[i] == 0x07 {
                            i += 1;
                            break;
                        }
                        if bytes[i] == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        } else if is_stripped(b) {
            i += 1;
        } else {
            let start = i;
            while i < len && !is_stripped(bytes[i]) {
                i += 1;
            }
            // Only ASCII bytes end a run, so the slice is on a char boundary.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncation_ascii_and_cyrillic() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Экономика и рынки", 9), "Эконом...");
        assert_eq!(truncate_to_width("Экономика", 9), "Экономика");
    }

    #[test]
    fn test_truncation_wide_chars() {
        assert_eq!(truncate_to_width("你好世界", 7), "你好...");
        assert_eq!(truncate_to_width("你好世界", 5), "你...");
        assert_eq!(truncate_to_width("你好", 1), "");
        assert_eq!(truncate_to_width("你好", 3), "你");
    }

    #[test]
    fn test_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 1), "T");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_fitting_string_is_borrowed() {
        assert!(matches!(truncate_to_width("12345", 5), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_clean_text_returns_borrowed() {
        let input = "line1\nline2\ttabbed\r\n";
        assert!(matches!(strip_control_chars(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_sequences() {
        assert_eq!(strip_control_chars("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_control_chars("\x1b]0;title\x07safe"), "safe");
        assert_eq!(strip_control_chars("\x1b]0;title\x1b\\safe"), "safe");
        assert_eq!(strip_control_chars("a\x1bb"), "ab");
        assert_eq!(strip_control_chars("he\x00ll\x7fo"), "hello");
    }

    #[test]
    fn test_strip_keeps_unicode() {
        assert_eq!(
            strip_control_chars("Новости \x1b[1mдня\x1b[0m"),
            "Новости дня"
        );
    }
}
