//! Display-width aware truncation and wrapping for card text.
//!
//! Widths come from `unicode-width`, so CJK titles and emoji take the two
//! columns the terminal gives them.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: &str = "…";

/// Display width of `s` in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Take as many leading chars of `s` as fit in `max_width` columns.
fn take_width(s: &str, max_width: usize) -> (&str, usize) {
    let mut width = 0;
    for (i, c) in s.char_indices() {
        let cw = char_width(c);
        if width + cw > max_width {
            return (&s[..i], width);
        }
        width += cw;
    }
    (s, width)
}

/// Truncate `s` to `max_width` columns, ending in [`ELLIPSIS`] when cut.
///
/// ```
/// use storefront::widgets::text::truncate;
///
/// assert_eq!(truncate("Samsung Universe 9", 10), "Samsung U…");
/// assert_eq!(truncate("iPhone 9", 10), "iPhone 9");
/// ```
pub fn truncate(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let (head, _) = take_width(s, max_width - display_width(ELLIPSIS));
    format!("{}{ELLIPSIS}", head.trim_end())
}

/// Word-wrap `s` into at most `max_lines` lines of `width` columns.
///
/// Words longer than a line are split. If the text does not fit, the last
/// line is truncated with [`ELLIPSIS`].
pub fn wrap(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut overflow = false;

    'words: for word in s.split_whitespace() {
        let mut word = word;
        loop {
            let word_width = display_width(word);
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue 'words;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
                if lines.len() == max_lines {
                    overflow = true;
                    break 'words;
                }
                continue;
            }
            // A single word wider than the line.
            let (head, head_width) = take_width(word, width);
            if head.is_empty() {
                // Zero-width fit (a wide char in a 1-column line); drop it.
                word = &word[word.chars().next().map_or(0, char::len_utf8)..];
                if word.is_empty() {
                    continue 'words;
                }
                continue;
            }
            current.push_str(head);
            current_width = head_width;
            word = &word[head.len()..];
            if word.is_empty() {
                continue 'words;
            }
        }
    }

    if !current.is_empty() {
        if lines.len() == max_lines {
            overflow = true;
        } else {
            lines.push(current);
        }
    }

    if overflow {
        if let Some(last) = lines.last_mut() {
            let (head, _) = take_width(last, width.saturating_sub(display_width(ELLIPSIS)));
            *last = format!("{}{ELLIPSIS}", head.trim_end());
        }
    }
    lines
}
