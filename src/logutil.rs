//! Keep player- and server-supplied text on one log line.
//!
//! Guesses come from the terminal and error strings come from the server, so
//! either may carry newlines or escape sequences that would split or recolor a
//! log record. Both are short, so nothing is truncated.

use std::borrow::Cow;

/// Escape control characters and backslashes in `s`. Clean text, which is
/// nearly every guess, is borrowed as is.
pub fn escape_log(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c == '\\' || c.is_control()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        if ch == '\\' || ch.is_control() {
            out.extend(ch.escape_default());
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_guesses_are_borrowed() {
        assert!(matches!(escape_log("mailbox"), Cow::Borrowed("mailbox")));
        assert_eq!(escape_log("don't"), "don't");
    }

    #[test]
    fn server_errors_stay_on_one_line() {
        assert_eq!(
            escape_log("word not\nallowed\r\t!"),
            "word not\\nallowed\\r\\t!"
        );
        assert_eq!(escape_log("a\\b"), "a\\\\b");
    }

    #[test]
    fn ansi_escapes_are_neutralized() {
        assert_eq!(escape_log("\x1b[31mred"), "\\u{1b}[31mred");
    }
}
