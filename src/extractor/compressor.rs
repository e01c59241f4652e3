//! The text pipeline applied to every HTML file.
//!
//! Four substitutions run in a fixed order: comments are removed, line breaks
//! become spaces, tabs become spaces, and runs of spaces collapse to one.
//! Nothing here understands HTML structure, so whitespace inside `<pre>`,
//! `<textarea>` or attribute values is collapsed as well.
//!
//! Matching is done on raw bytes. Every pattern is ASCII, so bytes outside
//! the matches pass through untouched whatever the file's encoding.

use once_cell::sync::Lazy;
use regex::bytes::Regex;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s-u)<!--.*?-->").unwrap());
static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());
static TAB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t").unwrap());
static SPACE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Strip comments and collapse whitespace in `input`.
pub fn compress_html(input: &[u8]) -> Vec<u8> {
    let without_comments = COMMENT_RE.replace_all(input, &b""[..]);
    let single_line = LINE_BREAK_RE.replace_all(&without_comments, &b" "[..]);
    let without_tabs = TAB_RE.replace_all(&single_line, &b" "[..]);
    SPACE_RUN_RE.replace_all(&without_tabs, &b" "[..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compress(input: &str) -> String {
        String::from_utf8(compress_html(input.as_bytes())).unwrap()
    }

    #[test]
    fn test_reference_example() {
        let input = "<p>\n\t Hello   <!-- note -->  World</p>";
        assert_eq!(compress(input), "<p> Hello World</p>");
    }

    #[test]
    fn test_multiline_comment_removed() {
        let input = "<div><!--\n  first line\r\n  second line\n--></div>";
        assert_eq!(compress(input), "<div></div>");
    }

    #[test]
    fn test_comments_are_non_greedy() {
        let input = "a<!-- one -->b<!-- two -->c";
        assert_eq!(compress(input), "abc");
    }

    #[test]
    fn test_unterminated_comment_is_kept() {
        let input = "<p>text</p><!-- never closed";
        assert_eq!(compress(input), "<p>text</p><!-- never closed");
    }

    #[test]
    fn test_every_line_terminator_becomes_one_space() {
        assert_eq!(compress("a\r\nb"), "a b");
        assert_eq!(compress("a\rb"), "a b");
        assert_eq!(compress("a\nb"), "a b");
        // CR LF is a single terminator, LF CR is two, but spaces collapse anyway.
        assert_eq!(compress("a\n\rb"), "a b");
    }

    #[test]
    fn test_leading_and_trailing_space_preserved() {
        assert_eq!(compress("\n\n<html>\n"), " <html> ");
        assert_eq!(compress("\t\t"), " ");
    }

    #[test]
    fn test_non_breaking_and_other_whitespace_untouched() {
        let input = "a\u{a0}\u{a0}b\u{c}c";
        assert_eq!(compress(input), input);
    }

    #[test]
    fn test_removing_comment_can_join_spaces() {
        assert_eq!(compress("a <!-- x --> b"), "a b");
    }

    #[test]
    fn test_already_compact_input_is_unchanged() {
        let input = "<!DOCTYPE html><html><body><p>Hi there</p></body></html>";
        assert_eq!(compress(input), input);
        assert_eq!(compress(&compress(input)), input);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compress(""), "");
    }

    #[test]
    fn test_latin1_bytes_pass_through() {
        let input = b"<p>caf\xe9\n\t  cr\xe8me</p>";
        assert_eq!(compress_html(input), b"<p>caf\xe9 cr\xe8me</p>".to_vec());
    }

    #[test]
    fn test_comment_with_invalid_utf8_is_removed() {
        let input = b"a<!-- \xff\xfe -->b";
        assert_eq!(compress_html(input), b"ab".to_vec());
    }
}
