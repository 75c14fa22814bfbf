//! Lexical CSS reducer.
//!
//! Three passes, always in this order:
//!
//! 1. [`strip_comments`] - drop every `/* ... */` block (non-greedy, multi-line)
//! 2. [`collapse_whitespace`] - drop whitespace around `{ } : ; = , < >`
//! 3. [`trim_edges`] - drop leading/trailing whitespace
//!
//! Comments go first so that delimiters inside them are never collapsed; the
//! edge trim goes last. No CSS parsing happens: any input, including invalid
//! CSS, produces output.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{MinifyError, Minifier};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("comment pattern is a valid regex"));

static DELIMITER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*([{}:;=,<>])\s*").expect("delimiter pattern is a valid regex")
});

/// Remove every `/* ... */` block comment.
pub fn strip_comments(css: &str) -> String {
    COMMENT_RE.replace_all(css, "").into_owned()
}

/// Remove whitespace surrounding structural characters, keeping the character.
pub fn collapse_whitespace(css: &str) -> String {
    DELIMITER_RE.replace_all(css, "$1").into_owned()
}

/// Remove leading and trailing whitespace.
pub fn trim_edges(css: &str) -> String {
    css.trim().to_string()
}

/// Run all three passes in order.
pub fn reduce_css(css: &str) -> String {
    trim_edges(&collapse_whitespace(&strip_comments(css)))
}

/// [`Minifier`] backed by [`reduce_css`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CssReducer;

impl Minifier for CssReducer {
    fn name(&self) -> &str {
        "css-reducer"
    }

    fn minify(&self, path: &Path) -> Result<String, MinifyError> {
        let source = std::fs::read_to_string(path).map_err(MinifyError::Read)?;
        Ok(reduce_css(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_removal() {
        assert_eq!(
            reduce_css("a{color:red;}/* comment */b{color:blue;}"),
            "a{color:red;}b{color:blue;}"
        );
    }

    #[test]
    fn test_whitespace_collapsing() {
        assert_eq!(reduce_css("a {  color : red ;  }"), "a{color:red;}");
    }

    #[test]
    fn test_multiline_comment() {
        let css = "/*\n * Header\n * { not: code; }\n */\nbody {\n  margin : 0;\n}\n";
        assert_eq!(reduce_css(css), "body{margin:0;}");
    }

    #[test]
    fn test_comments_are_non_greedy() {
        let css = "/* a */ p { x : 1 } /* b */ q { y : 2 }";
        assert_eq!(reduce_css(css), "p{x:1}q{y:2}");
    }

    #[test]
    fn test_all_delimiters() {
        let css = "a , b > c { d = e ; f < g }";
        assert_eq!(collapse_whitespace(css), "a,b>c{d=e;f<g}");
    }

    #[test]
    fn test_inner_spaces_kept() {
        // Only whitespace next to a delimiter is removed
        assert_eq!(
            reduce_css("p { margin : 0 auto ; }"),
            "p{margin:0 auto;}"
        );
    }

    #[test]
    fn test_idempotent_on_reduced_input() {
        let once = reduce_css("div .x {\n  padding : 1px 2px ;\n}\n\nspan{ color : #fff }");
        assert_eq!(reduce_css(&once), once);
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(reduce_css(""), "");
        assert_eq!(reduce_css("  \n\t "), "");
        assert_eq!(reduce_css("/* only a comment */"), "");
    }

    #[test]
    fn test_unclosed_comment_left_alone() {
        // Lexical only: an unterminated comment is not a comment
        assert_eq!(reduce_css("a { b : c } /* open"), "a{b:c}/* open");
    }

    #[test]
    fn test_passes_are_independent() {
        let css = "  /* c */ a { }  ";
        assert_eq!(strip_comments(css), "   a { }  ");
        assert_eq!(trim_edges("  x  "), "x");
    }

    #[test]
    fn test_reducer_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.css");
        std::fs::write(&path, "body {\n  color : red ;\n}\n").unwrap();
        assert_eq!(CssReducer.minify(&path).unwrap(), "body{color:red;}");
    }

    #[test]
    fn test_reducer_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CssReducer.minify(&dir.path().join("nope.css")).unwrap_err();
        assert!(matches!(err, MinifyError::Read(_)));
    }
}
