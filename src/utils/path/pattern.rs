//! File-name wildcard patterns.
//!
//! Supports `*` (any run of characters) and `?` (one character), matched
//! against the whole file name, e.g. `JSLITE*.js` or `*.css`. Everything else
//! is literal. Compiled once into an anchored regex.

use regex::Regex;
use std::fmt;

/// A compiled file-name wildcard pattern.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    /// Compile a wildcard pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut re = String::with_capacity(pattern.len() + 8);
        re.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => re.push_str(".*"),
                '?' => re.push('.'),
                other => re.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        re.push('$');

        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&re)?,
        })
    }

    /// Check if a file name matches.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl fmt::Display for FilePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
