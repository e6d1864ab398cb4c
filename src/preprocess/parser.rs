//! Parser for preprocessed C/C++ output.
//!
//! Preprocessors record where included text came from with metadata lines.
//! This parser extracts every referenced header path from those lines; it
//! reports each occurrence, duplicates included, and leaves deduplication
//! to the caller.

use std::path::Path;

use anyhow::Result;
use regex::Regex;

use crate::util::fs::read_to_string;

/// Parser for preprocessed source files.
pub struct PreprocessedFileParser {
    /// Line-marker form: `# 12 "/usr/include/stdio.h" 1 3 4` or
    /// `#line 12 "/usr/include/stdio.h"`
    line_marker: Regex,
    /// Inline include-comment form: `/* #include "zlib.h" */`
    include_comment: Regex,
}

impl Default for PreprocessedFileParser {
    fn default() -> Self {
        PreprocessedFileParser {
            line_marker: Regex::new(r#"^#(?:line)?\s+\d+\s+"([^"]+)""#).unwrap(),
            include_comment: Regex::new(r#"^\s*(?://|/\*)\s*#include\s+["<]([^">]+)[">]"#)
                .unwrap(),
        }
    }
}

impl PreprocessedFileParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the referenced path from one line, if it is a metadata line.
    ///
    /// Pseudo files like `<built-in>` and `<command-line>` are not
    /// filesystem paths and are treated like any other unrecognized line.
    fn reference<'c>(&self, line: &'c str) -> Option<&'c str> {
        let captures = self
            .line_marker
            .captures(line)
            .or_else(|| self.include_comment.captures(line))?;

        let path = captures.get(1)?.as_str();
        if path.starts_with('<') {
            return None;
        }

        Some(path)
    }

    /// Iterate over every header reference in `content`, in file order.
    pub fn includes<'a>(&'a self, content: &'a str) -> IncludeTokens<'a> {
        IncludeTokens {
            parser: self,
            lines: content.lines(),
        }
    }

    /// Parse a preprocessed file, invoking `found` for every reference.
    ///
    /// Failing to read the file is fatal; an unreadable preprocessed file
    /// means the header list would be incomplete.
    pub fn parse_file(
        &self,
        path: &Path,
        mut found: impl FnMut(&str) -> Result<()>,
    ) -> Result<()> {
        let content = read_to_string(path)?;

        for token in self.includes(&content) {
            found(token)?;
        }

        Ok(())
    }
}

/// Lazy sequence of include tokens from one preprocessed file.
pub struct IncludeTokens<'a> {
    parser: &'a PreprocessedFileParser,
    lines: std::str::Lines<'a>,
}

impl<'a> Iterator for IncludeTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        for line in self.lines.by_ref() {
            if let Some(reference) = self.parser.reference(line) {
                return Some(reference);
            }
        }
        None
    }
}
