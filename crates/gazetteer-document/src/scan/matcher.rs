// SPDX-License-Identifier: PMPL-1.0-or-later
//
// Pattern matcher — compiles the user's newline-separated keyword/regex list
// and decides match/no-match per page, with highlight markup for rendering.

use gazetteer_core::error::GazetteerError;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Opening and closing markers wrapped around every match span in
/// [`PatternSet::highlight`] output.
pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// An ordered set of case-insensitive patterns, compiled once per scan and
/// immutable afterwards.
pub struct PatternSet {
    patterns: Vec<Regex>,
}

impl PatternSet {
    /// Compile a pattern set from the user-facing form value: one keyword or
    /// regex per line, blank lines ignored.
    ///
    /// An input with no usable lines is rejected before any scan work starts,
    /// as is any line that fails to compile.
    pub fn parse(input: &str) -> Result<Self, GazetteerError> {
        let lines: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(GazetteerError::InvalidPatterns(
                "no patterns given (empty after trimming blank lines)".to_owned(),
            ));
        }

        let mut patterns = Vec::with_capacity(lines.len());
        for line in lines {
            let regex = RegexBuilder::new(line)
                .case_insensitive(true)
                .build()
                .map_err(|err| {
                    GazetteerError::InvalidPatterns(format!("cannot compile {:?}: {}", line, err))
                })?;
            patterns.push(regex);
        }

        debug!(count = patterns.len(), "pattern set compiled");
        Ok(Self { patterns })
    }

    /// Number of compiled patterns (always at least one).
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Provided for clippy symmetry; a parsed set is never empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Wrap every match span of every pattern in `<mark>…</mark>`.
    ///
    /// Patterns are applied one at a time over the running text, in the order
    /// they were given: a later pattern sees — and can match inside — markers
    /// injected by an earlier one, so output depends on pattern order. That
    /// order dependence is kept deliberately so repeated runs with the same
    /// pattern list always render identically.
    pub fn highlight(&self, text: &str) -> String {
        let mut marked = text.to_owned();
        for pattern in &self.patterns {
            marked = pattern
                .replace_all(&marked, |caps: &regex::Captures<'_>| {
                    format!("{MARK_OPEN}{}{MARK_CLOSE}", &caps[0])
                })
                .into_owned();
        }
        marked
    }
}
