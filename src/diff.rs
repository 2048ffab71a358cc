//! Positional comparison of an attempt against the original text.
//!
//! Characters are compared index by index over the length of the original.
//! There is no alignment: one inserted or dropped character shifts the rest
//! of the attempt and every later position mismatches.

use crate::content::{push_char, TextRun};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffCell {
    pub expected: char,
    /// Character of the attempt at this position, `None` past its end.
    pub actual: Option<char>,
    pub matched: bool,
}

impl DiffCell {
    /// Character shown for this position: the attempt's, or the expected one
    /// where the attempt ran out.
    pub fn shown(&self) -> char {
        self.actual.unwrap_or(self.expected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    cells: Vec<DiffCell>,
}

impl DiffResult {
    pub fn cells(&self) -> &[DiffCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn matched_flags(&self) -> Vec<bool> {
        self.cells.iter().map(|c| c.matched).collect()
    }

    pub fn mismatch_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.matched).count()
    }

    pub fn first_mismatch(&self) -> Option<usize> {
        self.cells.iter().position(|c| !c.matched)
    }

    pub fn is_exact(&self) -> bool {
        self.cells.iter().all(|c| c.matched)
    }

    /// Runs for display, mismatches highlighted.
    pub fn runs(&self) -> Vec<TextRun> {
        let mut runs = Vec::new();
        for cell in &self.cells {
            push_char(&mut runs, cell.shown(), !cell.matched);
        }
        runs
    }

    /// Plain-text rendering with each highlighted run wrapped in the markers.
    pub fn render_marked(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for run in self.runs() {
            if run.highlighted {
                out.push_str(open);
                out.push_str(&run.text);
                out.push_str(close);
            } else {
                out.push_str(&run.text);
            }
        }
        out
    }
}

/// Compare `attempt` with `original` position by position.
///
/// The result has one cell per character of `original`. Extra characters at
/// the end of `attempt` are ignored; positions the attempt does not reach are
/// mismatches.
pub fn compare(original: &str, attempt: &str) -> DiffResult {
    let mut attempt_chars = attempt.chars();
    let cells = original
        .chars()
        .map(|expected| {
            let actual = attempt_chars.next();
            DiffCell {
                expected,
                actual,
                matched: actual == Some(expected),
            }
        })
        .collect();
    DiffResult { cells }
}
