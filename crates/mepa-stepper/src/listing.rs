//! Instruction listing
//!
//! Lines are numbered from 0 so that the instruction pointer indexes them
//! directly. Highlighting is derived from a `ViewModel` only.

use crate::projector::ViewModel;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    lines: Vec<String>,
}

/// A listing line ready to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLine<'a> {
    pub number: usize,
    pub text: &'a str,
    pub current: bool,
}

impl Listing {
    pub fn new(instructions: &str) -> Self {
        Self {
            lines: instructions.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, number: usize) -> Option<&str> {
        self.lines.get(number).map(String::as_str)
    }

    /// All lines, with the one at the instruction pointer marked current.
    pub fn render(&self, view: &ViewModel) -> Vec<ListingLine<'_>> {
        self.lines_in(0, self.lines.len(), view.instruction_pointer)
    }

    /// Up to `radius` lines either side of `current`, clamped to the listing.
    pub fn window(&self, current: usize, radius: usize) -> Vec<ListingLine<'_>> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        let centre = current.min(self.lines.len() - 1);
        let start = centre.saturating_sub(radius);
        let end = centre.saturating_add(radius).saturating_add(1).min(self.lines.len());
        self.lines_in(start, end, current)
    }

    /// Plain-text rendering with a `>` gutter on the current line.
    pub fn to_text(&self, view: &ViewModel) -> String {
        let width = self.lines.len().saturating_sub(1).to_string().len();
        let mut text = String::new();
        for line in self.render(view) {
            let marker = if line.current { '>' } else { ' ' };
            let _ = writeln!(text, "{} {:>width$} | {}", marker, line.number, line.text);
        }
        text
    }

    fn lines_in(&self, start: usize, end: usize, current: usize) -> Vec<ListingLine<'_>> {
        self.lines[start..end]
            .iter()
            .enumerate()
            .map(|(offset, text)| ListingLine {
                number: start + offset,
                text: text.as_str(),
                current: start + offset == current,
            })
            .collect()
    }
}
