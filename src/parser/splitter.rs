use std::iter::FusedIterator;
use std::str::Split;

/// Lazy iterator over the statements of a script, in script order.
///
/// Splitting is purely lexical: a `;` inside a string or collection literal
/// still ends the statement.
#[derive(Debug, Clone)]
pub struct Statements<'a> {
    segments: Split<'a, char>,
}

pub fn split_statements(script: &str) -> Statements<'_> {
    Statements {
        segments: script.split(';'),
    }
}

impl Iterator for Statements<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.segments
            .by_ref()
            .map(str::trim)
            .find(|segment| !segment.is_empty())
            .map(|segment| format!("{segment};"))
    }
}

impl FusedIterator for Statements<'_> {}
