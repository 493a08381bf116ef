//! Whitespace-preserving tokenizer.
//!
//! A line is cut into maximal whitespace runs and maximal non-whitespace runs.
//! Concatenating the runs in order gives back the input byte for byte.

use crate::model::{Line, Token};

/// A borrowed slice of a line: either a word or a whitespace run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub text: &'a str,
    pub is_space: bool,
}

impl<'a> Run<'a> {
    pub fn into_token(self) -> Token {
        if self.is_space {
            Token::space(self.text)
        } else {
            Token::word(self.text)
        }
    }
}

/// Iterator over the word/space runs of a single line.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = self
            .rest
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace() != is_space)
            .map(|(index, _)| index)
            .unwrap_or(self.rest.len());

        let (text, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(Run { text, is_space })
    }
}

pub fn split_runs(line: &str) -> Runs<'_> {
    Runs { rest: line }
}

/// Tokenizes one line of plain text. No chords are assigned.
pub fn tokenize_line(line: &str) -> Line {
    Line::new(split_runs(line).map(Run::into_token).collect())
}

/// Tokenizes a lyric block, producing one [`Line`] per `\n`-separated line.
pub fn tokenize_text(text: &str) -> Vec<Line> {
    text.split('\n').map(tokenize_line).collect()
}

/// Lyrics of the given lines with chords stripped, lines joined by `\n`.
pub fn plain_text(lines: &[Line]) -> String {
    lines.iter().map(Line::text).collect::<Vec<_>>().join("\n")
}
