use crate::{
    model::{Line, Token},
    tokenizer::split_runs,
};

/// Piece of an annotated line: either a `[chord]` marker or literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece<'a> {
    Chord(&'a str),
    Literal(&'a str),
}

fn pieces(line: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            pieces.push(Piece::Literal(rest));
            break;
        };
        let Some(close) = rest[open..].find(']').map(|offset| open + offset) else {
            // Unterminated marker: everything left is lyric text.
            pieces.push(Piece::Literal(rest));
            break;
        };

        if open > 0 {
            pieces.push(Piece::Literal(&rest[..open]));
        }
        pieces.push(Piece::Chord(&rest[open + 1..close]));
        rest = &rest[close + 1..];
    }

    pieces
}

/// Parses a single `[C]Hello [G]world` style line into tokens.
///
/// A marker sets the pending chord, replacing any earlier pending one, and the
/// next word token takes it. A chord left pending at the end of the line is
/// kept on a trailing empty word token. `[]` clears the pending chord.
pub fn parse_line(line: &str) -> Line {
    let mut tokens = Vec::new();
    let mut pending: Option<String> = None;

    for piece in pieces(line) {
        match piece {
            Piece::Chord(chord) if chord.is_empty() => pending = None,
            Piece::Chord(chord) => pending = Some(chord.to_string()),
            Piece::Literal(text) => {
                for run in split_runs(text) {
                    let mut token = run.into_token();
                    if !token.is_space {
                        token.chord = pending.take();
                    }
                    tokens.push(token);
                }
            }
        }
    }

    if let Some(chord) = pending {
        tokens.push(Token::word("").with_chord(chord));
    }

    Line::new(tokens)
}

/// Inverse of [`parse_line`]: `[chord]text` for every token, concatenated.
pub fn serialize_line(line: &Line) -> String {
    let mut out = String::new();
    for token in &line.tokens {
        if let Some(chord) = token.chord.as_deref().filter(|chord| !chord.is_empty()) {
            out.push('[');
            out.push_str(chord);
            out.push(']');
        }
        out.push_str(&token.text);
    }
    out
}

pub fn serialize_lines(lines: &[Line]) -> String {
    lines.iter().map(serialize_line).collect::<Vec<_>>().join("\n")
}
