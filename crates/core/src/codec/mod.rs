//! ChordPro-style interchange format.
//!
//! Inline `[X]` markers sit directly before the word they modify; `{name}` and
//! `{name: value}` lines carry metadata and section boundaries. Intro, outro
//! and custom sections have no directive of their own and are written with
//! the verse pair, so their type does not survive a trip through text.

mod document;
mod line;

pub use document::{parse_document, parse_song, ParsedDocument};
pub use line::{parse_line, serialize_line, serialize_lines};

use crate::model::{SectionType, Song};

fn directive_pair(section_type: SectionType) -> (&'static str, &'static str, SectionType) {
    match section_type {
        SectionType::Chorus => ("soc", "eoc", SectionType::Chorus),
        SectionType::Bridge => ("sob", "eob", SectionType::Bridge),
        SectionType::Verse | SectionType::Intro | SectionType::Outro | SectionType::Custom => {
            ("sov", "eov", SectionType::Verse)
        }
    }
}

/// A directive ends at the first `}` and at the line break, so those are
/// taken out of written values.
fn directive_value(value: &str) -> String {
    let flat: String = value
        .chars()
        .filter(|&ch| ch != '}')
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .collect();
    flat.trim().to_string()
}

/// Writes a whole song back to ChordPro text.
pub fn serialize_song(song: &Song) -> String {
    let mut header = Vec::new();
    if !song.title.is_empty() {
        header.push(format!("{{title: {}}}", directive_value(&song.title)));
    }
    if let Some(artist) = &song.artist {
        header.push(format!("{{artist: {}}}", directive_value(artist)));
    }
    if let Some(key) = &song.key {
        header.push(format!("{{key: {}}}", directive_value(key)));
    }
    if let Some(capo) = song.capo {
        header.push(format!("{{capo: {capo}}}"));
    }

    let mut blocks = Vec::new();
    if !header.is_empty() {
        blocks.push(header.join("\n"));
    }

    for section in &song.sections {
        let (start, end, written_as) = directive_pair(section.section_type);
        let mut block = vec![format!("{{{start}}}")];
        // The parser hands every opened section its default label, so only a
        // different one needs a comment directive.
        if let Some(label) = &section.label {
            if label != written_as.default_label() {
                block.push(format!("{{c: {}}}", directive_value(label)));
            }
        }
        block.extend(section.lines.iter().map(serialize_line));
        block.push(format!("{{{end}}}"));
        blocks.push(block.join("\n"));
    }

    if blocks.is_empty() {
        return String::new();
    }
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}
