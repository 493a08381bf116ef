use tracing::trace;

use crate::{
    align::detect_language,
    model::{Section, SectionType, Song},
};

use super::line::parse_line;

/// Metadata and sections recovered from a ChordPro-style document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub capo: Option<u8>,
    pub sections: Vec<Section>,
}

impl From<ParsedDocument> for Song {
    fn from(doc: ParsedDocument) -> Self {
        let mut song = Song {
            title: doc.title.unwrap_or_default(),
            artist: doc.artist,
            key: doc.key,
            capo: doc.capo,
            sections: doc.sections,
            ..Default::default()
        };
        song.language = detect_language(&song);
        song
    }
}

/// `{name}` or `{name: value}` on a trimmed line. The name is lower-cased.
fn directive(line: &str) -> Option<(String, &str)> {
    let inner = line.strip_prefix('{')?.strip_suffix('}')?;
    if inner.contains('}') {
        return None;
    }

    let (name, value) = match inner.split_once(':') {
        Some((name, value)) => (name, value.trim()),
        None => (inner, ""),
    };
    if name.is_empty() {
        return None;
    }

    Some((name.trim().to_lowercase(), value))
}

fn looks_like_lyrics(line: &str) -> bool {
    line.contains('[')
        || line
            .chars()
            .any(|ch| ch.is_ascii_alphabetic() || ('\u{0590}'..='\u{05FF}').contains(&ch))
}

#[derive(Debug)]
struct OpenSection {
    section: Section,
    raw: Vec<String>,
}

#[derive(Debug, Default)]
struct Builder {
    doc: ParsedDocument,
    open: Option<OpenSection>,
}

impl Builder {
    fn open(&mut self, section_type: SectionType) {
        self.close();
        self.open = Some(OpenSection {
            section: Section::new(section_type),
            raw: Vec::new(),
        });
    }

    /// Emits the open section unless every buffered line is blank.
    fn close(&mut self) {
        let Some(OpenSection { mut section, raw }) = self.open.take() else {
            return;
        };
        if raw.iter().all(|line| line.trim().is_empty()) {
            trace!(section = %section.section_type, "dropping blank section");
            return;
        }
        section.lines = raw.iter().map(|line| parse_line(line)).collect();
        self.doc.sections.push(section);
    }

    fn apply_directive(&mut self, name: &str, value: &str) {
        match name {
            "title" | "t" => self.doc.title = Some(value.to_string()),
            "artist" | "st" => self.doc.artist = Some(value.to_string()),
            "key" => self.doc.key = Some(value.to_string()),
            "capo" => match value.parse::<u8>() {
                Ok(capo) => self.doc.capo = Some(capo),
                Err(_) => trace!(value, "ignoring malformed capo directive"),
            },
            "sov" | "start_of_verse" => self.open(SectionType::Verse),
            "soc" | "start_of_chorus" => self.open(SectionType::Chorus),
            "sob" | "start_of_bridge" => self.open(SectionType::Bridge),
            "eov" | "end_of_verse" | "eoc" | "end_of_chorus" | "eob" | "end_of_bridge" => {
                self.close()
            }
            "c" | "comment" => {
                if let Some(open) = self.open.as_mut() {
                    open.section.label = Some(value.to_string());
                }
            }
            other => trace!(directive = other, "ignoring unrecognised directive"),
        }
    }

    fn push_line(&mut self, raw: &str) {
        if self.open.is_none() {
            if !looks_like_lyrics(raw.trim()) {
                return;
            }
            self.open(SectionType::Verse);
        }
        if let Some(open) = self.open.as_mut() {
            open.raw.push(raw.to_string());
        }
    }

    fn finish(mut self) -> ParsedDocument {
        self.close();
        self.doc
    }
}

/// Parses a whole ChordPro-style document. Never fails: unknown directives
/// are skipped and malformed markup degrades to lyric text.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut builder = Builder::default();

    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        match directive(raw.trim()) {
            Some((name, value)) => builder.apply_directive(&name, value),
            None => builder.push_line(raw),
        }
    }

    builder.finish()
}

pub fn parse_song(text: &str) -> Song {
    parse_document(text).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;

    #[test]
    fn parses_metadata_and_verse() {
        let doc = parse_document("{title: Test}\n{sov}\n[C]Hello [G]world\n{eov}");
        assert_eq!(doc.title.as_deref(), Some("Test"));
        assert_eq!(doc.sections.len(), 1);

        let section = &doc.sections[0];
        assert_eq!(section.section_type, SectionType::Verse);
        assert_eq!(section.lines.len(), 1);

        let tokens = &section.lines[0].tokens;
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "Hello");
        assert_eq!(tokens[0].chord.as_deref(), Some("C"));
        assert!(tokens[1].is_space);
        assert_eq!(tokens[2].text, "world");
        assert_eq!(tokens[2].chord.as_deref(), Some("G"));
    }

    #[test]
    fn aliases_and_last_occurrence_win() {
        let doc = parse_document("{t: First}\n{st: Someone}\n{key: C}\n{title: Second}\n{key: Eb}");
        assert_eq!(doc.title.as_deref(), Some("Second"));
        assert_eq!(doc.artist.as_deref(), Some("Someone"));
        assert_eq!(doc.key.as_deref(), Some("Eb"));
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn section_pairs_and_labels() {
        let text = "{soc}\n{c: Refrain}\n[D]la la\n{eoc}\n{start_of_bridge}\nover\n{end_of_bridge}";
        let doc = parse_document(text);
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].section_type, SectionType::Chorus);
        assert_eq!(doc.sections[0].label.as_deref(), Some("Refrain"));
        assert_eq!(doc.sections[1].section_type, SectionType::Bridge);
        assert_eq!(doc.sections[1].label.as_deref(), Some("Bridge"));
    }

    #[test]
    fn opening_a_section_closes_the_previous_one() {
        let doc = parse_document("{sov}\none\n{soc}\ntwo\n{eoc}");
        let types: Vec<_> = doc.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Verse, SectionType::Chorus]);
    }

    #[test]
    fn lyrics_without_directives_open_a_verse() {
        let doc = parse_document("\n\n[G]שלום עולם\nsecond line\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].section_type, SectionType::Verse);
        assert_eq!(doc.sections[0].lines[0].tokens[0].chord.as_deref(), Some("G"));
    }

    #[test]
    fn non_lyric_noise_outside_sections_is_skipped() {
        let doc = parse_document("1234\n---\n");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn blank_sections_are_discarded() {
        let doc = parse_document("{sov}\n   \n\n{eov}\n{soc}\n{eoc}");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn unknown_and_malformed_directives_are_ignored() {
        let doc = parse_document("{sov}\n{tempo: 120}\n{capo: x}\nwords\n{eov}");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].lines.len(), 1);
        assert_eq!(doc.capo, None);

        // `{}` has no name, so it is not a directive and stays lyric text.
        let doc = parse_document("{sov}\n{}\n{eov}");
        assert_eq!(doc.sections[0].lines[0].text(), "{}");
    }

    #[test]
    fn comment_outside_section_is_ignored() {
        let doc = parse_document("{c: nowhere}\n{sov}\nhi\n{eov}");
        assert_eq!(doc.sections[0].label.as_deref(), Some("Verse"));
    }

    #[test]
    fn handles_crlf_and_empty_input() {
        let doc = parse_document("{title: Win}\r\n{sov}\r\nline\r\n{eov}\r\n");
        assert_eq!(doc.title.as_deref(), Some("Win"));
        assert_eq!(doc.sections[0].lines[0].text(), "line");

        assert_eq!(parse_document(""), ParsedDocument::default());
        assert_eq!(parse_document("  \n \n"), ParsedDocument::default());
    }

    #[test]
    fn song_conversion_detects_language() {
        let song = parse_song("{title: Boker}\n[Am]בוקר טוב");
        assert_eq!(song.title, "Boker");
        assert_eq!(song.language, Language::He);
    }
}
