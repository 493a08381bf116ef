use serde::{Deserialize, Serialize};

use crate::{
    align::AlignmentEngine,
    chord::transpose_song,
    config::AlignmentConfig,
    model::{Language, Section, SectionType, Song, Token},
    ChordSheetError, Result,
};

/// A single user-level change to a song, addressed by entity ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    AddChord {
        section_id: String,
        line_id: String,
        token_id: String,
        chord: String,
    },
    RemoveChord {
        section_id: String,
        line_id: String,
        token_id: String,
    },
    SetSectionLabel {
        section_id: String,
        label: String,
    },
    SetSectionType {
        section_id: String,
        section_type: SectionType,
    },
    /// Appends an empty section carrying the type's default label.
    AddSection {
        section_type: SectionType,
    },
    RemoveSection {
        section_id: String,
    },
    /// Replaces a section's lyrics, carrying chords to the retyped words.
    SetLyrics {
        section_id: String,
        text: String,
    },
    SetTitle {
        title: String,
    },
    SetArtist {
        artist: Option<String>,
    },
    SetKey {
        key: Option<String>,
    },
    SetCapo {
        capo: Option<u8>,
    },
    SetLanguage {
        language: Language,
    },
    Transpose {
        semitones: i32,
    },
}

/// Applies [`Edit`]s to songs. Every call returns a new song and leaves the
/// input untouched.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    engine: AlignmentEngine,
}

impl Editor {
    pub fn new(config: AlignmentConfig) -> Self {
        Self {
            engine: AlignmentEngine::new(config),
        }
    }

    pub fn apply(&self, song: &Song, edit: &Edit) -> Result<Song> {
        match edit {
            Edit::AddChord {
                section_id,
                line_id,
                token_id,
                chord,
            } => updated(song, |next| {
                let token = token_mut(next, section_id, line_id, token_id)?;
                if token.is_space {
                    return Err(ChordSheetError::SpaceToken(token_id.clone()));
                }
                token.chord = Some(chord.clone());
                Ok(())
            }),
            Edit::RemoveChord {
                section_id,
                line_id,
                token_id,
            } => updated(song, |next| {
                token_mut(next, section_id, line_id, token_id)?.chord = None;
                Ok(())
            }),
            Edit::SetSectionLabel { section_id, label } => updated(song, |next| {
                section_mut(next, section_id)?.label = Some(label.clone());
                Ok(())
            }),
            Edit::SetSectionType {
                section_id,
                section_type,
            } => updated(song, |next| {
                section_mut(next, section_id)?.section_type = *section_type;
                Ok(())
            }),
            Edit::AddSection { section_type } => updated(song, |next| {
                next.sections.push(Section::new(*section_type));
                Ok(())
            }),
            Edit::RemoveSection { section_id } => updated(song, |next| {
                let index = section_index(next, section_id)?;
                if next.sections.len() <= 1 {
                    return Err(ChordSheetError::LastSection);
                }
                next.sections.remove(index);
                Ok(())
            }),
            Edit::SetLyrics { section_id, text } => self.engine.apply_lyrics(song, section_id, text),
            Edit::SetTitle { title } => Ok(Song {
                title: title.clone(),
                ..song.clone()
            }),
            Edit::SetArtist { artist } => Ok(Song {
                artist: artist.clone(),
                ..song.clone()
            }),
            Edit::SetKey { key } => Ok(Song {
                key: key.clone(),
                ..song.clone()
            }),
            Edit::SetCapo { capo } => Ok(Song {
                capo: *capo,
                ..song.clone()
            }),
            Edit::SetLanguage { language } => Ok(Song {
                language: *language,
                ..song.clone()
            }),
            Edit::Transpose { semitones } => Ok(transpose_song(song, *semitones)),
        }
    }
}

/// Runs `change` on a copy of `song`. The copy is discarded on error.
fn updated(song: &Song, change: impl FnOnce(&mut Song) -> Result<()>) -> Result<Song> {
    let mut next = song.clone();
    change(&mut next)?;
    Ok(next)
}

fn section_index(song: &Song, section_id: &str) -> Result<usize> {
    song.sections
        .iter()
        .position(|section| section.id == section_id)
        .ok_or_else(|| ChordSheetError::SectionNotFound(section_id.to_string()))
}

fn section_mut<'a>(song: &'a mut Song, section_id: &str) -> Result<&'a mut Section> {
    let index = section_index(song, section_id)?;
    Ok(&mut song.sections[index])
}

fn token_mut<'a>(
    song: &'a mut Song,
    section_id: &str,
    line_id: &str,
    token_id: &str,
) -> Result<&'a mut Token> {
    let line = section_mut(song, section_id)?
        .lines
        .iter_mut()
        .find(|line| line.id == line_id)
        .ok_or_else(|| ChordSheetError::LineNotFound(line_id.to_string()))?;
    line.tokens
        .iter_mut()
        .find(|token| token.id == token_id)
        .ok_or_else(|| ChordSheetError::TokenNotFound(token_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{parse_song, serialize_lines};

    fn song() -> Song {
        parse_song("{title: T}\n{sov}\n[C]Hello world\n{eov}")
    }

    fn ids(song: &Song, token: usize) -> (String, String, String) {
        let section = &song.sections[0];
        let line = &section.lines[0];
        (section.id.clone(), line.id.clone(), line.tokens[token].id.clone())
    }

    #[test]
    fn adds_and_removes_chords() {
        let editor = Editor::default();
        let original = song();
        let (section_id, line_id, token_id) = ids(&original, 2);

        let added = editor
            .apply(
                &original,
                &Edit::AddChord {
                    section_id: section_id.clone(),
                    line_id: line_id.clone(),
                    token_id,
                    chord: "G".to_string(),
                },
            )
            .unwrap();
        assert_eq!(serialize_lines(&added.sections[0].lines), "[C]Hello [G]world");
        assert_eq!(serialize_lines(&original.sections[0].lines), "[C]Hello world");

        let (_, _, first) = ids(&added, 0);
        let removed = editor
            .apply(
                &added,
                &Edit::RemoveChord {
                    section_id,
                    line_id,
                    token_id: first,
                },
            )
            .unwrap();
        assert_eq!(serialize_lines(&removed.sections[0].lines), "Hello [G]world");
    }

    #[test]
    fn refuses_chord_on_space() {
        let original = song();
        let (section_id, line_id, token_id) = ids(&original, 1);
        let err = Editor::default()
            .apply(
                &original,
                &Edit::AddChord {
                    section_id,
                    line_id,
                    token_id,
                    chord: "D".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ChordSheetError::SpaceToken(_)));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let editor = Editor::default();
        let original = song();
        let (section_id, line_id, _) = ids(&original, 0);

        let err = editor
            .apply(
                &original,
                &Edit::RemoveChord {
                    section_id: section_id.clone(),
                    line_id: "nope".to_string(),
                    token_id: "x".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ChordSheetError::LineNotFound(_)));

        let err = editor
            .apply(
                &original,
                &Edit::RemoveChord {
                    section_id,
                    line_id,
                    token_id: "x".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ChordSheetError::TokenNotFound(_)));

        let err = editor
            .apply(
                &original,
                &Edit::SetSectionLabel {
                    section_id: "gone".to_string(),
                    label: "x".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, ChordSheetError::SectionNotFound(_)));
    }

    #[test]
    fn section_lifecycle() {
        let editor = Editor::default();
        let original = song();
        let first_id = original.sections[0].id.clone();

        let err = editor
            .apply(&original, &Edit::RemoveSection { section_id: first_id.clone() })
            .unwrap_err();
        assert!(matches!(err, ChordSheetError::LastSection));

        let two = editor
            .apply(&original, &Edit::AddSection { section_type: SectionType::Outro })
            .unwrap();
        assert_eq!(two.sections.len(), 2);
        assert_eq!(two.sections[1].label.as_deref(), Some("Outro"));

        let second_id = two.sections[1].id.clone();
        let retyped = editor
            .apply(
                &two,
                &Edit::SetSectionType {
                    section_id: second_id.clone(),
                    section_type: SectionType::Chorus,
                },
            )
            .unwrap();
        let relabelled = editor
            .apply(
                &retyped,
                &Edit::SetSectionLabel {
                    section_id: second_id,
                    label: "Big finish".to_string(),
                },
            )
            .unwrap();
        assert_eq!(relabelled.sections[1].section_type, SectionType::Chorus);
        assert_eq!(relabelled.sections[1].label.as_deref(), Some("Big finish"));

        let one = editor
            .apply(&relabelled, &Edit::RemoveSection { section_id: first_id })
            .unwrap();
        assert_eq!(one.sections.len(), 1);
        assert_eq!(one.sections[0].label.as_deref(), Some("Big finish"));
    }

    #[test]
    fn metadata_lyrics_and_transpose() {
        let editor = Editor::default();
        let original = song();
        let section_id = original.sections[0].id.clone();

        let edits = [
            Edit::SetTitle { title: "New".to_string() },
            Edit::SetArtist { artist: Some("Band".to_string()) },
            Edit::SetKey { key: Some("C".to_string()) },
            Edit::SetCapo { capo: Some(2) },
            Edit::SetLyrics {
                section_id,
                text: "Hello שלום".to_string(),
            },
            Edit::Transpose { semitones: 2 },
        ];
        let song = edits
            .iter()
            .try_fold(original, |song, edit| editor.apply(&song, edit))
            .unwrap();

        assert_eq!(song.title, "New");
        assert_eq!(song.artist.as_deref(), Some("Band"));
        assert_eq!(song.key.as_deref(), Some("D"));
        assert_eq!(song.capo, Some(2));
        assert_eq!(song.language, Language::Mixed);
        assert_eq!(serialize_lines(&song.sections[0].lines), "[D]Hello שלום");

        let forced = editor
            .apply(&song, &Edit::SetLanguage { language: Language::He })
            .unwrap();
        assert_eq!(forced.language, Language::He);
    }

    #[test]
    fn every_edit_leaves_its_input_untouched() {
        let editor = Editor::default();
        let original = song();
        let snapshot = original.clone();
        let (section_id, line_id, token_id) = ids(&original, 0);

        let edits = [
            Edit::RemoveChord {
                section_id: section_id.clone(),
                line_id,
                token_id,
            },
            Edit::SetSectionType {
                section_id: section_id.clone(),
                section_type: SectionType::Chorus,
            },
            Edit::AddSection { section_type: SectionType::Outro },
            Edit::SetLyrics {
                section_id: section_id.clone(),
                text: "Goodbye".to_string(),
            },
            Edit::SetTitle { title: "Other".to_string() },
            Edit::SetLanguage { language: Language::He },
            Edit::Transpose { semitones: 5 },
        ];
        for edit in &edits {
            let next = editor.apply(&original, edit).unwrap();
            assert_ne!(next, original, "{edit:?}");
        }
        assert_eq!(original, snapshot);

        let failed = editor.apply(&original, &Edit::RemoveSection { section_id });
        assert!(matches!(failed, Err(ChordSheetError::LastSection)));
    }

    #[test]
    fn edits_deserialize_from_tagged_json() {
        let edit: Edit = serde_json::from_str(r#"{"op":"transpose","semitones":-3}"#).unwrap();
        assert_eq!(edit, Edit::Transpose { semitones: -3 });

        let edit: Edit =
            serde_json::from_str(r#"{"op":"add_section","section_type":"bridge"}"#).unwrap();
        assert_eq!(edit, Edit::AddSection { section_type: SectionType::Bridge });
    }
}
