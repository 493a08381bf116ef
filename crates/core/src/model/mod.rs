//! In-memory song model shared by every other module.
//!
//! Tokens and lines are throwaway values: retokenizing a lyric block creates
//! fresh ones with fresh ids. Only the alignment engine deliberately moves a
//! chord from an old token onto a new one.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Creates a fresh opaque id for a token, line or section.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A word or a whitespace run inside a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_space: bool,
}

impl Token {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            chord: None,
            is_space: false,
        }
    }

    pub fn space(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            chord: None,
            is_space: true,
        }
    }

    /// Builder-style helper that attaches a chord to a word token. Space
    /// tokens are returned untouched.
    pub fn with_chord(mut self, chord: impl Into<String>) -> Self {
        if !self.is_space {
            self.chord = Some(chord.into());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: String,
    pub tokens: Vec<Token>,
}

impl Line {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            id: new_id(),
            tokens,
        }
    }

    /// Concatenated token text with chords stripped.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|token| token.text.as_str()).collect()
    }

    pub fn words(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|token| !token.is_space)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Verse,
    Chorus,
    Bridge,
    Intro,
    Outro,
    Custom,
}

impl SectionType {
    /// Label a freshly created section of this type starts with.
    pub fn default_label(self) -> &'static str {
        match self {
            SectionType::Verse => "Verse",
            SectionType::Chorus => "Chorus",
            SectionType::Bridge => "Bridge",
            SectionType::Intro => "Intro",
            SectionType::Outro => "Outro",
            SectionType::Custom => "Section",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionType::Verse => "verse",
            SectionType::Chorus => "chorus",
            SectionType::Bridge => "bridge",
            SectionType::Intro => "intro",
            SectionType::Outro => "outro",
            SectionType::Custom => "custom",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub lines: Vec<Line>,
}

impl Section {
    /// Empty section carrying the default label of its type.
    pub fn new(section_type: SectionType) -> Self {
        Self {
            id: new_id(),
            section_type,
            label: Some(section_type.default_label().to_string()),
            lines: Vec::new(),
        }
    }

    pub fn with_lines(mut self, lines: Vec<Line>) -> Self {
        self.lines = lines;
        self
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.lines.iter().flat_map(|line| line.tokens.iter())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
    Mixed,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Language::En => "en",
            Language::He => "he",
            Language::Mixed => "mixed",
        };
        f.write_str(tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capo: Option<u8>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Song {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.sections.iter().flat_map(|section| section.tokens())
    }
}
