//! Core library for the Chordsheet lyric and chord editor.
//!
//! Everything here is a pure function over owned song values: text goes in,
//! a new [`Song`] (or parsed structure) comes out, and no state is kept
//! between calls. The modules build on one another leaf first: the tokenizer
//! feeds the ChordPro codec and the alignment engine, and the chord algebra
//! handles transposition. `edit` and `session` wrap these for a host editor.

pub mod align;
pub mod chord;
pub mod codec;
pub mod config;
pub mod edit;
pub mod error;
pub mod model;
pub mod session;
pub mod tokenizer;

pub use align::{detect_language, detect_text_language, reattach, Alignment, AlignmentEngine};
pub use chord::{
    all_keys, capo_position, enharmonic, transpose_chord, transpose_song, ChordSymbol, Note,
};
pub use codec::{
    parse_document, parse_line, parse_song, serialize_line, serialize_lines, serialize_song,
    ParsedDocument,
};
pub use config::{AlignmentConfig, AutosaveConfig, EditorConfig, HistoryConfig};
pub use edit::{Edit, Editor};
pub use error::{ChordSheetError, Result};
pub use model::{Language, Line, Section, SectionType, Song, Token};
pub use session::{EditSession, History, SaveDebouncer};
pub use tokenizer::{plain_text, tokenize_line, tokenize_text};
