//! Chord symbol parsing and transposition.
//!
//! The chord vocabulary is open ended: a symbol is a root note, an opaque
//! quality suffix and an optional `/bass` note. Anything that does not start
//! with a root note is passed through untouched.

use std::fmt;

use crate::model::Song;

const SHARP_NOTES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const FLAT_NOTES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Roots whose customary keys are written with flats.
const FLAT_KEYS: [&str; 6] = ["F", "Bb", "Eb", "Ab", "Db", "Gb"];

/// Keys offered by the key picker, majors first.
const ALL_KEYS: [&str; 24] = [
    "C", "G", "D", "A", "E", "B", "F#", "Db", "Ab", "Eb", "Bb", "F", "Am", "Em", "Bm", "F#m",
    "C#m", "G#m", "D#m", "Bbm", "Fm", "Cm", "Gm", "Dm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A note name such as `E`, `F#` or `Bb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub letter: char,
    pub accidental: Accidental,
}

impl Note {
    /// Parses a note at the start of `input`, returning it together with the
    /// unconsumed remainder.
    pub fn parse_prefix(input: &str) -> Option<(Note, &str)> {
        let mut chars = input.chars();
        let letter = chars.next().filter(|ch| ('A'..='G').contains(ch))?;
        let rest = chars.as_str();

        let (accidental, rest) = match rest.chars().next() {
            Some('#') => (Accidental::Sharp, &rest[1..]),
            Some('b') => (Accidental::Flat, &rest[1..]),
            _ => (Accidental::Natural, rest),
        };

        Some((Note { letter, accidental }, rest))
    }

    /// Parses a string that consists of exactly one note.
    pub fn parse(input: &str) -> Option<Note> {
        match Note::parse_prefix(input)? {
            (note, "") => Some(note),
            _ => None,
        }
    }

    /// Pitch class with C = 0.
    pub fn pitch_class(self) -> u8 {
        let natural: i8 = match self.letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            _ => 11,
        };
        let offset = match self.accidental {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        };
        (natural + offset).rem_euclid(12) as u8
    }

    fn prefers_flats(self) -> bool {
        FLAT_KEYS.contains(&self.to_string().as_str())
    }

    /// Moves the note by `semitones`, choosing the flat spelling when the
    /// note's own key prefers flats or the shift goes down, but not both.
    pub fn transpose(self, semitones: i32) -> Note {
        let index = (i32::from(self.pitch_class()) + semitones.rem_euclid(12)).rem_euclid(12) as usize;
        let table = if self.prefers_flats() != (semitones < 0) {
            &FLAT_NOTES
        } else {
            &SHARP_NOTES
        };
        // Table entries are always valid notes.
        Note::parse(table[index]).unwrap_or(self)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter)?;
        match self.accidental {
            Accidental::Natural => Ok(()),
            Accidental::Sharp => f.write_str("#"),
            Accidental::Flat => f.write_str("b"),
        }
    }
}

/// Parsed chord symbol. Displaying it reproduces the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChordSymbol {
    pub root: Note,
    pub quality: String,
    pub bass: Option<Note>,
}

impl ChordSymbol {
    pub fn parse(input: &str) -> Option<ChordSymbol> {
        let (root, rest) = Note::parse_prefix(input)?;

        // Only a trailing `/<note>` is a bass; `C6/9` keeps `6/9` as quality.
        let (quality, bass) = match rest.rfind('/') {
            Some(slash) => match Note::parse(&rest[slash + 1..]) {
                Some(bass) => (&rest[..slash], Some(bass)),
                None => (rest, None),
            },
            None => (rest, None),
        };

        Some(ChordSymbol {
            root,
            quality: quality.to_string(),
            bass,
        })
    }

    pub fn transpose(&self, semitones: i32) -> ChordSymbol {
        ChordSymbol {
            root: self.root.transpose(semitones),
            quality: self.quality.clone(),
            bass: self.bass.map(|bass| bass.transpose(semitones)),
        }
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}

/// Transposes a chord symbol by `semitones`. Unparseable symbols, and any
/// symbol moved by zero, come back exactly as given.
pub fn transpose_chord(chord: &str, semitones: i32) -> String {
    if semitones == 0 {
        return chord.to_string();
    }
    match ChordSymbol::parse(chord) {
        Some(symbol) => symbol.transpose(semitones).to_string(),
        None => chord.to_string(),
    }
}

/// Transposes the song key and every chord. Lyrics are left untouched.
pub fn transpose_song(song: &Song, semitones: i32) -> Song {
    let mut next = song.clone();
    if semitones == 0 {
        return next;
    }

    if let Some(key) = next.key.as_mut() {
        *key = transpose_chord(key, semitones);
    }
    for token in next
        .sections
        .iter_mut()
        .flat_map(|section| section.lines.iter_mut())
        .flat_map(|line| line.tokens.iter_mut())
    {
        if let Some(chord) = token.chord.as_mut() {
            *chord = transpose_chord(chord, semitones);
        }
    }
    next
}

/// The other common spelling of a black-key note, e.g. `C#` ↔ `Db`.
pub fn enharmonic(note: &str) -> String {
    let swapped = SHARP_NOTES
        .iter()
        .zip(FLAT_NOTES.iter())
        .find_map(|(sharp, flat)| match note {
            n if n == *sharp && sharp != flat => Some(*flat),
            n if n == *flat && sharp != flat => Some(*sharp),
            _ => None,
        });
    swapped.unwrap_or(note).to_string()
}

/// Semitones between the roots of two keys, in `0..12`. Unparseable keys
/// give 0.
pub fn capo_position(from_key: &str, to_key: &str) -> u8 {
    match (ChordSymbol::parse(from_key), ChordSymbol::parse(to_key)) {
        (Some(from), Some(to)) => {
            (i16::from(to.root.pitch_class()) - i16::from(from.root.pitch_class())).rem_euclid(12)
                as u8
        }
        _ => 0,
    }
}

pub fn all_keys() -> &'static [&'static str] {
    &ALL_KEYS
}
