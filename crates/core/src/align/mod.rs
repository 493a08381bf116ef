//! Carries chords across free-form lyric edits.
//!
//! The old section's words and the retyped words are aligned in two passes.
//! An exact longest common subsequence pins every word that survived the
//! edit unchanged. Chord-bearing words left over are then paired with a
//! nearby, nearly identical new word, which catches typo fixes such as
//! `songd` → `songs`. Anything else loses its chord: dropping a chord is a
//! valid outcome, guessing onto an unrelated word is not.

mod lcs;

use tracing::debug;

use crate::{
    config::AlignmentConfig,
    model::{Language, Section, Song, Token},
    tokenizer::tokenize_text,
    ChordSheetError, Result,
};

use lcs::{edit_distance, lcs_pairs};

/// Mapping from new word positions to old word positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    new_to_old: Vec<Option<usize>>,
    exact: usize,
    fallback: usize,
}

impl Alignment {
    /// Old position the `new_index`-th new word was aligned with.
    pub fn old_index(&self, new_index: usize) -> Option<usize> {
        self.new_to_old.get(new_index).copied().flatten()
    }

    /// Pairs found by exact text matching.
    pub fn exact_matches(&self) -> usize {
        self.exact
    }

    /// Pairs recovered by the proximity fallback.
    pub fn fallback_matches(&self) -> usize {
        self.fallback
    }
}

/// Chord written after the last word of an old line.
struct TrailingChord<'a> {
    /// Old word it followed, if the line had any words.
    anchor: Option<usize>,
    line_index: usize,
    chord: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct AlignmentEngine {
    config: AlignmentConfig,
}

impl AlignmentEngine {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Aligns two word sequences. `carries_chord[i]` marks the old words the
    /// fallback pass is allowed to rescue.
    pub fn align(&self, old: &[&str], carries_chord: &[bool], new: &[&str]) -> Alignment {
        let mut new_to_old = vec![None; new.len()];
        let mut old_matched = vec![false; old.len()];

        let pairs = lcs_pairs(old, new);
        for &(i, j) in &pairs {
            new_to_old[j] = Some(i);
            old_matched[i] = true;
        }

        let mut fallback = 0;
        for i in 0..old.len() {
            if old_matched[i] || !carries_chord.get(i).copied().unwrap_or(false) {
                continue;
            }

            // Where the old word would sit now, judged from the closest
            // exact match before it.
            let shift = pairs
                .iter()
                .take_while(|(oi, _)| *oi < i)
                .last()
                .map(|&(oi, nj)| nj as isize - oi as isize)
                .unwrap_or(0);
            let expected = i as isize + shift;

            let candidate = (0..new.len())
                .filter(|&j| new_to_old[j].is_none())
                .filter(|&j| (j as isize - expected).unsigned_abs() <= self.config.max_index_distance)
                .filter(|&j| edit_distance(old[i], new[j]) <= self.config.max_edit_distance)
                .min_by_key(|&j| ((j as isize - expected).unsigned_abs(), j));

            if let Some(j) = candidate {
                new_to_old[j] = Some(i);
                fallback += 1;
            }
        }

        Alignment {
            new_to_old,
            exact: pairs.len(),
            fallback,
        }
    }

    /// Retokenizes `text` into a section that keeps the id, type and label of
    /// `old`, carrying chords onto the words they were aligned with.
    pub fn reattach(&self, old: &Section, text: &str) -> Section {
        let mut old_words = Vec::new();
        let mut trailing = Vec::new();
        for (line_index, line) in old.lines.iter().enumerate() {
            let mut anchor = None;
            for token in line.words() {
                match (&token.chord, token.text.is_empty()) {
                    (Some(chord), true) => trailing.push(TrailingChord {
                        anchor,
                        line_index,
                        chord,
                    }),
                    (None, true) => {}
                    (_, false) => {
                        anchor = Some(old_words.len());
                        old_words.push(token);
                    }
                }
            }
        }
        let old_texts: Vec<&str> = old_words.iter().map(|token| token.text.as_str()).collect();
        let carries_chord: Vec<bool> = old_words.iter().map(|token| token.chord.is_some()).collect();

        let mut lines = tokenize_text(text);
        let alignment = {
            let new_texts: Vec<&str> = lines
                .iter()
                .flat_map(|line| line.words())
                .map(|token| token.text.as_str())
                .collect();
            self.align(&old_texts, &carries_chord, &new_texts)
        };

        // Line holding each aligned old word on the new side.
        let mut landed_on = vec![None; old_words.len()];
        let mut carried = 0;
        let mut j = 0;
        for (line_index, line) in lines.iter_mut().enumerate() {
            for token in line.tokens.iter_mut().filter(|token| !token.is_space) {
                if let Some(i) = alignment.old_index(j) {
                    landed_on[i] = Some(line_index);
                    token.chord = old_words[i].chord.clone();
                }
                if token.chord.is_some() {
                    carried += 1;
                }
                j += 1;
            }
        }

        // A chord after the last word of a line follows that word to the end
        // of its new line. On a wordless line it stays only if the new line at
        // the same position is wordless too.
        for dangling in &trailing {
            let target = match dangling.anchor {
                Some(i) => landed_on[i],
                None => Some(dangling.line_index).filter(|&index| {
                    lines
                        .get(index)
                        .is_some_and(|line| line.words().next().is_none())
                }),
            };
            if let Some(line) = target.and_then(|index| lines.get_mut(index)) {
                line.tokens.push(Token::word("").with_chord(dangling.chord));
                carried += 1;
            }
        }

        let dropped = (carries_chord.iter().filter(|&&c| c).count() + trailing.len())
            .saturating_sub(carried);
        debug!(
            section = %old.id,
            exact = alignment.exact_matches(),
            fallback = alignment.fallback_matches(),
            carried,
            dropped,
            "reattached chords"
        );

        Section {
            id: old.id.clone(),
            section_type: old.section_type,
            label: old.label.clone(),
            lines,
        }
    }

    /// Replaces the lyrics of one section of `song` and refreshes the
    /// language tag. Fails only when `section_id` is not part of `song`.
    pub fn apply_lyrics(&self, song: &Song, section_id: &str, text: &str) -> Result<Song> {
        let index = song
            .sections
            .iter()
            .position(|section| section.id == section_id)
            .ok_or_else(|| ChordSheetError::SectionNotFound(section_id.to_string()))?;

        let mut next = song.clone();
        next.sections[index] = self.reattach(&song.sections[index], text);
        next.language = detect_language(&next);
        Ok(next)
    }
}

/// [`AlignmentEngine::reattach`] with the default limits.
pub fn reattach(old: &Section, text: &str) -> Section {
    AlignmentEngine::default().reattach(old, text)
}

fn is_hebrew(ch: char) -> bool {
    ('\u{0590}'..='\u{05FF}').contains(&ch)
}

/// Language tag for a piece of text: Hebrew and Latin letters together are
/// `mixed`, Hebrew alone is `he`, anything else is `en`.
pub fn detect_text_language<'a>(texts: impl IntoIterator<Item = &'a str>) -> Language {
    let (mut hebrew, mut latin) = (false, false);
    for ch in texts.into_iter().flat_map(str::chars) {
        hebrew |= is_hebrew(ch);
        latin |= ch.is_ascii_alphabetic();
        if hebrew && latin {
            return Language::Mixed;
        }
    }
    if hebrew {
        Language::He
    } else {
        Language::En
    }
}

pub fn detect_language(song: &Song) -> Language {
    detect_text_language(song.tokens().map(|token| token.text.as_str()))
}
