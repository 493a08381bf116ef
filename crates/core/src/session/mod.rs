//! Host-side bookkeeping around the pure core: a bounded undo history and a
//! debounced save timer. Both take the current time as an argument instead of
//! reading a clock, so they behave the same under test as in an editor loop.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use tracing::debug;

use crate::{
    config::EditorConfig,
    edit::{Edit, Editor},
    model::Song,
    Result,
};

/// Linear snapshot history. Committing after an undo discards the redo tail;
/// once full, the oldest snapshot is evicted.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Song>,
    index: usize,
    capacity: usize,
}

impl History {
    pub fn new(initial: Song, capacity: usize) -> Self {
        let mut snapshots = VecDeque::new();
        snapshots.push_back(initial);
        Self {
            snapshots,
            index: 0,
            capacity: capacity.max(1),
        }
    }

    pub fn current(&self) -> &Song {
        &self.snapshots[self.index]
    }

    pub fn commit(&mut self, song: Song) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push_back(song);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot, staying put at the oldest one.
    pub fn undo(&mut self) -> &Song {
        self.index = self.index.saturating_sub(1);
        self.current()
    }

    pub fn redo(&mut self) -> &Song {
        if self.index + 1 < self.snapshots.len() {
            self.index += 1;
        }
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Holds the latest unsaved snapshot until no new one arrived for `delay`.
#[derive(Debug, Clone)]
pub struct SaveDebouncer {
    delay: Duration,
    pending: Option<(Instant, Song)>,
}

impl SaveDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces any pending snapshot and restarts the quiet period.
    pub fn schedule(&mut self, now: Instant, song: Song) {
        self.pending = Some((now + self.delay, song));
    }

    /// Returns the snapshot to persist once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Song> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.flush(),
            _ => None,
        }
    }

    /// Hands out the pending snapshot right away, e.g. on shutdown.
    pub fn flush(&mut self) -> Option<Song> {
        self.pending.take().map(|(_, song)| song)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// One song being edited: applies edits, records them for undo and queues
/// the result for saving.
#[derive(Debug, Clone)]
pub struct EditSession {
    editor: Editor,
    history: History,
    autosave: SaveDebouncer,
}

impl EditSession {
    pub fn new(song: Song, config: &EditorConfig) -> Self {
        Self {
            editor: Editor::new(config.alignment),
            history: History::new(song, config.history.capacity),
            autosave: SaveDebouncer::new(Duration::from_millis(config.autosave.debounce_ms)),
        }
    }

    pub fn song(&self) -> &Song {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Applies `edit` to the current song. A failed edit leaves the session
    /// unchanged.
    pub fn apply(&mut self, edit: &Edit, now: Instant) -> Result<&Song> {
        let next = self.editor.apply(self.history.current(), edit)?;
        self.autosave.schedule(now, next.clone());
        self.history.commit(next);
        debug!(snapshots = self.history.len(), "committed edit");
        Ok(self.history.current())
    }

    pub fn undo(&mut self) -> &Song {
        self.history.undo()
    }

    pub fn redo(&mut self) -> &Song {
        self.history.redo()
    }

    /// Snapshot due for persistence, if the quiet period has elapsed.
    pub fn poll_save(&mut self, now: Instant) -> Option<Song> {
        self.autosave.poll(now)
    }

    pub fn flush_save(&mut self) -> Option<Song> {
        self.autosave.flush()
    }
}
