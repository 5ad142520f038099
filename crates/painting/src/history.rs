//! Checkpoint history for undo/redo
//!
//! History is a bounded, linear list of full snapshots of both layers.
//! The current position is `None` when no checkpoint is applied (blank
//! surfaces), otherwise the index of the applied checkpoint.

use std::collections::VecDeque;

use tracing::debug;

use crate::surface::SurfaceSnapshot;
use crate::surfaces::SurfaceSet;

/// Both layers captured at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    ink: SurfaceSnapshot,
    highlight: SurfaceSnapshot,
}

impl Checkpoint {
    pub fn new(ink: SurfaceSnapshot, highlight: SurfaceSnapshot) -> Self {
        Self { ink, highlight }
    }

    pub fn ink(&self) -> &SurfaceSnapshot {
        &self.ink
    }

    pub fn highlight(&self) -> &SurfaceSnapshot {
        &self.highlight
    }

    /// Memory held by both snapshots, in bytes
    pub fn byte_len(&self) -> usize {
        self.ink.byte_len() + self.highlight.byte_len()
    }
}

/// Bounded undo/redo stack of checkpoints
pub struct History {
    checkpoints: VecDeque<Checkpoint>,
    /// Applied checkpoint, None when blank
    index: Option<usize>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` checkpoints
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            checkpoints: VecDeque::with_capacity(capacity),
            index: None,
            capacity,
        }
    }

    /// Index of the applied checkpoint, None when blank
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.checkpoints.len()
    }

    /// The applied checkpoint
    pub fn current(&self) -> Option<&Checkpoint> {
        self.index.and_then(|i| self.checkpoints.get(i))
    }

    /// Stored checkpoint at a position
    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.checkpoints.get(index)
    }

    /// Memory held by all checkpoints, in bytes
    pub fn byte_len(&self) -> usize {
        self.checkpoints.iter().map(Checkpoint::byte_len).sum()
    }

    /// Record a checkpoint after the current one.
    ///
    /// Anything past the current position (the redo branch) is discarded.
    /// When full, the oldest checkpoint is evicted.
    pub fn push(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.truncate(self.next_index());
        self.checkpoints.push_back(checkpoint);

        if self.checkpoints.len() > self.capacity {
            self.checkpoints.pop_front();
            debug!("History full, evicted oldest checkpoint");
        }
        self.index = Some(self.checkpoints.len() - 1);

        debug!(
            "Pushed checkpoint {} of {} ({} bytes held)",
            self.checkpoints.len(),
            self.capacity,
            self.byte_len()
        );
    }

    /// Step back one checkpoint. Stepping below the first one blanks the
    /// surfaces. Returns false when already blank.
    pub fn undo(&mut self, surfaces: &mut SurfaceSet) -> bool {
        match self.index {
            None => {
                debug!("Undo: already at blank state");
                false
            }
            Some(0) => {
                self.index = None;
                surfaces.clear();
                debug!("Undo: back to blank state");
                true
            }
            Some(i) => {
                self.index = Some(i - 1);
                surfaces.restore(&self.checkpoints[i - 1]);
                debug!("Undo: now at checkpoint {}", i - 1);
                true
            }
        }
    }

    /// Step forward one checkpoint. Returns false when nothing to redo.
    pub fn redo(&mut self, surfaces: &mut SurfaceSet) -> bool {
        let next = self.next_index();
        let Some(checkpoint) = self.checkpoints.get(next) else {
            debug!("Redo: nothing to redo");
            return false;
        };
        surfaces.restore(checkpoint);
        self.index = Some(next);
        debug!("Redo: now at checkpoint {}", next);
        true
    }

    /// Drop every checkpoint and blank the surfaces. Not undoable.
    pub fn clear(&mut self, surfaces: &mut SurfaceSet) {
        self.checkpoints.clear();
        self.index = None;
        surfaces.clear();
        debug!("History cleared");
    }

    fn next_index(&self) -> usize {
        self.index.map_or(0, |i| i + 1)
    }
}
