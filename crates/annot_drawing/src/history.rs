use crate::document::Document;

/// Linear undo/redo over full-document snapshots.
///
/// `step` indexes the current entry; `-1` means nothing recorded yet (or undone
/// back to the empty document).
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Document>,
    step: isize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            step: -1,
        }
    }

    /// Snapshot `document`, discarding any redo branch.
    pub fn record(&mut self, document: &Document) {
        let keep = (self.step + 1) as usize;
        if keep < self.entries.len() {
            tracing::debug!(discarded = self.entries.len() - keep, "dropping redo branch");
            self.entries.truncate(keep);
        }
        self.entries.push(document.clone());
        self.step = self.entries.len() as isize - 1;
    }

    /// Step back. At the first entry this yields the empty document.
    pub fn undo(&mut self) -> Option<Document> {
        match self.step {
            s if s > 0 => {
                self.step -= 1;
                self.current().cloned()
            }
            0 => {
                self.step = -1;
                Some(Document::new())
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<Document> {
        if !self.can_redo() {
            return None;
        }
        self.step += 1;
        self.current().cloned()
    }

    /// Entry `step` points at, if any.
    pub fn current(&self) -> Option<&Document> {
        usize::try_from(self.step).ok().and_then(|i| self.entries.get(i))
    }

    pub fn can_undo(&self) -> bool {
        self.step >= 0
    }

    pub fn can_redo(&self) -> bool {
        self.step + 1 < self.entries.len() as isize
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn step(&self) -> isize {
        self.step
    }

    pub fn entries(&self) -> &[Document] {
        &self.entries
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.step = -1;
    }
}
