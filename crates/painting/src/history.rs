//! Stroke-grouped undo/redo history
//!
//! History is a linear timeline: committing a new stroke after an undo drops
//! everything on the redo stack. Observers receive the `(can_undo, can_redo)`
//! pair after every operation that actually changed the stacks.

use tracing::debug;

use crate::color_buffer::ColorBuffer;
use crate::stroke::Stroke;
use crate::types::HistoryState;

/// Callback invoked with the current history state
pub type HistoryObserver = Box<dyn FnMut(HistoryState) + Send + Sync>;

/// Handle returned by [`HistoryManager::on_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Undo and redo stacks of sealed strokes
#[derive(Default)]
pub struct HistoryManager {
    /// Undo stack (most recent at end)
    undo_stack: Vec<Stroke>,
    /// Redo stack (most recently undone at end)
    redo_stack: Vec<Stroke>,
    /// Maximum undo levels (None = unbounded)
    max_levels: Option<usize>,
    observers: Vec<(ObserverId, HistoryObserver)>,
    next_observer_id: u64,
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_count", &self.undo_stack.len())
            .field("redo_count", &self.redo_stack.len())
            .field("max_levels", &self.max_levels)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `max_levels` undo entries
    pub fn with_max_levels(max_levels: Option<usize>) -> Self {
        Self {
            max_levels,
            ..Self::default()
        }
    }

    pub fn set_max_levels(&mut self, max_levels: Option<usize>) {
        self.max_levels = max_levels;
        self.enforce_max_levels();
    }

    /// Register an observer. It is not called until the next change.
    pub fn on_change(
        &mut self,
        observer: impl FnMut(HistoryState) + Send + Sync + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Unregister an observer. Returns false if it was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn state(&self) -> HistoryState {
        HistoryState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of redo levels available
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Push a sealed stroke and invalidate the redo stack
    pub fn commit(&mut self, stroke: Stroke) {
        debug!(
            "Committed stroke {} ({} vertices), dropping {} redo entries",
            stroke.id,
            stroke.len(),
            self.redo_stack.len()
        );
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
        self.enforce_max_levels();
        self.notify();
    }

    /// Undo the last stroke
    ///
    /// Returns true if an undo was performed, false if no undo available
    pub fn undo(&mut self, colors: &mut ColorBuffer) -> bool {
        let Some(stroke) = self.undo_stack.pop() else {
            debug!("Undo: no entries available");
            return false;
        };

        debug!("Undoing stroke {} ({} vertices)", stroke.id, stroke.len());
        for delta in stroke.deltas() {
            colors.set(delta.vertex, delta.before);
        }

        self.redo_stack.push(stroke);
        self.notify();
        true
    }

    /// Redo the most recently undone stroke
    ///
    /// Returns true if a redo was performed, false if no redo available
    pub fn redo(&mut self, colors: &mut ColorBuffer) -> bool {
        let Some(stroke) = self.redo_stack.pop() else {
            debug!("Redo: no entries available");
            return false;
        };

        debug!("Redoing stroke {} ({} vertices)", stroke.id, stroke.len());
        for delta in stroke.deltas() {
            colors.set(delta.vertex, delta.after);
        }

        self.undo_stack.push(stroke);
        self.notify();
        true
    }

    /// Drop every redo entry. Observers hear about it only if any existed.
    pub fn clear_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        debug!("Dropping {} redo entries", self.redo_stack.len());
        self.redo_stack.clear();
        self.notify();
    }

    /// Clear both stacks
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.notify();
    }

    fn enforce_max_levels(&mut self) {
        let Some(max) = self.max_levels else {
            return;
        };
        if self.undo_stack.len() > max {
            let excess = self.undo_stack.len() - max;
            self.undo_stack.drain(..excess);
        }
    }

    fn notify(&mut self) {
        let state = self.state();
        for (_, observer) in &mut self.observers {
            observer(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
    const RED: [f32; 3] = [1.0, 0.0, 0.0];
    const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

    fn stroke(id: u64, changes: &[(u32, [f32; 3], [f32; 3])]) -> Stroke {
        let mut stroke = Stroke::new(id);
        for &(vertex, before, after) in changes {
            stroke.record(vertex, before, after);
        }
        stroke
    }

    /// Paint the stroke's final colors into the buffer, then commit it
    fn apply_and_commit(history: &mut HistoryManager, colors: &mut ColorBuffer, stroke: Stroke) {
        for delta in stroke.deltas() {
            colors.set(delta.vertex, delta.after);
        }
        history.commit(stroke);
    }

    #[test]
    fn test_undo_restores_and_enables_redo() {
        let mut colors = ColorBuffer::filled(3, WHITE);
        let mut history = HistoryManager::new();
        apply_and_commit(
            &mut history,
            &mut colors,
            stroke(0, &[(0, WHITE, RED), (1, WHITE, RED)]),
        );

        assert!(history.undo(&mut colors));
        assert_eq!(colors.as_slice(), &[WHITE, WHITE, WHITE]);
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut colors = ColorBuffer::filled(3, WHITE);
        let mut history = HistoryManager::new();
        apply_and_commit(&mut history, &mut colors, stroke(0, &[(0, WHITE, RED)]));
        apply_and_commit(
            &mut history,
            &mut colors,
            stroke(1, &[(0, RED, BLUE), (2, WHITE, BLUE)]),
        );
        let painted = colors.to_vec();

        assert!(history.undo(&mut colors));
        assert!(history.undo(&mut colors));
        assert_eq!(colors.as_slice(), &[WHITE, WHITE, WHITE]);
        assert!(!history.undo(&mut colors));

        assert!(history.redo(&mut colors));
        assert!(history.redo(&mut colors));
        assert_eq!(colors.to_vec(), painted);
        assert!(!history.redo(&mut colors));
    }

    #[test]
    fn test_commit_invalidates_redo() {
        let mut colors = ColorBuffer::filled(2, WHITE);
        let mut history = HistoryManager::new();
        apply_and_commit(&mut history, &mut colors, stroke(0, &[(0, WHITE, RED)]));
        history.undo(&mut colors);
        assert!(history.can_redo());

        apply_and_commit(&mut history, &mut colors, stroke(1, &[(1, WHITE, BLUE)]));
        assert!(!history.can_redo());
        assert!(!history.redo(&mut colors));
        assert_eq!(colors.as_slice(), &[WHITE, BLUE]);
    }

    #[test]
    fn test_clear_redo_notifies_only_on_change() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut colors = ColorBuffer::filled(1, WHITE);
        let mut history = HistoryManager::new();
        history.commit(stroke(0, &[(0, WHITE, RED)]));
        history.on_change(move |state| sink.lock().unwrap().push(state));

        history.clear_redo();
        assert!(seen.lock().unwrap().is_empty());

        history.undo(&mut colors);
        history.clear_redo();
        assert!(!history.can_redo());
        assert_eq!(
            seen.lock().unwrap().last(),
            Some(&HistoryState {
                can_undo: false,
                can_redo: false
            })
        );
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_max_levels_drops_oldest() {
        let mut colors = ColorBuffer::filled(1, WHITE);
        let mut history = HistoryManager::with_max_levels(Some(2));
        for id in 0..4 {
            history.commit(stroke(id, &[(0, WHITE, RED)]));
        }
        assert_eq!(history.undo_count(), 2);

        history.undo(&mut colors);
        history.undo(&mut colors);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_observers_notified() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut colors = ColorBuffer::filled(1, WHITE);
        let mut history = HistoryManager::new();
        history.on_change(move |state| sink.lock().unwrap().push(state));

        history.commit(stroke(0, &[(0, WHITE, RED)]));
        history.undo(&mut colors);
        history.undo(&mut colors); // empty, no notification
        history.redo(&mut colors);
        history.reset();

        let seen = seen.lock().unwrap();
        let pairs: Vec<(bool, bool)> = seen.iter().map(|s| (s.can_undo, s.can_redo)).collect();
        assert_eq!(
            pairs,
            vec![(true, false), (false, true), (true, false), (false, false)]
        );
    }

    #[test]
    fn test_remove_observer() {
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);

        let mut history = HistoryManager::new();
        let id = history.on_change(move |_| *sink.lock().unwrap() += 1);
        history.reset();
        assert!(history.remove_observer(id));
        assert!(!history.remove_observer(id));
        history.reset();

        assert_eq!(*count.lock().unwrap(), 1);
    }
}
