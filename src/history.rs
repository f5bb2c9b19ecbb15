use std::collections::VecDeque;

/// Linear undo/redo store over a `past / present / future` triple.
///
/// `present` always holds a value. Saves deduplicate against the current
/// present, and both stacks are bounded by `depth` with the entry furthest
/// from the present evicted first. `VecDeque` makes the evict-at-one-end,
/// push-at-the-other pattern O(1) amortized on both stacks.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    depth: usize,
}

impl<T: Clone + PartialEq> History<T> {
    pub fn new(initial: T, depth: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    /// The current value.
    pub fn value(&self) -> &T {
        &self.present
    }

    /// Record `value` as the new present.
    ///
    /// Returns `false` without touching anything when `value` equals the
    /// current present. Otherwise the old present moves onto the past
    /// (evicting the oldest entry at the depth bound) and the future is
    /// discarded.
    pub fn save(&mut self, value: T) -> bool {
        if value == self.present {
            return false;
        }

        if self.past.len() >= self.depth {
            self.past.pop_front();
        }
        let previous = std::mem::replace(&mut self.present, value);
        self.past.push_back(previous);
        self.future.clear();
        true
    }

    /// Step back one entry. Returns `false` (and changes nothing) when the
    /// past is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        if self.future.len() >= self.depth {
            self.future.pop_back();
        }
        self.future.push_front(current);
        true
    }

    /// Step forward one entry. Returns `false` (and changes nothing) when
    /// the future is empty.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        if self.past.len() >= self.depth {
            self.past.pop_front();
        }
        self.past.push_back(current);
        true
    }

    /// Drop both stacks. The present value stays as it is, so the board
    /// keeps showing what it showed before the clear.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }
}
