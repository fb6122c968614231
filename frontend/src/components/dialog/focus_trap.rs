//! Keyboard focus trap for modal dialogs.
//!
//! The trap owns the dialog's focusable descendants in document order together
//! with the navigation index of the element that last received focus. It only
//! computes targets; moving the browser focus is left to the caller so no
//! state is borrowed while focus events are dispatched.

/// An element the trap can hand focus to
pub trait Focusable {
    /// Disabled elements are skipped by Tab navigation
    fn is_disabled(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug)]
pub struct FocusTrap<E> {
    elements: Vec<E>,
    /// Navigation index of the most recently focused element. Equal to or
    /// past `elements.len()` when the focused element left the set.
    current: usize,
    /// Element that received focus without being part of the set, e.g. one
    /// added to the dialog after the last scan. Relocated on `refresh`.
    unlisted_focus: Option<E>,
}

impl<E: Focusable> FocusTrap<E> {
    pub fn new(elements: Vec<E>) -> Self {
        Self {
            elements,
            current: 0,
            unlisted_focus: None,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn current_tab_index(&self) -> usize {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }

    /// Whether the current index no longer points into the set
    pub fn is_stale(&self) -> bool {
        self.current >= self.len()
    }

    /// Select the first element, disabled or not. `None` for an empty set.
    pub fn initial_focus(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        self.current = 0;
        Some(0)
    }

    /// The element that would receive focus when moving in `direction`.
    ///
    /// Disabled elements are skipped and the scan wraps around, ending on the
    /// current element itself. A stale index scans the whole set from the
    /// start (forward) or the end (backward).
    pub fn next_index(&self, direction: Direction) -> Option<usize> {
        let len = self.elements.len();
        let enabled = |index: &usize| !self.elements[*index].is_disabled();

        if self.is_stale() {
            return match direction {
                Direction::Forward => (0..len).find(enabled),
                Direction::Backward => (0..len).rev().find(enabled),
            };
        }

        let current = self.current;
        match direction {
            Direction::Forward => (current + 1..len).chain(0..=current).find(enabled),
            Direction::Backward => (0..current).rev().chain((current..len).rev()).find(enabled),
        }
    }

    /// Move the navigation index one step in `direction`.
    ///
    /// Returns the index to focus, or `None` when focus should stay where it
    /// is: empty set, every element disabled, or the current element being
    /// the only enabled one.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let target = self.next_index(direction)?;
        if target == self.current {
            return None;
        }
        self.current = target;
        Some(target)
    }

    /// Select `index` directly. Out of range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.elements.len() {
            self.current = index;
            true
        } else {
            false
        }
    }
}

impl<E: Focusable + PartialEq> FocusTrap<E> {
    pub fn index_of(&self, element: &E) -> Option<usize> {
        self.elements.iter().position(|candidate| candidate == element)
    }

    /// Record that `element` received focus by any means (pointer, script or
    /// keyboard).
    ///
    /// An element outside the set leaves the index untouched but is
    /// remembered, so the next `refresh` continues from it once it shows up
    /// in the rescanned set.
    pub fn focused(&mut self, element: E) -> Option<usize> {
        match self.index_of(&element) {
            Some(index) => {
                self.current = index;
                self.unlisted_focus = None;
                Some(index)
            }
            None => {
                self.unlisted_focus = Some(element);
                None
            }
        }
    }

    /// Replace the set after the dialog content changed.
    ///
    /// The element that has focus keeps its identity across the refresh and
    /// is located in the new set: the last unlisted focus target if it is now
    /// listed, otherwise the tracked element. If neither is found the index
    /// becomes stale.
    pub fn refresh(&mut self, elements: Vec<E>) {
        let position = |target: &E| elements.iter().position(|candidate| candidate == target);

        let unlisted = self.unlisted_focus.take();
        let relocated = unlisted
            .as_ref()
            .and_then(position)
            .or_else(|| self.elements.get(self.current).and_then(position));

        self.current = relocated.unwrap_or(elements.len());
        self.elements = elements;
    }
}
