//! Activation lifecycle of a dialog's focus trap.
//!
//! A dialog starts `Inactive`, is `Scheduled` on mount while the activation
//! timer runs, and becomes `Active` once its focusable content has been
//! scanned. The timer handle `T` and the listener handles `L` are owned by the
//! phase they belong to, so leaving a phase releases them by dropping.

use super::focus_trap::{Direction, FocusTrap, Focusable};

pub const TAB_KEY_CODE: u32 = 9;
pub const ESCAPE_KEY_CODE: u32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DialogState {
    pub active: bool,
    pub current_tab_index: usize,
}

/// Keys the trap reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    ShiftTab,
    Escape,
    Other,
}

impl Key {
    /// Classify a keyboard event from its `key` value, legacy `keyCode` and
    /// shift state.
    pub fn classify(key: &str, key_code: u32, shift: bool) -> Self {
        match (key, key_code) {
            ("Escape" | "Esc", _) | (_, ESCAPE_KEY_CODE) => Key::Escape,
            ("Tab", _) | (_, TAB_KEY_CODE) if shift => Key::ShiftTab,
            ("Tab", _) | (_, TAB_KEY_CODE) => Key::Tab,
            _ => Key::Other,
        }
    }

    pub fn is_tab(self) -> bool {
        matches!(self, Key::Tab | Key::ShiftTab)
    }
}

/// What the caller has to do with a keydown event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// Leave the event alone
    Ignored,
    /// Invoke the close callback with the event
    CloseRequested,
    /// Prevent the default traversal and focus the given index, if any
    Navigated(Option<usize>),
}

impl KeyResponse {
    pub fn prevents_default(self) -> bool {
        matches!(self, KeyResponse::Navigated(_))
    }
}

/// Everything that exists only while the trap is armed
#[derive(Debug)]
pub struct ActiveSession<E, L> {
    pub trap: FocusTrap<E>,
    _listeners: L,
}

#[derive(Debug)]
enum Phase<T, E, L> {
    Inactive,
    Scheduled(T),
    Active(ActiveSession<E, L>),
}

#[derive(Debug)]
pub struct DialogLifecycle<T, E, L> {
    phase: Phase<T, E, L>,
}

impl<T, E, L> Default for DialogLifecycle<T, E, L> {
    fn default() -> Self {
        Self {
            phase: Phase::Inactive,
        }
    }
}

impl<T, E: Focusable, L> DialogLifecycle<T, E, L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_inactive(&self) -> bool {
        matches!(self.phase, Phase::Inactive)
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.phase, Phase::Scheduled(_))
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    pub fn state(&self) -> DialogState {
        match &self.phase {
            Phase::Active(session) => DialogState {
                active: true,
                current_tab_index: session.trap.current_tab_index(),
            },
            _ => DialogState::default(),
        }
    }

    pub fn trap(&self) -> Option<&FocusTrap<E>> {
        match &self.phase {
            Phase::Active(session) => Some(&session.trap),
            _ => None,
        }
    }

    fn trap_mut(&mut self) -> Option<&mut FocusTrap<E>> {
        match &mut self.phase {
            Phase::Active(session) => Some(&mut session.trap),
            _ => None,
        }
    }

    pub fn element(&self, index: usize) -> Option<&E> {
        self.trap().and_then(|trap| trap.get(index))
    }

    /// Enter `Scheduled`, keeping `timer` alive until activation or teardown.
    /// Only an inactive dialog can be scheduled; otherwise `timer` is dropped.
    pub fn schedule(&mut self, timer: T) -> bool {
        if !self.is_inactive() {
            return false;
        }
        self.phase = Phase::Scheduled(timer);
        true
    }

    /// Arm the trap. Only a scheduled dialog can be activated; a dialog that
    /// was torn down in the meantime rejects the session and its listeners
    /// are dropped right away.
    pub fn activate(&mut self, trap: FocusTrap<E>, listeners: L) -> bool {
        if !self.is_scheduled() {
            return false;
        }
        self.phase = Phase::Active(ActiveSession {
            trap,
            _listeners: listeners,
        });
        true
    }

    /// Select the first focusable element after activation
    pub fn focus_first(&mut self) -> Option<usize> {
        self.trap_mut().and_then(FocusTrap::initial_focus)
    }

    /// Release the timer or the listeners and reset the state. Returns
    /// whether anything was released; repeated calls are no-ops.
    pub fn teardown(&mut self) -> bool {
        !matches!(std::mem::replace(&mut self.phase, Phase::Inactive), Phase::Inactive)
    }

    pub fn handle_key(&mut self, key: Key, disable_escape: bool) -> KeyResponse {
        let Some(trap) = self.trap_mut() else {
            return KeyResponse::Ignored;
        };

        match key {
            Key::Escape if disable_escape => KeyResponse::Ignored,
            Key::Escape => KeyResponse::CloseRequested,
            Key::Tab => KeyResponse::Navigated(trap.navigate(Direction::Forward)),
            Key::ShiftTab => KeyResponse::Navigated(trap.navigate(Direction::Backward)),
            Key::Other => KeyResponse::Ignored,
        }
    }
}

impl<T, E: Focusable + PartialEq, L> DialogLifecycle<T, E, L> {
    /// Follow focus that moved by other means than Tab
    pub fn focused(&mut self, element: E) -> Option<usize> {
        self.trap_mut().and_then(|trap| trap.focused(element))
    }

    /// Swap in a freshly scanned focusable set
    pub fn refresh(&mut self, elements: Vec<E>) -> bool {
        match self.trap_mut() {
            Some(trap) => {
                trap.refresh(elements);
                true
            }
            None => false,
        }
    }
}
