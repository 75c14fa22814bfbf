//! Pipeline phase state machine.
//!
//! ```text
//! Idle -> Resolving -> Invoking -> Assembling -> Done
//!   \________\___________\____________\______-> Aborted
//! ```
//!
//! `Done` and `Aborted` are terminal.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Resolving,
    Invoking,
    Assembling,
    Done,
    Aborted,
}

impl Phase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// The single forward successor of a non-terminal phase.
    const fn successor(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Resolving),
            Self::Resolving => Some(Self::Invoking),
            Self::Invoking => Some(Self::Assembling),
            Self::Assembling => Some(Self::Done),
            Self::Done | Self::Aborted => None,
        }
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_enter(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        next == Self::Aborted || self.successor() == Some(next)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Invoking => "invoking",
            Self::Assembling => "assembling",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal pipeline transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: Phase,
    pub to: Phase,
}

/// Records the phases a pipeline run went through.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    trace: Vec<Phase>,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            trace: vec![Phase::Idle],
        }
    }

    /// Current phase.
    pub fn current(&self) -> Phase {
        self.trace.last().copied().unwrap_or(Phase::Idle)
    }

    /// Move to `next`. The trace is left untouched on an illegal transition.
    pub fn enter(&mut self, next: Phase) -> Result<(), IllegalTransition> {
        let current = self.current();
        if !current.can_enter(next) {
            return Err(IllegalTransition {
                from: current,
                to: next,
            });
        }
        self.trace.push(next);
        Ok(())
    }

    /// Move to `Aborted` unless already terminal.
    pub fn abort(&mut self) {
        if !self.current().is_terminal() {
            self.trace.push(Phase::Aborted);
        }
    }

    pub fn trace(&self) -> &[Phase] {
        &self.trace
    }
}
