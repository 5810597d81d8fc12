//! Worker lifecycle states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle states of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Created, install not yet run (or the last install failed).
    #[default]
    Parsed,
    /// Install event in progress.
    Installing,
    /// Core set staged; waiting to activate.
    Installed,
    /// Activate event in progress.
    Activating,
    /// Active and eligible to receive fetch events.
    Activated,
    /// Replaced or discarded.
    Redundant,
}

impl WorkerState {
    /// Whether a host should deliver fetch events in this state.
    pub fn can_intercept_fetch(self) -> bool {
        matches!(self, WorkerState::Activated)
    }

    /// Whether the worker is installed and waiting for activation.
    pub fn is_waiting(self) -> bool {
        matches!(self, WorkerState::Installed)
    }

    pub(crate) fn can_transition_to(self, to: WorkerState) -> bool {
        use WorkerState::*;

        matches!(
            (self, to),
            (Parsed, Installing)
                | (Installing, Installed)
                | (Installing, Parsed) // install failed, host may retry
                | (Installed, Activating)
                | (Installed, Redundant)
                | (Activating, Activated)
                | (Activating, Redundant) // stores could not be cleared
                | (Activated, Redundant)
        )
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}
