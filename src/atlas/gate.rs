//! Build lifecycle gate
//!
//! NotStarted -> InProgress -> Completed. A completed build is never run
//! again; a build that stopped early starts over from scratch.

use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Default)]
pub struct BuildGate {
    state: BuildState,
}

impl BuildGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Enter InProgress; false if the build already completed
    pub fn begin(&mut self) -> bool {
        match self.state {
            BuildState::Completed => {
                debug!("Build already completed, skipping");
                false
            }
            BuildState::InProgress => {
                warn!("Previous build did not finish, starting over");
                true
            }
            BuildState::NotStarted => {
                self.state = BuildState::InProgress;
                true
            }
        }
    }

    pub fn complete(&mut self) {
        self.state = BuildState::Completed;
    }

    /// Back to NotStarted after a fatal failure
    pub fn abort(&mut self) {
        self.state = BuildState::NotStarted;
    }
}
