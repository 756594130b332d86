//! Lifecycle phase of a single load

/// State machine for one load. All right-hand states are terminal; a new
/// `load()` call is the only way back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
    TimedOut,
    Aborted,
}

impl LoadPhase {
    /// Whether the load has settled
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::TimedOut | Self::Aborted
        )
    }

    #[must_use]
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!LoadPhase::Idle.is_terminal());
        assert!(!LoadPhase::Loading.is_terminal());
        assert!(LoadPhase::Succeeded.is_terminal());
        assert!(LoadPhase::Failed.is_terminal());
        assert!(LoadPhase::TimedOut.is_terminal());
        assert!(LoadPhase::Aborted.is_terminal());
    }
}
