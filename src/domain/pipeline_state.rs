use thiserror::Error;

/// Lifecycle of a single sync run. Every state only moves to its successor, and any
/// non-terminal state may move to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum PipelineState {
    Idle,
    Authorizing,
    Clearing,
    Extracting,
    Writing,
    Done,
    Failed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid pipeline transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: PipelineState,
    pub to: PipelineState,
}

impl PipelineState {
    /// The state that follows this one on the success path.
    pub fn successor(self) -> Option<Self> {
        match self {
            PipelineState::Idle => Some(PipelineState::Authorizing),
            PipelineState::Authorizing => Some(PipelineState::Clearing),
            PipelineState::Clearing => Some(PipelineState::Extracting),
            PipelineState::Extracting => Some(PipelineState::Writing),
            PipelineState::Writing => Some(PipelineState::Done),
            PipelineState::Done | PipelineState::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }

    pub fn can_transition_to(self, target: PipelineState) -> bool {
        match target {
            PipelineState::Failed => !self.is_terminal(),
            _ => self.successor() == Some(target),
        }
    }

    pub fn transition_to(self, target: PipelineState) -> Result<PipelineState, InvalidTransition> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(InvalidTransition {
                from: self,
                to: target,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_success_path() {
        let mut state = PipelineState::Idle;
        for expected in [
            PipelineState::Authorizing,
            PipelineState::Clearing,
            PipelineState::Extracting,
            PipelineState::Writing,
            PipelineState::Done,
        ] {
            state = state.transition_to(expected).unwrap();
        }
        assert_eq!(state, PipelineState::Done);
    }

    #[test]
    fn test_failed_reachable_from_every_running_state() {
        for state in PipelineState::iter().filter(|state| !state.is_terminal()) {
            assert_eq!(
                state.transition_to(PipelineState::Failed),
                Ok(PipelineState::Failed),
                "{state} should be able to fail"
            );
        }
    }

    #[test]
    fn test_terminal_states_are_absorbing() {
        for target in PipelineState::iter() {
            assert!(!PipelineState::Failed.can_transition_to(target));
            assert!(!PipelineState::Done.can_transition_to(target));
        }
    }

    #[test]
    fn test_cannot_skip_states() {
        let err = PipelineState::Authorizing
            .transition_to(PipelineState::Writing)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid pipeline transition from Authorizing to Writing"
        );
    }

    #[test]
    fn test_cannot_go_backwards() {
        assert!(!PipelineState::Extracting.can_transition_to(PipelineState::Clearing));
    }
}
