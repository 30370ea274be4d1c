//! State machine trait for lifecycle enums.
//!
//! Gives lifecycle enums such as the conversation status one way to declare
//! their legal transitions and get a checked `transition_to` for free.

use super::ValidationError;

/// Trait for lifecycle enums that represent state machines.
///
/// ```ignore
/// impl StateMachine for ConversationStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Active, Completed) | (Active, Cancelled))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Active => vec![Completed, Cancelled],
///             Completed | Cancelled => vec![],
///         }
///     }
/// }
///
/// let status = status.transition_to(ConversationStatus::Completed)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PromptState {
        Issued,
        Answered,
        Retried,
        Abandoned,
    }

    impl StateMachine for PromptState {
        fn can_transition_to(&self, target: &Self) -> bool {
            use PromptState::*;
            matches!(
                (self, target),
                (Issued, Answered) | (Issued, Retried) | (Retried, Answered) | (Retried, Abandoned)
            )
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use PromptState::*;
            match self {
                Issued => vec![Answered, Retried],
                Retried => vec![Answered, Abandoned],
                Answered | Abandoned => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            PromptState::Issued.transition_to(PromptState::Answered),
            Ok(PromptState::Answered)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let result = PromptState::Issued.transition_to(PromptState::Abandoned);
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn terminal_states_have_no_transitions() {
        assert!(PromptState::Answered.is_terminal());
        assert!(PromptState::Abandoned.is_terminal());
        assert!(!PromptState::Retried.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in [
            PromptState::Issued,
            PromptState::Answered,
            PromptState::Retried,
            PromptState::Abandoned,
        ] {
            for target in state.valid_transitions() {
                assert!(
                    state.can_transition_to(&target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }
}
