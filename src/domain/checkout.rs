use super::transaction::PaymentReferenceId;
use crate::error::{PaymentError, Result};
use serde::Serialize;
use std::fmt;

/// Lifecycle of one checkout.
///
/// `Created → Initiated → Challenged → Completed → Redirected`, with `Failed`
/// reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutState {
    #[default]
    Created,
    Initiated,
    Challenged,
    Completed,
    Redirected,
    Failed,
}

impl CheckoutState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CheckoutState::Redirected | CheckoutState::Failed)
    }

    pub fn can_transition_to(self, next: CheckoutState) -> bool {
        use CheckoutState::*;
        match (self, next) {
            (Created, Initiated)
            | (Initiated, Challenged)
            | (Challenged, Completed)
            | (Completed, Redirected) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutState::Created => "CREATED",
            CheckoutState::Initiated => "INITIATED",
            CheckoutState::Challenged => "CHALLENGED",
            CheckoutState::Completed => "COMPLETED",
            CheckoutState::Redirected => "REDIRECTED",
            CheckoutState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Tracks the state of a single checkout and rejects out-of-order steps.
#[derive(Debug, Default)]
pub struct CheckoutSession {
    state: CheckoutState,
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CheckoutState {
        self.state
    }

    pub fn advance(&mut self, next: CheckoutState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(PaymentError::CheckProcessError(format!(
                "illegal checkout transition {} -> {}",
                self.state, next
            )));
        }
        tracing::debug!(from = %self.state, to = %next, "checkout transition");
        self.state = next;
        Ok(())
    }

    /// Moves to `Failed` unless the session already finished.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(from = %self.state, "checkout failed");
            self.state = CheckoutState::Failed;
        }
    }
}

/// Result of a successful checkout: where to send the customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    #[serde(rename = "callBackUrl")]
    pub call_back_url: String,
    pub status: String,
    pub payment_reference_id: PaymentReferenceId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut session = CheckoutSession::new();
        for next in [
            CheckoutState::Initiated,
            CheckoutState::Challenged,
            CheckoutState::Completed,
            CheckoutState::Redirected,
        ] {
            session.advance(next).unwrap();
        }
        assert_eq!(session.state(), CheckoutState::Redirected);
    }

    #[test]
    fn test_skipping_a_step_is_rejected() {
        let mut session = CheckoutSession::new();
        let err = session.advance(CheckoutState::Completed).unwrap_err();
        assert!(matches!(err, PaymentError::CheckProcessError(_)));
        assert_eq!(session.state(), CheckoutState::Created);
    }

    #[test]
    fn test_failed_is_reachable_and_terminal() {
        let mut session = CheckoutSession::new();
        session.advance(CheckoutState::Initiated).unwrap();
        session.fail();
        assert_eq!(session.state(), CheckoutState::Failed);
        assert!(session.advance(CheckoutState::Challenged).is_err());
    }

    #[test]
    fn test_redirected_cannot_fail() {
        assert!(!CheckoutState::Redirected.can_transition_to(CheckoutState::Failed));
        assert!(CheckoutState::Created.can_transition_to(CheckoutState::Failed));
    }
}
