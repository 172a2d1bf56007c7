//! Per-invocation lifecycle: `Idle → Sending → AwaitingReply → Normalizing →
//! Succeeded`, with `Failed` reachable from every non-terminal state.

use crate::Result;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Sending,
    AwaitingReply,
    Normalizing,
    Succeeded,
    Failed,
}

impl GenerationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, GenerationState::Succeeded | GenerationState::Failed)
    }

    pub fn can_transition_to(self, next: GenerationState) -> bool {
        use GenerationState::*;
        match (self, next) {
            (from, Failed) => !from.is_terminal(),
            (Idle, Sending) => true,
            (Sending, AwaitingReply) => true,
            (AwaitingReply, Normalizing) => true,
            (Normalizing, Succeeded) => true,
            _ => false,
        }
    }
}

/// Records the state of one invocation and publishes it to subscribers.
///
/// A tracker is created per call; nothing is shared between invocations.
#[derive(Debug)]
pub struct StateTracker {
    tx: watch::Sender<GenerationState>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(GenerationState::Idle);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<GenerationState> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> GenerationState {
        *self.tx.borrow()
    }

    /// Move to `next`; illegal transitions are logged and ignored.
    pub fn advance(&self, next: GenerationState) {
        let current = self.current();
        if !current.can_transition_to(next) {
            tracing::error!(
                "Ignoring illegal generation state transition {:?} -> {:?}",
                current,
                next
            );
            return;
        }
        tracing::debug!("Generation state {:?} -> {:?}", current, next);
        self.tx.send_replace(next);
    }

    /// Settle into the terminal state matching `outcome` and pass it through.
    pub fn finish<T>(&self, outcome: Result<T>) -> Result<T> {
        match &outcome {
            Ok(_) => self.advance(GenerationState::Succeeded),
            Err(e) => {
                tracing::warn!("Generation failed ({:?}): {}", e.kind(), e);
                self.advance(GenerationState::Failed);
            }
        }
        outcome
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
