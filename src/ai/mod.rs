//! Generative-model integration for outfit generation
//!
//! Sends the assembled request to the image model and turns its reply into an
//! [`OutfitResult`]. One outbound call per invocation, never retried here.

pub mod gemini;
pub mod mock;
pub mod single_flight;

pub use gemini::GeminiOutfitClient;
pub use mock::MockOutfitClient;
pub use single_flight::SingleFlight;

use crate::models::{GenerationRequest, OutfitResult, ResponsePart};
use crate::normalizer::normalize;
use crate::state::{GenerationState, StateTracker};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait OutfitGenerationService: Send + Sync {
    /// Generate an outfit, reporting progress through `tracker`.
    ///
    /// Implementations leave `tracker` in a terminal state.
    async fn generate_tracked(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult>;

    async fn generate(&self, request: &GenerationRequest) -> Result<OutfitResult> {
        self.generate_tracked(request, &StateTracker::new()).await
    }
}

#[async_trait]
impl<T: OutfitGenerationService + ?Sized> OutfitGenerationService for Arc<T> {
    async fn generate_tracked(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        (**self).generate_tracked(request, tracker).await
    }
}

/// Shared tail of every client: reject an empty reply, then normalize.
pub(crate) fn finish_reply(
    parts: Vec<ResponsePart>,
    tracker: &StateTracker,
) -> Result<OutfitResult> {
    if parts.is_empty() {
        return Err(Error::EmptyResponse);
    }
    tracker.advance(GenerationState::Normalizing);
    normalize(&parts)
}
