//! Optional one-at-a-time gate around a generation service.

use super::OutfitGenerationService;
use crate::models::{GenerationRequest, OutfitResult};
use crate::state::StateTracker;
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Rejects a call with [`Error::Busy`] while another is still in flight.
pub struct SingleFlight<S> {
    inner: S,
    permit: Semaphore,
}

impl<S> SingleFlight<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            permit: Semaphore::new(1),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.permit.available_permits() == 1
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: OutfitGenerationService> OutfitGenerationService for SingleFlight<S> {
    async fn generate_tracked(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        let _permit = match self.permit.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!("Rejecting generation request: another is in flight");
                return tracker.finish(Err(Error::Busy));
            }
        };
        self.inner.generate_tracked(request, tracker).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockOutfitClient;
    use crate::assembler::build_request;
    use crate::models::{EncodedImage, OccasionTheme};
    use std::time::Duration;

    fn request() -> GenerationRequest {
        build_request(
            EncodedImage::new("dXNlcg==".to_string(), "image/jpeg".to_string()),
            EncodedImage::new("c2hpcnQ=".to_string(), "image/png".to_string()),
            OccasionTheme::Formal,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_second_concurrent_call_is_busy() {
        let gate = SingleFlight::new(
            MockOutfitClient::new().with_delay(Duration::from_millis(50)),
        );
        let request = request();

        let (first, second) = tokio::join!(gate.generate(&request), gate.generate(&request));

        assert!(first.is_ok());
        assert!(matches!(second, Err(Error::Busy)));
        assert_eq!(gate.inner().get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_permit_is_released_after_completion() {
        let gate = SingleFlight::new(MockOutfitClient::new());
        let request = request();

        gate.generate(&request).await.unwrap();
        assert!(gate.is_idle());
        gate.generate(&request).await.unwrap();
        assert_eq!(gate.inner().get_call_count(), 2);
    }
}
