use super::{finish_reply, OutfitGenerationService};
use crate::models::{GenerationRequest, OutfitResult, ResponsePart};
use crate::state::{GenerationState, StateTracker};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 1x1 PNG returned when no scripted reply is queued.
const PLACEHOLDER_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAIAAACQd1PeAAAADElEQVR4nGP4//8/AAX+Av4N70a4AAAAAElFTkSuQmCC";

#[derive(Debug, Clone)]
enum MockReply {
    Parts(Vec<ResponsePart>),
    Upstream { status: u16, body: String },
}

/// Scripted stand-in for the generation service.
///
/// Replies are replayed in order and cycle once exhausted; with none queued
/// every call succeeds with a placeholder image.
pub struct MockOutfitClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    call_count: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl MockOutfitClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            delay: None,
        }
    }

    pub fn with_parts(self, parts: Vec<ResponsePart>) -> Self {
        self.replies.lock().unwrap().push(MockReply::Parts(parts));
        self
    }

    pub fn with_upstream_error(self, status: u16, body: &str) -> Self {
        self.replies.lock().unwrap().push(MockReply::Upstream {
            status,
            body: body.to_string(),
        });
        self
    }

    /// Hold each call open for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    fn next_reply(&self, request: &GenerationRequest) -> MockReply {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        self.requests.lock().unwrap().push(request.clone());

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            MockReply::Parts(vec![
                ResponsePart::Image {
                    mime_type: "image/png".to_string(),
                    data: PLACEHOLDER_PNG_BASE64.to_string(),
                },
                ResponsePart::Text(format!("Mock outfit for {}", request.theme())),
            ])
        } else {
            replies[(count - 1) % replies.len()].clone()
        }
    }
}

impl Default for MockOutfitClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutfitGenerationService for MockOutfitClient {
    async fn generate_tracked(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        tracker.advance(GenerationState::Sending);
        let reply = self.next_reply(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        tracker.advance(GenerationState::AwaitingReply);

        let outcome = match reply {
            MockReply::Parts(parts) => finish_reply(parts, tracker),
            MockReply::Upstream { status, body } => Err(Error::Upstream { status, body }),
        };
        tracker.finish(outcome)
    }
}
