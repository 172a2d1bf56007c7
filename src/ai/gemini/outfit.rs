use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};
use crate::ai::{finish_reply, OutfitGenerationService};
use crate::models::{Config, GenerationRequest, OutfitResult};
use crate::state::{GenerationState, StateTracker};
use crate::{Error, Result};
use async_trait::async_trait;

pub struct GeminiOutfitClient {
    http: GeminiHttpClient,
}

impl GeminiOutfitClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, client),
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Result<Self> {
        let api_key = config
            .gemini_api_key
            .clone()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let mut outfit = Self::new_with_client(api_key, config.model.clone(), client);
        outfit.http = outfit
            .http
            .with_base_url(config.base_url.clone())
            .with_timeout(config.request_timeout);
        Ok(outfit)
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    fn wire_request(request: &GenerationRequest) -> GenerateContentRequest {
        let user = request.user_image();
        let clothing = request.clothing_image();

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::inline(user.mime_type.clone(), user.data.clone()),
                    Part::inline(clothing.mime_type.clone(), clothing.data.clone()),
                    Part::text(request.instruction()),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        tracker.advance(GenerationState::Sending);

        tracing::info!(
            "Requesting {} outfit from Gemini (model: {})",
            request.theme(),
            self.model()
        );

        let wire = Self::wire_request(request);
        let response: GenerateContentResponse = self.http.generate_content(&wire, tracker).await?;

        let parts = response.into_response_parts();
        tracing::debug!("Gemini returned {} usable parts", parts.len());

        finish_reply(parts, tracker)
    }
}

#[async_trait]
impl OutfitGenerationService for GeminiOutfitClient {
    async fn generate_tracked(
        &self,
        request: &GenerationRequest,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        let outcome = self.run(request, tracker).await;
        tracker.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::assembler::build_request;
    use crate::models::{EncodedImage, OccasionTheme};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_client(server: &MockServer) -> GeminiOutfitClient {
        GeminiOutfitClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn request(theme: OccasionTheme) -> GenerationRequest {
        build_request(
            EncodedImage::new("dXNlcg==".to_string(), "image/jpeg".to_string()),
            EncodedImage::new("c2hpcnQ=".to_string(), "image/png".to_string()),
            theme,
        )
        .unwrap()
    }

    fn reply(parts: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": parts } }]
        }))
    }

    #[tokio::test]
    async fn test_generate_parses_text_and_image() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(reply(serde_json::json!([
                { "text": "Blue jacket" },
                { "inlineData": { "mimeType": "image/png", "data": "abc123" } }
            ])))
            .mount(&server)
            .await;

        let tracker = StateTracker::new();
        let result = make_client(&server)
            .generate_tracked(&request(OccasionTheme::Casual), &tracker)
            .await
            .unwrap();

        assert_eq!(
            result,
            OutfitResult {
                image_base64: "abc123".to_string(),
                description: "Blue jacket".to_string(),
            }
        );
        assert_eq!(tracker.current(), GenerationState::Succeeded);
    }

    #[tokio::test]
    async fn test_thinking_output_stays_out_of_result() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(reply(serde_json::json!([
                { "text": "**Planning the outfit** I will first...", "thought": true },
                { "inlineData": { "mimeType": "image/png", "data": "sketch" }, "thought": true },
                { "inlineData": { "mimeType": "image/png", "data": "abc123" } },
                { "text": "Blue jacket" }
            ])))
            .mount(&server)
            .await;

        let result = make_client(&server)
            .generate(&request(OccasionTheme::Casual))
            .await
            .unwrap();

        assert_eq!(
            result,
            OutfitResult {
                image_base64: "abc123".to_string(),
                description: "Blue jacket".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_request_carries_both_images_and_theme() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"data\":\"dXNlcg==\""))
            .and(body_string_contains("\"data\":\"c2hpcnQ=\""))
            .and(body_string_contains("Business Professional"))
            .and(body_string_contains("\"responseModalities\":[\"TEXT\",\"IMAGE\"]"))
            .respond_with(reply(serde_json::json!([
                { "inlineData": { "mimeType": "image/png", "data": "abc123" } },
                { "text": "Charcoal suit" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        make_client(&server)
            .generate(&request(OccasionTheme::Business))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_upstream_error() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let tracker = StateTracker::new();
        let err = make_client(&server)
            .generate_tracked(&request(OccasionTheme::Party), &tracker)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Upstream { status: 429, .. }));
        assert_eq!(tracker.current(), GenerationState::Failed);
    }

    #[tokio::test]
    async fn test_no_parts_is_empty_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(reply(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate(&request(OccasionTheme::Formal))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_empty_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .generate(&request(OccasionTheme::DateNight))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::EmptyResponse));
    }

    #[tokio::test]
    async fn test_text_only_reply_is_incomplete() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(reply(serde_json::json!([{ "text": "no image here" }])))
            .mount(&server)
            .await;

        let tracker = StateTracker::new();
        let err = make_client(&server)
            .generate_tracked(&request(OccasionTheme::Gym), &tracker)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::IncompleteResult(_)));
        assert_eq!(tracker.current(), GenerationState::Failed);
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GeminiOutfitClient::new("key".to_string(), DEFAULT_MODEL.to_string())
            .with_base_url(format!("http://{}", addr));
        let tracker = StateTracker::new();

        let err = client
            .generate_tracked(&request(OccasionTheme::Casual), &tracker)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(tracker.current(), GenerationState::Failed);
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = Config {
            gemini_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://localhost".to_string(),
            request_timeout: None,
            dry_run: true,
        };
        let err = GeminiOutfitClient::from_config(&config, reqwest::Client::new())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
