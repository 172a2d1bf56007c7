//! Pipeline orchestration: encode both uploads, assemble the request, and
//! hand it to the generation service.

use crate::ai::{GeminiOutfitClient, MockOutfitClient, OutfitGenerationService};
use crate::models::{
    Config, EncodedImage, GenerationRequest, ImageBlob, OccasionTheme, OutfitResult,
};
use crate::state::StateTracker;
use crate::{assembler, codec, Error, Result};
use tracing::info;

pub struct OutfitPipeline {
    generator: Box<dyn OutfitGenerationService>,
}

impl OutfitPipeline {
    pub fn new(generator: Box<dyn OutfitGenerationService>) -> Self {
        Self { generator }
    }

    /// Gemini-backed pipeline, or the mock client when `dry_run` is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator: Box<dyn OutfitGenerationService> = if config.dry_run {
            info!("DRY_RUN enabled: generation will use the mock client");
            Box::new(MockOutfitClient::new())
        } else {
            let client = GeminiOutfitClient::from_config(config, reqwest::Client::new())?;
            info!("Outfit provider: Gemini (model: {})", client.model());
            Box::new(client)
        };
        Ok(Self::new(generator))
    }

    pub async fn run(
        &self,
        user: ImageBlob,
        clothing: ImageBlob,
        theme: OccasionTheme,
    ) -> Result<OutfitResult> {
        self.run_tracked(user, clothing, theme, &StateTracker::new())
            .await
    }

    /// Like [`run`](Self::run), publishing lifecycle changes on `tracker`.
    ///
    /// Encoding and validation failures settle the tracker in `Failed`
    /// without any network call.
    pub async fn run_tracked(
        &self,
        user: ImageBlob,
        clothing: ImageBlob,
        theme: OccasionTheme,
        tracker: &StateTracker,
    ) -> Result<OutfitResult> {
        let request = match prepare(user, clothing, theme).await {
            Ok(request) => request,
            Err(e) => return tracker.finish(Err(e)),
        };

        self.generator.generate_tracked(&request, tracker).await
    }
}

async fn prepare(
    user: ImageBlob,
    clothing: ImageBlob,
    theme: OccasionTheme,
) -> Result<GenerationRequest> {
    let (user, clothing) = tokio::try_join!(encode_blocking(user), encode_blocking(clothing))?;
    assembler::build_request(user, clothing, theme)
}

async fn encode_blocking(blob: ImageBlob) -> Result<EncodedImage> {
    tokio::task::spawn_blocking(move || codec::encode(&blob))
        .await
        .map_err(|e| Error::Codec(format!("Image encoding task join error: {}", e)))?
}
