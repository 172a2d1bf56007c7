//! Request assembly: turns two encoded images and a theme into a
//! [`GenerationRequest`] with a reproducible instruction.

use crate::models::{EncodedImage, GenerationRequest, OccasionTheme};
use crate::{prompts, Error, Result};

pub fn build_request(
    user: EncodedImage,
    clothing: EncodedImage,
    theme: OccasionTheme,
) -> Result<GenerationRequest> {
    if user.is_empty() {
        return Err(Error::Validation("user image is empty".to_string()));
    }
    if clothing.is_empty() {
        return Err(Error::Validation("clothing image is empty".to_string()));
    }

    Ok(GenerationRequest::new(
        user,
        clothing,
        theme,
        instruction_for(theme),
    ))
}

/// Same as [`build_request`], for callers holding an unparsed theme label.
pub fn build_request_from_label(
    user: EncodedImage,
    clothing: EncodedImage,
    theme: &str,
) -> Result<GenerationRequest> {
    build_request(user, clothing, theme.parse()?)
}

pub fn instruction_for(theme: OccasionTheme) -> String {
    prompts::render(
        prompts::OUTFIT_INSTRUCTION,
        &[
            ("theme", theme.label()),
            ("guidance", prompts::theme_guidance(theme)),
        ],
    )
}
