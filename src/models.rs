//! Data models and structures
//!
//! Defines the values that flow through the outfit pipeline: uploaded image
//! blobs, their encoded form, occasion themes, the assembled generation
//! request, and the result handed back to the caller.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Raw upload content plus whatever media type the uploader declared.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub declared_type: Option<String>,
}

impl ImageBlob {
    pub fn new(bytes: Vec<u8>, declared_type: Option<String>) -> Self {
        Self {
            bytes,
            declared_type,
        }
    }
}

/// Base64 payload of an [`ImageBlob`] with its resolved media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(data: String, mime_type: String) -> Self {
        Self { data, mime_type }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccasionTheme {
    #[serde(rename = "Casual Day Out")]
    Casual,
    #[serde(rename = "Business Professional")]
    Business,
    #[serde(rename = "Date Night")]
    DateNight,
    #[serde(rename = "Party / Club")]
    Party,
    #[serde(rename = "Formal Event")]
    Formal,
    #[serde(rename = "Athleisure / Gym")]
    Gym,
}

impl OccasionTheme {
    pub const ALL: [OccasionTheme; 6] = [
        OccasionTheme::Casual,
        OccasionTheme::Business,
        OccasionTheme::DateNight,
        OccasionTheme::Party,
        OccasionTheme::Formal,
        OccasionTheme::Gym,
    ];

    /// Human-readable label, used verbatim in the instruction text.
    pub fn label(self) -> &'static str {
        match self {
            OccasionTheme::Casual => "Casual Day Out",
            OccasionTheme::Business => "Business Professional",
            OccasionTheme::DateNight => "Date Night",
            OccasionTheme::Party => "Party / Club",
            OccasionTheme::Formal => "Formal Event",
            OccasionTheme::Gym => "Athleisure / Gym",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            OccasionTheme::Casual => "casual",
            OccasionTheme::Business => "business",
            OccasionTheme::DateNight => "date-night",
            OccasionTheme::Party => "party",
            OccasionTheme::Formal => "formal",
            OccasionTheme::Gym => "gym",
        }
    }
}

impl fmt::Display for OccasionTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OccasionTheme {
    type Err = Error;

    /// Accepts either the label or the slug, ignoring case.
    fn from_str(input: &str) -> Result<Self> {
        let needle = input.trim();
        OccasionTheme::ALL
            .into_iter()
            .find(|theme| {
                theme.label().eq_ignore_ascii_case(needle)
                    || theme.slug().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| Error::Validation(format!("Unrecognized occasion theme '{}'", input)))
    }
}

/// A fully formed request; only the assembler can build one.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    user_image: EncodedImage,
    clothing_image: EncodedImage,
    theme: OccasionTheme,
    instruction: String,
}

impl GenerationRequest {
    pub(crate) fn new(
        user_image: EncodedImage,
        clothing_image: EncodedImage,
        theme: OccasionTheme,
        instruction: String,
    ) -> Self {
        Self {
            user_image,
            clothing_image,
            theme,
            instruction,
        }
    }

    pub fn user_image(&self) -> &EncodedImage {
        &self.user_image
    }

    pub fn clothing_image(&self) -> &EncodedImage {
        &self.clothing_image
    }

    pub fn theme(&self) -> OccasionTheme {
        self.theme
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

/// One element of the model's reply, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Image { mime_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutfitResult {
    pub image_base64: String,
    pub description: String,
}

// Configuration
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = lookup("DRY_RUN")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        if gemini_api_key.is_none() && !dry_run {
            return Err(Error::Config("GEMINI_API_KEY not set".to_string()));
        }

        let request_timeout = match lookup("OUTFIT_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!(
                        "OUTFIT_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let base_url = lookup("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        match reqwest::Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(Error::Config(format!(
                    "GEMINI_BASE_URL must use http or https, got '{}'",
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "GEMINI_BASE_URL is not a valid URL ('{}'): {}",
                    base_url, e
                )))
            }
        }

        Ok(Self {
            gemini_api_key,
            model: lookup("OUTFIT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url,
            request_timeout,
            dry_run,
        })
    }
}
