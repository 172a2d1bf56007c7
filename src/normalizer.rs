//! Folds the model's heterogeneous reply parts into an [`OutfitResult`].

use crate::models::{OutfitResult, ResponsePart};
use crate::{Error, Result};

/// Single pass: first non-empty image wins, text parts join with one space.
///
/// Each text part is trimmed and blank ones are dropped, so the description
/// never carries leading, trailing or doubled whitespace between parts.
pub fn normalize(parts: &[ResponsePart]) -> Result<OutfitResult> {
    let mut image: Option<&str> = None;
    let mut texts: Vec<&str> = Vec::new();

    for part in parts {
        match part {
            ResponsePart::Image { data, mime_type } => {
                if data.is_empty() {
                    continue;
                }
                if image.is_none() {
                    tracing::debug!("Model returned image with mime_type: {}", mime_type);
                    image = Some(data.as_str());
                } else {
                    tracing::debug!("Ignoring additional {} image part", mime_type);
                }
            }
            ResponsePart::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    texts.push(text);
                }
            }
        }
    }

    match (image, texts.is_empty()) {
        (Some(image), false) => Ok(OutfitResult {
            image_base64: image.to_string(),
            description: texts.join(" "),
        }),
        (None, false) => Err(Error::IncompleteResult(
            "reply contained no image".to_string(),
        )),
        (Some(_), true) => Err(Error::IncompleteResult(
            "reply contained no description".to_string(),
        )),
        (None, true) => Err(Error::IncompleteResult(
            "reply contained neither image nor description".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> ResponsePart {
        ResponsePart::Text(s.to_string())
    }

    fn image(data: &str) -> ResponsePart {
        ResponsePart::Image {
            mime_type: "image/png".to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_text_and_image() {
        let result = normalize(&[text("Blue jacket"), image("abc123")]).unwrap();
        assert_eq!(
            result,
            OutfitResult {
                image_base64: "abc123".to_string(),
                description: "Blue jacket".to_string(),
            }
        );
    }

    #[test]
    fn test_image_before_text() {
        let result = normalize(&[image("abc123"), text("Blue jacket")]).unwrap();
        assert_eq!(result.image_base64, "abc123");
        assert_eq!(result.description, "Blue jacket");
    }

    #[test]
    fn test_text_parts_join_in_order() {
        let result = normalize(&[
            text("Casual"),
            image("abc123"),
            text("look"),
            text("with sneakers"),
        ])
        .unwrap();
        assert_eq!(result.description, "Casual look with sneakers");
    }

    #[test]
    fn test_text_parts_are_trimmed_before_joining() {
        let result = normalize(&[
            image("abc123"),
            text("Blue jacket\n"),
            text("   "),
            text("  with loafers"),
        ])
        .unwrap();
        assert_eq!(result.description, "Blue jacket with loafers");
    }

    #[test]
    fn test_first_image_wins() {
        let result = normalize(&[image("first"), text("Look"), image("second")]).unwrap();
        assert_eq!(result.image_base64, "first");
    }

    #[test]
    fn test_only_text_is_incomplete() {
        let err = normalize(&[text("Blue jacket"), text("and jeans")]).unwrap_err();
        assert!(matches!(err, Error::IncompleteResult(_)));
    }

    #[test]
    fn test_only_image_is_incomplete() {
        let err = normalize(&[image("abc123")]).unwrap_err();
        assert!(matches!(err, Error::IncompleteResult(_)));
    }

    #[test]
    fn test_blank_text_does_not_count() {
        let err = normalize(&[image("abc123"), text("  \n")]).unwrap_err();
        assert!(matches!(err, Error::IncompleteResult(_)));
    }

    #[test]
    fn test_empty_image_payload_does_not_count() {
        let err = normalize(&[image(""), text("Blue jacket")]).unwrap_err();
        assert!(matches!(err, Error::IncompleteResult(_)));
    }

    #[test]
    fn test_empty_sequence_is_incomplete() {
        let err = normalize(&[]).unwrap_err();
        assert!(matches!(err, Error::IncompleteResult(_)));
    }
}
