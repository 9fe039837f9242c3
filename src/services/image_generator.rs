// src/services/image_generator.rs
use crate::errors::StudioError;
use crate::models::GenerationConfig;
use crate::services::backend::{ContentPart, GenerativeBackend, ImageRequest, ImageResponse};
use log::{error, info};
use std::sync::Arc;

pub const IMAGE_DATA_PREFIX: &str = "data:image/png;base64,";
const REFERENCE_MIME_TYPE: &str = "image/png";

pub struct ImageGenerator {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

/// Text sent alongside the image parts.
pub fn full_prompt(prompt: &str, negative_prompt: Option<&str>) -> String {
    match negative_prompt.map(str::trim).filter(|neg| !neg.is_empty()) {
        Some(negative) => format!("{}. Exclude: {}.", prompt, negative),
        None => format!("{}. ", prompt),
    }
}

/// Drops a leading `data:image/<type>;base64,` header, if any.
pub fn strip_data_url_header(image: &str) -> &str {
    image
        .strip_prefix("data:image/")
        .and_then(|rest| rest.split_once(";base64,"))
        .filter(|(format, _)| !format.is_empty() && !format.contains(['/', ',', ';']))
        .map(|(_, payload)| payload)
        .unwrap_or(image)
}

/// First inline image in the first candidate, in part order.
pub fn extract_image(response: &ImageResponse) -> Option<&str> {
    response
        .candidates
        .first()?
        .parts
        .iter()
        .find_map(|part| part.inline_data.as_deref())
}

impl ImageGenerator {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub fn build_request(&self, config: &GenerationConfig) -> ImageRequest {
        let mut parts = Vec::with_capacity(2);

        if let Some(reference) = config.reference_image.as_deref() {
            parts.push(ContentPart::InlineImage {
                data: strip_data_url_header(reference).to_string(),
                mime_type: REFERENCE_MIME_TYPE.to_string(),
            });
        }

        parts.push(ContentPart::Text(full_prompt(
            &config.prompt,
            config.negative_prompt.as_deref(),
        )));

        ImageRequest {
            model: self.model.clone(),
            parts,
            aspect_ratio: config.aspect_ratio,
        }
    }

    /// Returns the generated image as a PNG data URL. Errors are not
    /// swallowed here.
    pub async fn generate(&self, config: &GenerationConfig) -> Result<String, StudioError> {
        let request = self.build_request(config);
        info!(
            "Generating image (style={}, ratio={}, reference={})",
            config.style_id,
            config.aspect_ratio.as_str(),
            config.reference_image.is_some()
        );

        let response = self.backend.generate_image(request).await.map_err(|e| {
            error!("Image generation request failed: {}", e);
            e
        })?;

        let payload = extract_image(&response).ok_or_else(|| {
            error!("Image generation returned no image data");
            StudioError::NoImage
        })?;

        Ok(format!("{}{}", IMAGE_DATA_PREFIX, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;
    use crate::services::backend::mock::MockBackend;
    use crate::services::backend::{Candidate, ResponsePart};

    fn generator(backend: &Arc<MockBackend>) -> ImageGenerator {
        ImageGenerator::new(backend.clone(), "image-model")
    }

    #[test]
    fn full_prompt_with_and_without_negative() {
        assert_eq!(full_prompt("a cat", None), "a cat. ");
        assert_eq!(full_prompt("a cat", Some("  ")), "a cat. ");
        assert_eq!(
            full_prompt("a cat", Some("text, watermark")),
            "a cat. Exclude: text, watermark."
        );
    }

    #[test]
    fn strips_only_a_real_header() {
        assert_eq!(strip_data_url_header("data:image/jpeg;base64,/9j/4AA"), "/9j/4AA");
        assert_eq!(strip_data_url_header("data:image/png;base64,iVBOR"), "iVBOR");
        assert_eq!(strip_data_url_header("iVBOR"), "iVBOR");
        assert_eq!(strip_data_url_header("data:text/plain,hello"), "data:text/plain,hello");
    }

    #[test]
    fn reference_image_precedes_text_and_is_declared_png() {
        let backend = Arc::new(MockBackend::new());
        let config = GenerationConfig {
            prompt: "a red bicycle".into(),
            aspect_ratio: AspectRatio::Wide,
            style_id: "none".into(),
            reference_image: Some("data:image/webp;base64,UklGR".into()),
            ..Default::default()
        };

        let request = generator(&backend).build_request(&config);
        assert_eq!(request.model, "image-model");
        assert_eq!(request.aspect_ratio, AspectRatio::Wide);
        assert_eq!(
            request.parts,
            vec![
                ContentPart::InlineImage {
                    data: "UklGR".into(),
                    mime_type: "image/png".into(),
                },
                ContentPart::Text("a red bicycle. ".into()),
            ]
        );
    }

    #[test]
    fn text_only_without_reference() {
        let backend = Arc::new(MockBackend::new());
        let config = GenerationConfig {
            prompt: "a red bicycle".into(),
            ..Default::default()
        };
        let request = generator(&backend).build_request(&config);
        assert_eq!(request.parts, vec![ContentPart::Text("a red bicycle. ".into())]);
    }

    #[actix_web::test]
    async fn finds_image_in_a_later_part() {
        let backend = Arc::new(MockBackend::new());
        backend.push_image(Ok(ImageResponse {
            candidates: vec![Candidate {
                parts: vec![
                    ResponsePart {
                        inline_data: None,
                        text: Some("Sure, here it is".into()),
                    },
                    ResponsePart {
                        inline_data: Some("SECOND".into()),
                        text: None,
                    },
                    ResponsePart {
                        inline_data: Some("THIRD".into()),
                        text: None,
                    },
                ],
            }],
        }));

        let data = generator(&backend)
            .generate(&GenerationConfig {
                prompt: "x".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(data, "data:image/png;base64,SECOND");
    }

    #[actix_web::test]
    async fn no_candidates_or_no_image_part_is_an_error() {
        let backend = Arc::new(MockBackend::new());
        backend.push_image(Ok(ImageResponse::default()));
        backend.push_image(Ok(ImageResponse {
            candidates: vec![Candidate {
                parts: vec![ResponsePart {
                    inline_data: None,
                    text: Some("I cannot draw that".into()),
                }],
            }],
        }));

        let generator = generator(&backend);
        let config = GenerationConfig {
            prompt: "x".into(),
            ..Default::default()
        };
        assert!(matches!(
            generator.generate(&config).await,
            Err(StudioError::NoImage)
        ));
        assert!(matches!(
            generator.generate(&config).await,
            Err(StudioError::NoImage)
        ));
    }

    #[actix_web::test]
    async fn backend_errors_propagate() {
        let backend = Arc::new(MockBackend::new());
        backend.push_image(Err(StudioError::Backend("quota".into())));

        let result = generator(&backend)
            .generate(&GenerationConfig {
                prompt: "x".into(),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(StudioError::Backend(_))));
    }
}
