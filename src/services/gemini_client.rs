// src/services/gemini_client.rs
use crate::config::AppConfig;
use crate::errors::StudioError;
use crate::services::backend::*;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Google Generative Language `generateContent` client.
pub struct GeminiClient {
    api_key: String,
    api_base: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<WireContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<WireGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<WireBlob>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlob {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    image_config: WireImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireContent>,
}

impl From<ContentPart> for WirePart {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::InlineImage { data, mime_type } => WirePart {
                text: None,
                inline_data: Some(WireBlob { mime_type, data }),
            },
            ContentPart::Text(text) => WirePart {
                text: Some(text),
                inline_data: None,
            },
        }
    }
}

impl From<GenerateContentResponse> for ImageResponse {
    fn from(response: GenerateContentResponse) -> Self {
        ImageResponse {
            candidates: response
                .candidates
                .into_iter()
                .map(|candidate| Candidate {
                    parts: candidate
                        .content
                        .unwrap_or_default()
                        .parts
                        .into_iter()
                        .map(|part| ResponsePart {
                            inline_data: part.inline_data.map(|blob| blob.data),
                            text: part.text,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, StudioError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.api_base, model)
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, StudioError> {
        debug!("POST generateContent model={}", model);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| StudioError::Backend(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StudioError::Backend(format!(
                "Gemini error ({}): {}",
                status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| StudioError::Backend(format!("Failed to parse Gemini response: {}", e)))
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, StudioError> {
        let body = GenerateContentRequest {
            contents: vec![WireContent {
                parts: vec![ContentPart::Text(request.instruction).into()],
            }],
            generation_config: None,
        };

        let response = self.generate_content(&request.model, &body).await?;
        Ok(TextResponse {
            text: response.first_text(),
        })
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<ImageResponse, StudioError> {
        let body = GenerateContentRequest {
            contents: vec![WireContent {
                parts: request.parts.into_iter().map(WirePart::from).collect(),
            }],
            generation_config: Some(WireGenerationConfig {
                image_config: WireImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                },
            }),
        };

        let response = self.generate_content(&request.model, &body).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;
    use serde_json::json;

    #[test]
    fn image_request_serializes_to_gemini_shape() {
        let body = GenerateContentRequest {
            contents: vec![WireContent {
                parts: vec![
                    ContentPart::InlineImage {
                        data: "AAAA".into(),
                        mime_type: "image/png".into(),
                    }
                    .into(),
                    ContentPart::Text("a red bicycle. ".into()).into(),
                ],
            }],
            generation_config: Some(WireGenerationConfig {
                image_config: WireImageConfig {
                    aspect_ratio: AspectRatio::Wide.as_str().into(),
                },
            }),
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                        { "text": "a red bicycle. " }
                    ]
                }],
                "generationConfig": { "imageConfig": { "aspectRatio": "16:9" } }
            })
        );
    }

    #[test]
    fn text_request_omits_generation_config() {
        let body = GenerateContentRequest {
            contents: vec![WireContent {
                parts: vec![ContentPart::Text("hi".into()).into()],
            }],
            generation_config: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("generationConfig").is_none());
    }

    #[test]
    fn parses_candidates_and_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBOR" } }
                    ]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        assert_eq!(response.first_text().as_deref(), Some("Here is your image"));

        let image: ImageResponse = response.into();
        assert_eq!(image.candidates.len(), 1);
        assert_eq!(image.candidates[0].parts[1].inline_data.as_deref(), Some("iVBOR"));
    }

    #[test]
    fn missing_candidates_parse_as_empty() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();
        assert!(response.first_text().is_none());
        let image: ImageResponse = response.into();
        assert!(image.candidates.is_empty());
    }

    #[test]
    fn endpoint_uses_model_path() {
        let config = AppConfig::for_tests();
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            format!("{}/models/gemini-2.5-flash:generateContent", config.api_base)
        );
    }
}
