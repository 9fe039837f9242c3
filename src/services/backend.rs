// src/services/backend.rs
//! Contract for the remote model service: a text capability and an image
//! capability. [`GeminiClient`](super::GeminiClient) is the production
//! implementation.

use crate::errors::StudioError;
use crate::models::AspectRatio;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub model: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextResponse {
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    InlineImage { data: String, mime_type: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRequest {
    pub model: String,
    pub parts: Vec<ContentPart>,
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponsePart {
    /// Raw base64 payload, no data-URL header.
    pub inline_data: Option<String>,
    pub text: Option<String>,
}

#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, StudioError>;

    async fn generate_image(&self, request: ImageRequest) -> Result<ImageResponse, StudioError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays scripted responses in order and records every request.
    #[derive(Default)]
    pub struct MockBackend {
        text_responses: Mutex<VecDeque<Result<TextResponse, StudioError>>>,
        image_responses: Mutex<VecDeque<Result<ImageResponse, StudioError>>>,
        pub text_requests: Mutex<Vec<TextRequest>>,
        pub image_requests: Mutex<Vec<ImageRequest>>,
        text_delay: Option<Duration>,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Holds every text call open for `delay` before answering.
        pub fn with_text_delay(mut self, delay: Duration) -> Self {
            self.text_delay = Some(delay);
            self
        }

        pub fn push_text(&self, response: Result<TextResponse, StudioError>) {
            self.text_responses.lock().unwrap().push_back(response);
        }

        pub fn push_text_ok(&self, text: &str) {
            self.push_text(Ok(TextResponse {
                text: Some(text.to_string()),
            }));
        }

        pub fn push_image(&self, response: Result<ImageResponse, StudioError>) {
            self.image_responses.lock().unwrap().push_back(response);
        }

        pub fn push_image_ok(&self, payload: &str) {
            self.push_image(Ok(ImageResponse {
                candidates: vec![Candidate {
                    parts: vec![ResponsePart {
                        inline_data: Some(payload.to_string()),
                        text: None,
                    }],
                }],
            }));
        }

        pub fn last_text_request(&self) -> Option<TextRequest> {
            self.text_requests.lock().unwrap().last().cloned()
        }

        pub fn last_image_request(&self) -> Option<ImageRequest> {
            self.image_requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl GenerativeBackend for MockBackend {
        async fn generate_text(&self, request: TextRequest) -> Result<TextResponse, StudioError> {
            self.text_requests.lock().unwrap().push(request);
            if let Some(delay) = self.text_delay {
                actix_web::rt::time::sleep(delay).await;
            }
            self.text_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(StudioError::Backend("no scripted text response".into())))
        }

        async fn generate_image(
            &self,
            request: ImageRequest,
        ) -> Result<ImageResponse, StudioError> {
            self.image_requests.lock().unwrap().push(request);
            self.image_responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(StudioError::Backend("no scripted image response".into())))
        }
    }
}
