// src/services/suggester.rs
use crate::directives::{suggestion_context, suggestion_framing};
use crate::models::{AspectRatio, BrandTone};
use crate::services::backend::{GenerativeBackend, TextRequest};
use log::{info, warn};
use std::sync::Arc;

/// Returned when the backend answers but says nothing.
pub const EMPTY_RESPONSE_FALLBACK: &str = "A breathtaking floating city above the clouds at golden hour, waterfalls spilling off its edges, airships drifting between towers, highly detailed fantasy concept art";

/// Returned when the backend call itself fails.
pub const ERROR_FALLBACK: &str = "A cyberpunk detective standing in a neon-lit alley on a rainy night, reflections on wet pavement, cinematic lighting, highly detailed";

pub struct PromptSuggester {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

pub fn build_suggestion_instruction(tone: BrandTone, ratio: AspectRatio) -> String {
    let framing = suggestion_framing(ratio);
    let mut instruction = format!(
        "You are a creative director brainstorming visuals for an AI image generator. {}",
        suggestion_context(tone)
    );
    if !framing.is_empty() {
        instruction.push(' ');
        instruction.push_str(framing);
    }
    instruction.push_str(
        " Write one creative, descriptive image prompt in under 50 words. Output only the prompt as raw text, no quotes or markdown.",
    );
    instruction
}

impl PromptSuggester {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub async fn suggest(&self, tone: BrandTone, ratio: AspectRatio) -> String {
        let request = TextRequest {
            model: self.model.clone(),
            instruction: build_suggestion_instruction(tone, ratio),
        };

        match self.backend.generate_text(request).await {
            Ok(response) => {
                let text = response.text.unwrap_or_default().trim().to_string();
                if text.is_empty() {
                    warn!("Suggestion returned no text, using default idea");
                    EMPTY_RESPONSE_FALLBACK.to_string()
                } else {
                    info!("Suggested prompt for tone={}", tone.as_str());
                    text
                }
            }
            Err(e) => {
                warn!("Suggestion failed: {}", e);
                ERROR_FALLBACK.to_string()
            }
        }
    }
}
