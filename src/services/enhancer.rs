// src/services/enhancer.rs
use crate::directives::{ratio_directive, tone_instruction};
use crate::models::{AspectRatio, BrandTone};
use crate::services::backend::{GenerativeBackend, TextRequest};
use log::{info, warn};
use std::sync::Arc;

/// Rewrites a rough prompt into a detailed one. Never fails: any backend
/// problem hands the original prompt back.
pub struct PromptEnhancer {
    backend: Arc<dyn GenerativeBackend>,
    model: String,
}

pub fn build_enhancement_instruction(
    raw_prompt: &str,
    tone: BrandTone,
    ratio: AspectRatio,
) -> String {
    let directive = ratio_directive(ratio);

    format!(
        r#"You are an expert prompt engineer for AI image generation and a senior art director.
Rewrite the user's idea into a single, richly detailed image prompt.

Follow these steps:
1. Classify the subject into one scenario and apply its technical keywords:
   - Product: studio product photography, softbox lighting, seamless backdrop, crisp reflections, macro detail.
   - UI / interface: clean UI mockup, device frame, flat design, crisp typography, high fidelity screen render.
   - Character: character portrait, expressive pose, detailed facial features, rim lighting, shallow depth of field.
   - Architecture: architectural photography, tilt-shift lens, strong leading lines, golden hour, ultra wide angle.
   - Landscape: epic landscape, volumetric light, atmospheric perspective, high dynamic range, sweeping vista.
   If none fits, choose the closest scenario.
2. Describe subject, setting, lighting, color palette, materials and camera details concretely.
3. Brand tone: {tone}
4. Composition: {composition}
5. MANDATORY: the final prompt MUST contain the exact phrase "{keyword}".

User idea: "{raw}"

Output only the final prompt as raw text. No markdown, no quotes, no explanations."#,
        tone = tone_instruction(tone),
        composition = directive.composition,
        keyword = directive.keyword,
        raw = raw_prompt.trim(),
    )
}

impl PromptEnhancer {
    pub fn new(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
        }
    }

    pub async fn enhance(&self, raw_prompt: &str, tone: BrandTone, ratio: AspectRatio) -> String {
        let request = TextRequest {
            model: self.model.clone(),
            instruction: build_enhancement_instruction(raw_prompt, tone, ratio),
        };

        match self.backend.generate_text(request).await {
            Ok(response) => match response.text.map(|text| text.trim().to_string()) {
                Some(text) if !text.is_empty() => {
                    info!(
                        "Enhanced prompt (tone={}, ratio={})",
                        tone.as_str(),
                        ratio.as_str()
                    );
                    text
                }
                _ => {
                    warn!("Prompt enhancement returned no text, keeping original prompt");
                    raw_prompt.to_string()
                }
            },
            Err(e) => {
                warn!("Prompt enhancement failed, keeping original prompt: {}", e);
                raw_prompt.to_string()
            }
        }
    }
}
