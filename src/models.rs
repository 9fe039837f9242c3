// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Brand tone selected in the studio.
///
/// Wire values are lowercase names. Anything unrecognized is read as
/// [`BrandTone::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum BrandTone {
    #[default]
    Default,
    Minimalist,
    Luxury,
    Energetic,
    Corporate,
    Playful,
}

impl BrandTone {
    pub const ALL: [BrandTone; 6] = [
        BrandTone::Default,
        BrandTone::Minimalist,
        BrandTone::Luxury,
        BrandTone::Energetic,
        BrandTone::Corporate,
        BrandTone::Playful,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BrandTone::Default => "default",
            BrandTone::Minimalist => "minimalist",
            BrandTone::Luxury => "luxury",
            BrandTone::Energetic => "energetic",
            BrandTone::Corporate => "corporate",
            BrandTone::Playful => "playful",
        }
    }

    pub fn parse_lossy(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

impl From<String> for BrandTone {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl From<BrandTone> for &'static str {
    fn from(tone: BrandTone) -> Self {
        tone.as_str()
    }
}

/// Output frame shape. Unrecognized wire values are read as `1:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum AspectRatio {
    #[default]
    Square,
    Wide,
    Tall,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Wide,
        AspectRatio::Tall,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    /// The ratio label, which is also the structural parameter sent to the
    /// image backend.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Wide => "16:9",
            AspectRatio::Tall => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }

    pub fn parse_lossy(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == value)
            .unwrap_or_default()
    }
}

impl From<String> for AspectRatio {
    fn from(value: String) -> Self {
        Self::parse_lossy(&value)
    }
}

impl From<AspectRatio> for &'static str {
    fn from(ratio: AspectRatio) -> Self {
        ratio.as_str()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StylePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub prompt_modifier: &'static str,
    pub thumbnail: &'static str,
}

/// Everything the image backend needs for one request. Built fresh per call.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: AspectRatio,
    pub style_id: String,
    pub reference_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedImage {
    pub id: Uuid,
    /// `data:image/png;base64,...`
    pub data: String,
    /// What the user typed, not the composed prompt.
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
    pub aspect_ratio: AspectRatio,
}

impl GeneratedImage {
    pub fn new(data: String, prompt: String, aspect_ratio: AspectRatio) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            prompt,
            timestamp: Utc::now(),
            aspect_ratio,
        }
    }

    pub fn download_filename(&self) -> String {
        let id = self.id.simple().to_string();
        format!("brandshot-{}.png", &id[..8])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppStatus {
    #[default]
    Idle,
    Generating,
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub status: AppStatus,
    pub text_busy: bool,
    pub error: Option<String>,
    pub current: Option<GeneratedImage>,
    pub history: Vec<GeneratedImage>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhanceRequest {
    pub prompt: String,
    #[serde(default)]
    pub tone: BrandTone,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub tone: BrandTone,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// The studio form as submitted for generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default = "default_style_id")]
    pub style_id: String,
    #[serde(default)]
    pub tone: BrandTone,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub reference_image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurpriseRequest {
    #[serde(default = "default_style_id")]
    pub style_id: String,
    #[serde(default)]
    pub tone: BrandTone,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurpriseResponse {
    pub prompt: String,
    pub session: SessionSnapshot,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default = "default_style_id")]
    pub style_id: String,
    #[serde(default)]
    pub tone: BrandTone,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceUpload {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub reference_image: String,
}

fn default_style_id() -> String {
    "none".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tone_reads_as_default() {
        let tone: BrandTone = serde_json::from_str("\"vaporwave\"").unwrap();
        assert_eq!(tone, BrandTone::Default);
        let tone: BrandTone = serde_json::from_str("\"Luxury\"").unwrap();
        assert_eq!(tone, BrandTone::Luxury);
    }

    #[test]
    fn unknown_ratio_reads_as_square() {
        let ratio: AspectRatio = serde_json::from_str("\"21:9\"").unwrap();
        assert_eq!(ratio, AspectRatio::Square);
        let ratio: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(ratio, AspectRatio::Tall);
    }

    #[test]
    fn enums_serialize_as_labels() {
        assert_eq!(
            serde_json::to_string(&AspectRatio::Wide).unwrap(),
            "\"16:9\""
        );
        assert_eq!(
            serde_json::to_string(&BrandTone::Playful).unwrap(),
            "\"playful\""
        );
    }

    #[test]
    fn generate_request_defaults() {
        let request: GenerateRequest = serde_json::from_str(r#"{"prompt":"a fox"}"#).unwrap();
        assert_eq!(request.style_id, "none");
        assert_eq!(request.tone, BrandTone::Default);
        assert_eq!(request.aspect_ratio, AspectRatio::Square);
        assert!(request.reference_image.is_none());
    }

    #[test]
    fn download_filename_uses_id_prefix() {
        let image = GeneratedImage::new(
            "data:image/png;base64,AA".into(),
            "x".into(),
            AspectRatio::Square,
        );
        let name = image.download_filename();
        assert!(name.starts_with("brandshot-"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "brandshot-".len() + 8 + ".png".len());
        assert!(image.id.simple().to_string().starts_with(&name[10..18]));
    }
}
