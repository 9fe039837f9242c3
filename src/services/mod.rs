// src/services/mod.rs
pub mod backend;
pub mod enhancer;
pub mod gemini_client;
pub mod image_generator;
pub mod image_processor;
pub mod prompt_composer;
pub mod session_service;
pub mod suggester;

pub use backend::GenerativeBackend;
pub use enhancer::PromptEnhancer;
pub use gemini_client::GeminiClient;
pub use image_generator::ImageGenerator;
pub use image_processor::ImageProcessor;
pub use session_service::SessionService;
pub use suggester::PromptSuggester;
