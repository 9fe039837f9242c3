// src/services/image_processor.rs
use crate::errors::StudioError;
use crate::services::image_generator::{IMAGE_DATA_PREFIX, strip_data_url_header};
use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};

const MAX_INPUT_DIM: u32 = 8192;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Prepares uploaded reference images and decodes generated ones for export.
pub struct ImageProcessor {
    max_reference_dim: u32,
    max_upload_bytes: usize,
}

impl ImageProcessor {
    pub fn new(max_reference_dim: u32) -> Self {
        Self {
            max_reference_dim,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Fails once an upload grows past the configured byte limit.
    pub fn check_upload_size(&self, size: usize) -> Result<(), StudioError> {
        if size > self.max_upload_bytes {
            return Err(StudioError::Validation(format!(
                "Image upload exceeds {} bytes",
                self.max_upload_bytes
            )));
        }
        Ok(())
    }

    pub fn validate_image(&self, data: &[u8]) -> Result<DynamicImage, StudioError> {
        let img = image::load_from_memory(data)
            .map_err(|e| StudioError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();
        if width > MAX_INPUT_DIM || height > MAX_INPUT_DIM {
            return Err(StudioError::ImageProcessing(format!(
                "Image dimensions exceed {}x{}",
                MAX_INPUT_DIM, MAX_INPUT_DIM
            )));
        }

        Ok(img)
    }

    /// Validates, downsizes past the configured bound and re-encodes as PNG,
    /// so the PNG mime type sent with references is accurate.
    pub fn prepare_reference(&self, data: &[u8]) -> Result<(String, u32, u32), StudioError> {
        let img = self.validate_image(data)?;
        let (width, height) = img.dimensions();

        let img = if width > self.max_reference_dim || height > self.max_reference_dim {
            let ratio = self.max_reference_dim as f32 / width.max(height) as f32;
            let new_width = ((width as f32 * ratio) as u32).max(1);
            let new_height = ((height as f32 * ratio) as u32).max(1);
            img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
        } else {
            img
        };

        let mut output = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                StudioError::ImageProcessing(format!("Failed to encode reference image: {}", e))
            })?;

        let (width, height) = img.dimensions();
        Ok((
            format!(
                "{}{}",
                IMAGE_DATA_PREFIX,
                general_purpose::STANDARD.encode(output)
            ),
            width,
            height,
        ))
    }

    /// Raw bytes behind a generated image's data URL.
    pub fn decode_data_url(&self, data_url: &str) -> Result<Vec<u8>, StudioError> {
        general_purpose::STANDARD
            .decode(strip_data_url_header(data_url))
            .map_err(|e| StudioError::ImageProcessing(format!("Failed to decode image: {}", e)))
    }
}
