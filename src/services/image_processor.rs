// src/services/image_processor.rs
use crate::errors::AdError;
use crate::models::ProductDescriptor;
use base64::{Engine as _, engine::general_purpose};
use image::{GenericImageView, ImageFormat as ImgFormat};

const MAX_DIMENSION: u32 = 4096;
/// Longest edge of the product preview copied into every generated ad record.
const THUMBNAIL_DIMENSION: u32 = 512;

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Checks the bytes decode as an image within the size limit.
    pub fn validate_image(&self, data: &[u8]) -> Result<(u32, u32), AdError> {
        if data.is_empty() {
            return Err(AdError::ImageProcessing("Empty file".to_string()));
        }

        let img = image::load_from_memory(data)
            .map_err(|e| AdError::ImageProcessing(format!("Invalid image format: {}", e)))?;

        let (width, height) = img.dimensions();

        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(AdError::ImageProcessing(format!(
                "Image dimensions exceed {}x{}",
                MAX_DIMENSION, MAX_DIMENSION
            )));
        }

        Ok((width, height))
    }

    pub fn resize_if_needed(&self, data: &[u8], max_size: u32) -> Result<Vec<u8>, AdError> {
        let img = image::load_from_memory(data)
            .map_err(|e| AdError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let (width, height) = img.dimensions();

        if width <= max_size && height <= max_size {
            return Ok(data.to_vec());
        }

        let ratio = (max_size as f32 / width.max(height) as f32).min(1.0);
        let new_width = ((width as f32 * ratio) as u32).max(1);
        let new_height = ((height as f32 * ratio) as u32).max(1);

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
            .map_err(|e| {
                AdError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        Ok(output)
    }

    /// Validates an upload and builds its descriptor.
    ///
    /// `size` is the original upload size; `url` is a self-contained data URI of
    /// a thumbnail, re-encoded as PNG when it had to be downscaled.
    pub fn describe_upload(
        &self,
        filename: String,
        declared_type: Option<String>,
        data: &[u8],
    ) -> Result<ProductDescriptor, AdError> {
        self.validate_image(data)?;

        let sniffed = image::guess_format(data).ok().map(mime_for);
        let content_type = declared_type
            .filter(|t| t.starts_with("image/"))
            .or_else(|| sniffed.map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let preview = self.resize_if_needed(data, THUMBNAIL_DIMENSION)?;
        let preview_type = if preview == data {
            content_type.as_str()
        } else {
            "image/png"
        };

        Ok(ProductDescriptor {
            name: filename,
            size: data.len() as u64,
            url: format!(
                "data:{};base64,{}",
                preview_type,
                general_purpose::STANDARD.encode(&preview)
            ),
            content_type,
            uploaded_at: chrono::Utc::now(),
        })
    }
}

fn mime_for(format: ImgFormat) -> &'static str {
    match format {
        ImgFormat::Png => "image/png",
        ImgFormat::Jpeg => "image/jpeg",
        ImgFormat::Gif => "image/gif",
        ImgFormat::WebP => "image/webp",
        ImgFormat::Bmp => "image/bmp",
        ImgFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut output = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Png)
        .unwrap();
    output
}
