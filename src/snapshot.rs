use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::BoardError;
use crate::surface::PixelBuffer;

/// Options for [`Snapshot::encode`], mirroring the canvas `toDataURL`
/// signature. An unsupported `format` silently falls back to PNG.
#[derive(Debug, Clone, Default)]
pub struct ToDataUrlOptions {
    /// MIME type, e.g. `"image/png"` or `"image/jpeg"`.
    pub format: Option<String>,
    /// JPEG quality in `0.0..=1.0`; ignored for PNG.
    pub quality: Option<f32>,
}

/// A serialized, value-comparable copy of the full raster surface at one
/// instant: a `data:image/...;base64,...` URL.
///
/// Two snapshots are equal iff their serialized forms are byte-identical,
/// which is what history deduplication relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    /// Encode a pixel buffer into a data URL.
    pub fn encode(pixels: &PixelBuffer, options: &ToDataUrlOptions) -> Result<Self, BoardError> {
        let image = RgbaImage::from_raw(pixels.width, pixels.height, pixels.data.clone())
            .ok_or_else(|| BoardError::ImageEncode("pixel buffer size mismatch".into()))?;

        let mut bytes = Vec::new();
        let mime = match options.format.as_deref() {
            Some("image/jpeg") => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
                let quality = (options.quality.unwrap_or(0.92).clamp(0.0, 1.0) * 100.0) as u8;
                let mut cursor = Cursor::new(&mut bytes);
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut cursor,
                    quality.max(1),
                );
                rgb.write_with_encoder(encoder)
                    .map_err(|e| BoardError::ImageEncode(e.to_string()))?;
                "image/jpeg"
            }
            _ => {
                image
                    .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
                    .map_err(|e| BoardError::ImageEncode(e.to_string()))?;
                "image/png"
            }
        };

        Ok(Self(format!(
            "data:{};base64,{}",
            mime,
            BASE64.encode(&bytes)
        )))
    }

    /// Decode this snapshot back into pixels.
    pub fn decode(&self) -> Result<RgbaImage, BoardError> {
        decode_data_url(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<Snapshot> for String {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.0
    }
}

/// Whether `src` looks like an image data URL.
pub fn is_data_url(src: &str) -> bool {
    src.starts_with("data:image/")
}

/// Decode a `data:image/...;base64,...` URL into an RGBA image.
pub fn decode_data_url(src: &str) -> Result<RgbaImage, BoardError> {
    if !is_data_url(src) {
        return Err(BoardError::MalformedDataUrl);
    }
    let payload = src
        .split_once(";base64,")
        .map(|(_, payload)| payload)
        .ok_or(BoardError::MalformedDataUrl)?;
    let bytes = BASE64
        .decode(payload)
        .map_err(|_| BoardError::MalformedDataUrl)?;

    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}
