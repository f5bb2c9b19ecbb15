use thiserror::Error;

/// Errors surfaced by the drawing board.
///
/// Boundary conditions that the board defines as no-ops (undo on an empty
/// past, flood-filling a pixel with its own color) are not errors and never
/// appear here.
#[derive(Error, Debug)]
pub enum BoardError {
    /// The backing surface has a zero-sized pixel area.
    #[error("surface must have a non-zero pixel size")]
    InvalidSurface,

    /// The passed image source cannot be drawn (zero-sized).
    #[error("passed source is not a drawable")]
    NotDrawable,

    /// The passed string is not a `data:image/...;base64,...` URL.
    #[error("passed src is not a base64 data URL")]
    MalformedDataUrl,

    /// Decoding the image payload of a data URL failed.
    #[error("failed to decode image data: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Encoding the surface into a snapshot failed.
    #[error("failed to encode surface: {0}")]
    ImageEncode(String),
}
