//! Image decoding and the request/completion pair exchanged with the decoder.

use crate::draw::SurfaceError;
use crate::draw::surface::MAX_DIMENSION;
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that leave an image entry undecoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to decode {name}: {source}")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{name} has unsupported dimensions {width}x{height}")]
    Dimensions {
        name: String,
        width: u32,
        height: u32,
    },

    #[error("could not allocate surfaces for {name}: {source}")]
    Surface {
        name: String,
        #[source]
        source: SurfaceError,
    },

    #[error("decode worker unavailable: {0}")]
    Worker(String),
}

/// Pixels of a successfully decoded image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Decodes any raster format supported by the `image` crate into RGBA pixels.
pub fn decode_image(name: &str, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    let pixels = image::load_from_memory(bytes)
        .map_err(|source| DecodeError::Image {
            name: name.to_string(),
            source,
        })?
        .to_rgba8();

    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(DecodeError::Dimensions {
            name: name.to_string(),
            width,
            height,
        });
    }

    Ok(DecodedImage { pixels })
}

/// Work item for decoding the active image.
///
/// `generation` identifies the navigation that issued the request; the session
/// ignores completions whose generation is no longer current.
#[derive(Clone)]
pub struct DecodeRequest {
    pub index: usize,
    pub generation: u64,
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl DecodeRequest {
    /// Performs the decode synchronously.
    pub fn run(self) -> DecodeCompletion {
        let result = decode_image(&self.name, &self.bytes);
        DecodeCompletion {
            index: self.index,
            generation: self.generation,
            name: self.name,
            result,
        }
    }
}

impl fmt::Debug for DecodeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodeRequest")
            .field("index", &self.index)
            .field("generation", &self.generation)
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Result of a decode request, delivered back to the session.
#[derive(Debug)]
pub struct DecodeCompletion {
    pub index: usize,
    pub generation: u64,
    pub name: String,
    pub result: Result<DecodedImage, DecodeError>,
}
