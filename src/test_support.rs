//! Helpers shared by unit tests.

use crate::session::ImportedFile;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Encodes a solid grey PNG of the given size.
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test png");
    buffer.into_inner()
}

/// An imported PNG file named `name`.
pub(crate) fn png_file(name: &str, width: u32, height: u32) -> ImportedFile {
    ImportedFile::new(name, png_bytes(width, height))
}

/// An imported file whose bytes are not a decodable image.
pub(crate) fn corrupt_file(name: &str) -> ImportedFile {
    ImportedFile::new(name, b"definitely not an image".to_vec())
}
