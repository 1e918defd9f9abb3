//! Editing session: loaded images, active surfaces, history and saved masks.
//!
//! Images are appended in import order and never removed. Only the current
//! image has materialized surfaces; switching images discards them and issues
//! a decode request whose completion rebuilds them, guarded by a generation
//! counter so late completions for an earlier navigation are ignored.

mod decode;
mod decoder;
mod entry;
mod state;

pub use decode::{DecodeCompletion, DecodeError, DecodeRequest, DecodedImage, decode_image};
pub use decoder::DecodeManager;
pub use entry::{DecodeState, ImageEntry, ImportedFile, MaskRecord};
pub use state::{ActiveImage, DecodeStatus, Session};

#[cfg(test)]
mod tests;
