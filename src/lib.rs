//! Freehand mask annotation engine for image sequences.
//!
//! Images are loaded into a [`session::Session`], painted on through the
//! event-driven [`editor::MaskEditor`], and packaged with their saved masks by
//! the [`export`] module. The [`app`] driver replays JSON event scripts
//! headlessly on top of the same pieces.

pub mod app;
pub mod config;
pub mod draw;
pub mod editor;
pub mod export;
pub mod history;
pub mod input;
pub mod script;
pub mod session;
pub mod util;
pub mod viewport;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use editor::MaskEditor;
