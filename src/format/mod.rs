//! Annotation interchange with the host.
//!
//! The editor never touches files; hosts persist and exchange annotation sets
//! as text. The canonical interchange is the YOLO line format:
//!
//! ```text
//! categoryId centerX centerY width height
//! ```
//!
//! with every coordinate normalized to `[0, 1]` by the image dimensions.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boxmark::format::yolo;
//!
//! let text = yolo::encode(editor.annotations(), 640.0, 480.0);
//! let restored = yolo::decode(&text, 640.0, 480.0)?;
//! ```

mod error;
pub mod yolo;

#[cfg(test)]
mod tests;

pub use error::FormatError;
