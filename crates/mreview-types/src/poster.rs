//! Rules for uploaded poster images.
//!
//! Only the file name extension is checked, content is stored as uploaded.

use crate::utils::file_ext;

pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "png"];
pub const DEFAULT_MAX_POSTER_SIZE: usize = 1024 * 1024;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PosterRejection {
    #[error("Please select a movie poster.")]
    Missing,
    #[error("Only PNG and JPG files are allowed!")]
    UnsupportedType,
    #[error("Max size is {} KiB", .max / 1024)]
    TooLarge { max: usize },
}

pub fn check_extension(file_name: &str) -> Result<(), PosterRejection> {
    match file_ext(file_name) {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(PosterRejection::UnsupportedType),
    }
}

pub fn check_size(size: usize, max: usize) -> Result<(), PosterRejection> {
    if size > max {
        Err(PosterRejection::TooLarge { max })
    } else {
        Ok(())
    }
}

/// Content type to serve stored poster bytes with
pub fn image_mime(data: &[u8]) -> &'static str {
    if data.starts_with(PNG_MAGIC) {
        "image/png"
    } else {
        "image/jpeg"
    }
}
