use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TexBatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("No suffix entered for {0}")]
    MissingSuffix(&'static str),
    #[error("Unsupported output extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("Unknown document handle {0}")]
    UnknownDocument(usize),
    #[error("Nothing has been copied to paste")]
    EmptyClipboard,
    #[error("Operation canceled")]
    Canceled,
}

pub type Result<T> = std::result::Result<T, TexBatchError>;
