use crate::channels::Channel;
use crate::error::{Result, TexBatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub mod local;

/// Opaque handle to a document open in an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub usize);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Format-specific save settings for `ImageEditor::export_as`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ExportOptions {
    /// 32-bit with alpha, 24-bit without.
    Targa { alpha: bool, rle: bool },
    Png,
    Jpeg { quality: u8 },
}

impl ExportOptions {
    pub const DEFAULT_JPEG_QUALITY: u8 = 90;

    /// Picks options from the extension of `path`.
    pub fn for_path(path: &Path, alpha: bool) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("tga") => Ok(Self::Targa { alpha, rle: false }),
            Some("png") => Ok(Self::Png),
            Some("jpg") | Some("jpeg") => Ok(Self::Jpeg {
                quality: Self::DEFAULT_JPEG_QUALITY,
            }),
            _ => Err(TexBatchError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    /// Whether the written file keeps an alpha channel.
    pub fn stores_alpha(&self) -> bool {
        match self {
            Self::Targa { alpha, .. } => *alpha,
            Self::Png => true,
            Self::Jpeg { .. } => false,
        }
    }

    /// Bits per pixel of the written file.
    pub fn bit_depth(&self) -> u8 {
        match self {
            Self::Targa { alpha: true, .. } => 32,
            Self::Targa { alpha: false, .. } => 24,
            Self::Png => 32,
            Self::Jpeg { .. } => 24,
        }
    }
}

/// The operations the run drivers need from an image editor.
///
/// Mirrors a scripted editor session: documents are opened or created,
/// one document's pixels are copied to a clipboard and pasted into a single
/// channel of another, then the result is exported. Callers keep at most one
/// logical session running at a time.
pub trait ImageEditor {
    fn open(&mut self, path: &Path) -> Result<DocumentId>;
    fn dimensions(&self, doc: DocumentId) -> Result<(u32, u32)>;
    fn has_alpha(&self, doc: DocumentId) -> Result<bool>;
    /// Select-all and copy the flattened document to the clipboard.
    fn copy(&mut self, doc: DocumentId) -> Result<()>;
    /// Blank RGB document filled with white.
    fn new_canvas(&mut self, width: u32, height: u32) -> Result<DocumentId>;
    /// Paste the clipboard into one channel of `doc`. Pasting into
    /// `Channel::Alpha` adds an alpha channel first if needed.
    fn paste_into_channel(&mut self, doc: DocumentId, channel: Channel) -> Result<()>;
    fn resize(&mut self, doc: DocumentId, width: u32, height: u32) -> Result<()>;
    fn export_as(&mut self, doc: DocumentId, path: &Path, options: &ExportOptions) -> Result<()>;
    /// Close `doc`, writing it back to its source first when `save` is set.
    fn close(&mut self, doc: DocumentId, save: bool) -> Result<()>;
}
