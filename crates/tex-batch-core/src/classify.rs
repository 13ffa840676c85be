use crate::cancel::CancelFlag;
use crate::config::{ResizeConfig, TextureSize};
use crate::error::{Result, TexBatchError};
use crate::walker::{DirAction, DirListing, has_allowed_extension, walk_texture_dirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

/// Outcome buckets of the resize scan. A file lands in at most one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextureBucket {
    /// Name already carries a size token; not read.
    AlreadySized,
    /// Square power-of-two larger than the target; candidate for resizing.
    LargerThanTarget,
    NotPowerOfTwo,
    NotSquare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Bucket(TextureBucket),
    /// Square power-of-two at or below the target; nothing to do.
    WithinTarget,
}

/// Reads pixel dimensions of a texture on disk.
pub trait DimensionReader {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)>;
}

/// Reader that decodes only the image header.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderReader;

impl DimensionReader for HeaderReader {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        Ok(image::image_dimensions(path)?)
    }
}

/// Partition of scanned textures. Paths are full paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResizeReport {
    pub larger_than_target: Vec<PathBuf>,
    pub already_sized: Vec<PathBuf>,
    pub not_power_of_two: Vec<PathBuf>,
    pub not_square: Vec<PathBuf>,
    pub within_target: Vec<PathBuf>,
    /// Files whose header could not be read, with the error message.
    pub unreadable: Vec<(PathBuf, String)>,
}

impl ResizeReport {
    pub fn bucket(&self, bucket: TextureBucket) -> &[PathBuf] {
        match bucket {
            TextureBucket::AlreadySized => &self.already_sized,
            TextureBucket::LargerThanTarget => &self.larger_than_target,
            TextureBucket::NotPowerOfTwo => &self.not_power_of_two,
            TextureBucket::NotSquare => &self.not_square,
        }
    }

    fn push(&mut self, class: Classification, path: PathBuf) {
        let list = match class {
            Classification::Bucket(TextureBucket::AlreadySized) => &mut self.already_sized,
            Classification::Bucket(TextureBucket::LargerThanTarget) => {
                &mut self.larger_than_target
            }
            Classification::Bucket(TextureBucket::NotPowerOfTwo) => &mut self.not_power_of_two,
            Classification::Bucket(TextureBucket::NotSquare) => &mut self.not_square,
            Classification::WithinTarget => &mut self.within_target,
        };
        list.push(path);
    }

    /// Number of classified textures, unreadable files excluded.
    pub fn total(&self) -> usize {
        self.larger_than_target.len()
            + self.already_sized.len()
            + self.not_power_of_two.len()
            + self.not_square.len()
            + self.within_target.len()
    }
}

pub fn is_power_of_two(n: u32) -> bool {
    n != 0 && (n & (n - 1)) == 0
}

/// True when `name` contains any enumerated size as a plain substring.
///
/// This is a naming heuristic: `tower_512.tga` counts as sized even if the
/// image is 2048 wide, and `v1024_notes.png` counts too.
pub fn contains_size_token(name: &str) -> bool {
    TextureSize::ALL
        .iter()
        .any(|s| name.contains(&s.pixels().to_string()))
}

/// Square check first, then power-of-two, then `w > target`.
pub fn classify_dimensions(width: u32, height: u32, target: TextureSize) -> Classification {
    if width != height {
        Classification::Bucket(TextureBucket::NotSquare)
    } else if !is_power_of_two(width) {
        Classification::Bucket(TextureBucket::NotPowerOfTwo)
    } else if width > target.pixels() {
        Classification::Bucket(TextureBucket::LargerThanTarget)
    } else {
        Classification::WithinTarget
    }
}

/// Classifies one file. `Ok(None)` means the extension is not allow-listed.
pub fn classify_file<P: DimensionReader + ?Sized>(
    path: &Path,
    cfg: &ResizeConfig,
    reader: &P,
) -> Result<Option<Classification>> {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return Ok(None),
    };
    if !has_allowed_extension(name, cfg.extensions.as_slice()) {
        return Ok(None);
    }
    if contains_size_token(name) {
        return Ok(Some(Classification::Bucket(TextureBucket::AlreadySized)));
    }
    let (w, h) = reader.dimensions(path)?;
    Ok(Some(classify_dimensions(w, h, cfg.target_size)))
}

/// Classifies every file of one directory listing into `report`.
pub fn analyze_directory<P: DimensionReader + ?Sized>(
    listing: &DirListing,
    cfg: &ResizeConfig,
    reader: &P,
    report: &mut ResizeReport,
) {
    for file in &listing.files {
        let path = listing.path_of(file);
        match classify_file(&path, cfg, reader) {
            Ok(Some(class)) => {
                if class == Classification::WithinTarget {
                    debug!(?path, target = %cfg.target_size, "within target, skipped");
                } else {
                    debug!(?path, ?class, "classified");
                }
                report.push(class, path);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(?path, error = %e, "cannot read texture dimensions");
                report.unreadable.push((path, e.to_string()));
            }
        }
    }
}

#[instrument(skip_all, fields(root = %root.display(), target = %cfg.target_size))]
/// Walks `root` and classifies every allow-listed texture.
///
/// `on_dir` is called before each directory is analyzed; a directory it
/// answers `DirAction::Skip` for is left out of the report. Returns
/// `TexBatchError::Canceled` and discards partial results if `cancel` is set.
pub fn scan_for_resize<P: DimensionReader + ?Sized>(
    root: &Path,
    cfg: &ResizeConfig,
    reader: &P,
    cancel: &CancelFlag,
    mut on_dir: impl FnMut(&DirListing) -> DirAction,
) -> Result<ResizeReport> {
    cfg.validate()?;
    let mut report = ResizeReport::default();
    for listing in walk_texture_dirs(root)? {
        if cancel.is_canceled() {
            return Err(TexBatchError::Canceled);
        }
        if on_dir(&listing) == DirAction::Skip {
            debug!(dir = ?listing.dir, "directory skipped");
            continue;
        }
        analyze_directory(&listing, cfg, reader, &mut report);
    }
    Ok(report)
}
