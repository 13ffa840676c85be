use crate::cancel::CancelFlag;
use crate::config::PackConfig;
use crate::error::{Result, TexBatchError};
use crate::walker::{DirAction, DirListing, has_allowed_extension, walk_texture_dirs};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Destination channel of a packed texture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

impl Channel {
    /// Index into an RGBA pixel.
    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Alpha => "Alpha",
        };
        f.write_str(s)
    }
}

/// Source files chosen for one packed texture. One per directory at most.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelAssignment {
    pub directory: PathBuf,
    pub red: PathBuf,
    pub green: PathBuf,
    pub blue: PathBuf,
    pub alpha: Option<PathBuf>,
}

impl ChannelAssignment {
    /// Sources in paste order, alpha last if present.
    pub fn sources(&self) -> impl Iterator<Item = (Channel, &Path)> {
        [
            (Channel::Red, Some(self.red.as_path())),
            (Channel::Green, Some(self.green.as_path())),
            (Channel::Blue, Some(self.blue.as_path())),
            (Channel::Alpha, self.alpha.as_deref()),
        ]
        .into_iter()
        .filter_map(|(c, p)| p.map(|p| (c, p)))
    }
}

#[derive(Default)]
struct Slots {
    red: Option<PathBuf>,
    green: Option<PathBuf>,
    blue: Option<PathBuf>,
    alpha: Option<PathBuf>,
}

fn fill_first(slot: &mut Option<PathBuf>, suffix: &str, name: &str, path: &Path) {
    if slot.is_none() && name.contains(suffix) {
        *slot = Some(path.to_path_buf());
    }
}

/// Looks for R/G/B(/A) sources among the files of one directory.
///
/// Every allow-listed file is tested against each suffix independently, so
/// one file may fill several channels; each channel keeps its first match.
/// Returns `None` unless red, green and blue all matched.
pub fn match_directory(listing: &DirListing, cfg: &PackConfig) -> Option<ChannelAssignment> {
    let alpha_suffix = cfg.alpha_suffix();
    let mut slots = Slots::default();
    for name in &listing.files {
        if !has_allowed_extension(name, cfg.extensions.as_slice()) {
            continue;
        }
        let path = listing.path_of(name);
        fill_first(&mut slots.red, &cfg.red, name, &path);
        fill_first(&mut slots.green, &cfg.green, name, &path);
        fill_first(&mut slots.blue, &cfg.blue, name, &path);
        if let Some(a) = alpha_suffix {
            fill_first(&mut slots.alpha, a, name, &path);
        }
    }
    match slots {
        Slots {
            red: Some(red),
            green: Some(green),
            blue: Some(blue),
            alpha,
        } => Some(ChannelAssignment {
            directory: listing.dir.clone(),
            red,
            green,
            blue,
            alpha,
        }),
        _ => {
            debug!(dir = ?listing.dir, "incomplete channel set, skipped");
            None
        }
    }
}

#[instrument(skip_all, fields(root = %root.display()))]
/// Walks `root` and collects one `ChannelAssignment` per complete directory.
///
/// Validates `cfg` first. Directories `on_dir` answers `DirAction::Skip` for
/// are not matched. Returns `TexBatchError::Canceled` if `cancel` is set
/// between directories.
pub fn scan_for_pack(
    root: &Path,
    cfg: &PackConfig,
    cancel: &CancelFlag,
    mut on_dir: impl FnMut(&DirListing) -> DirAction,
) -> Result<Vec<ChannelAssignment>> {
    cfg.validate()?;
    let mut found = Vec::new();
    for listing in walk_texture_dirs(root)? {
        if cancel.is_canceled() {
            return Err(TexBatchError::Canceled);
        }
        if on_dir(&listing) == DirAction::Skip {
            debug!(dir = ?listing.dir, "directory skipped");
            continue;
        }
        if let Some(assignment) = match_directory(&listing, cfg) {
            debug!(dir = ?assignment.directory, alpha = assignment.alpha.is_some(), "channel set found");
            found.push(assignment);
        }
    }
    Ok(found)
}
