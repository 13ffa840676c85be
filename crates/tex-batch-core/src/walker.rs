use crate::error::{Result, TexBatchError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// One directory and the names of the regular files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub dir: PathBuf,
    /// Bare file names (no directory component), sorted.
    pub files: Vec<String>,
}

impl DirListing {
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// What a scan does with a directory handed to its `on_dir` callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirAction {
    Scan,
    /// Leave this directory's files out. Subdirectories are still visited.
    Skip,
}

/// Lazy top-down walk yielding one `DirListing` per directory.
pub struct DirWalk {
    inner: walkdir::IntoIter,
}

impl Iterator for DirWalk {
    type Item = DirListing;

    fn next(&mut self) -> Option<DirListing> {
        loop {
            let entry = match self.inner.next()? {
                Ok(e) => e,
                Err(e) => {
                    warn!(error = %e, "skip unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            match list_files(entry.path()) {
                Ok(files) => {
                    return Some(DirListing {
                        dir: entry.into_path(),
                        files,
                    });
                }
                Err(e) => warn!(dir = ?entry.path(), error = %e, "skip unreadable directory"),
            }
        }
    }
}

/// Walks `root` and all of its descendants. Symlinked directories are not
/// descended into; symlinks to regular files are listed like files.
///
/// Fails up front when `root` is missing or not a directory.
pub fn walk_texture_dirs(root: impl AsRef<Path>) -> Result<DirWalk> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(TexBatchError::InvalidDirectory(root.to_path_buf()));
    }
    let inner = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    Ok(DirWalk { inner })
}

fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let ft = entry.file_type()?;
        let is_file = ft.is_file()
            || (ft.is_symlink() && fs::metadata(entry.path()).is_ok_and(|m| m.is_file()));
        if is_file {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// Case-insensitive test of `name` against an allow-list of dotted extensions.
pub fn has_allowed_extension<S: AsRef<str>>(name: &str, extensions: &[S]) -> bool {
    let lower = name.to_ascii_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.as_ref().to_ascii_lowercase()))
}
