use crate::config::{NamingKind, TextureSize};
use std::path::{Path, PathBuf};

/// Derives output file names from source texture paths.
///
/// Outputs always land next to their source and keep its extension.
pub trait NamingConvention {
    /// Base name for the packed texture, without suffix or extension.
    fn packed_base(&self, stem: &str) -> String;

    fn packed_path(&self, source: &Path, packed_suffix: &str) -> PathBuf {
        let (stem, ext) = split_name(source);
        let name = format!("{}{}{}", self.packed_base(&stem), packed_suffix, ext);
        source.with_file_name(name)
    }

    fn resized_path(&self, source: &Path, size: TextureSize) -> PathBuf {
        let (stem, ext) = split_name(source);
        source.with_file_name(format!("{}_{}{}", stem, size, ext))
    }
}

/// Drops the last `_`-delimited token of the stem (`wall_albedo_m` -> `wall_albedo`).
/// Stems without an underscore are kept whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingTokenConvention;

impl NamingConvention for TrailingTokenConvention {
    fn packed_base(&self, stem: &str) -> String {
        match stem.rsplit_once('_') {
            Some((base, _)) => base.to_string(),
            None => stem.to_string(),
        }
    }
}

/// Keeps the whole stem (`wall_albedo_m` -> `wall_albedo_m`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FullStemConvention;

impl NamingConvention for FullStemConvention {
    fn packed_base(&self, stem: &str) -> String {
        stem.to_string()
    }
}

impl NamingKind {
    pub fn convention(self) -> Box<dyn NamingConvention> {
        match self {
            NamingKind::TrailingToken => Box::new(TrailingTokenConvention),
            NamingKind::FullStem => Box::new(FullStemConvention),
        }
    }
}

/// Splits a file name into stem and dotted extension (empty if none).
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}
