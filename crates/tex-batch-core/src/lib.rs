//! Core library for batch texture preparation.
//!
//! - Walker: lazy top-down listing of a texture tree, one entry per directory
//! - Resize scan: buckets textures as already sized / larger than target / not power-of-two / not square
//! - Pack scan: finds R/G/B(/A) source files per directory by substring suffixes
//! - Drivers: run resize and pack sequences against any `ImageEditor`; `LocalEditor` does it in-process
//!
//! Quick example:
//! ```ignore
//! use tex_batch_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let cfg = PackConfig::builder()
//!     .channels("_ao", "_rough", "_metal")
//!     .packed_suffix("_orm")
//!     .build();
//! let cancel = CancelFlag::new();
//! let found = scan_for_pack("textures".as_ref(), &cfg, &cancel, |_| DirAction::Scan)?;
//! let mut editor = LocalEditor::new();
//! let naming = TrailingTokenConvention;
//! let summary = pack_textures(&mut editor, &found, &cfg.packed_suffix, &naming, &cancel, |_| {})?;
//! println!("written: {}", summary.written.len());
//! # Ok(()) }
//! ```

pub mod cancel;
pub mod channels;
pub mod classify;
pub mod config;
pub mod driver;
pub mod editor;
pub mod error;
pub mod naming;
pub mod report;
pub mod walker;

pub use cancel::*;
pub use channels::*;
pub use classify::*;
pub use config::*;
pub use driver::*;
pub use editor::*;
pub use error::*;
pub use naming::*;
pub use report::*;
pub use walker::*;

/// Convenience prelude for common types and functions.
/// Importing `tex_batch_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::cancel::CancelFlag;
    pub use crate::channels::{Channel, ChannelAssignment, match_directory, scan_for_pack};
    pub use crate::classify::{
        Classification, DimensionReader, HeaderReader, ResizeReport, TextureBucket,
        classify_dimensions, is_power_of_two, scan_for_resize,
    };
    pub use crate::config::{NamingKind, PackConfig, ResizeConfig, TextureSize};
    pub use crate::driver::{
        RunProgress, RunSummary, pack_textures, packed_output_path, resize_textures,
    };
    pub use crate::editor::local::LocalEditor;
    pub use crate::editor::{DocumentId, ExportOptions, ImageEditor};
    pub use crate::naming::{FullStemConvention, NamingConvention, TrailingTokenConvention};
    pub use crate::walker::{DirAction, DirListing, walk_texture_dirs};
}
