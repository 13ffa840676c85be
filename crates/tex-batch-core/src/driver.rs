use crate::cancel::CancelFlag;
use crate::channels::{Channel, ChannelAssignment};
use crate::config::TextureSize;
use crate::editor::{DocumentId, ExportOptions, ImageEditor};
use crate::error::Result;
use crate::naming::NamingConvention;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// What a resize or pack run produced.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Output files in the order they were written.
    pub written: Vec<PathBuf>,
    /// True if the run stopped early because the cancel flag was set.
    pub canceled: bool,
}

/// Progress of a run: index of the current item, total items, output path.
pub struct RunProgress<'a> {
    pub index: usize,
    pub total: usize,
    pub output: &'a Path,
}

#[instrument(skip_all, fields(count = textures.len(), target = %target))]
/// Resizes each texture to `target` x `target` and exports a copy named by
/// `naming.resized_path`. Sources are closed without saving.
pub fn resize_textures<E, N>(
    editor: &mut E,
    textures: &[PathBuf],
    target: TextureSize,
    naming: &N,
    cancel: &CancelFlag,
    mut on_progress: impl FnMut(RunProgress<'_>),
) -> Result<RunSummary>
where
    E: ImageEditor + ?Sized,
    N: NamingConvention + ?Sized,
{
    let mut summary = RunSummary::default();
    for (index, source) in textures.iter().enumerate() {
        if cancel.is_canceled() {
            warn!(done = index, "resize canceled");
            summary.canceled = true;
            break;
        }
        let output = naming.resized_path(source, target);
        on_progress(RunProgress {
            index,
            total: textures.len(),
            output: &output,
        });

        let doc = editor.open(source)?;
        let px = target.pixels();
        let exported = editor.resize(doc, px, px).and_then(|_| {
            let alpha = editor.has_alpha(doc)?;
            let options = ExportOptions::for_path(&output, alpha)?;
            editor.export_as(doc, &output, &options)
        });
        editor.close(doc, false)?;
        exported?;

        info!(?source, ?output, "resized");
        summary.written.push(output);
    }
    Ok(summary)
}

/// Where the packed texture for `assignment` is written.
///
/// Named by `naming.packed_path(red, packed_suffix)`. When an alpha source is
/// present and that extension cannot carry alpha, the extension becomes `.tga`.
pub fn packed_output_path<N: NamingConvention + ?Sized>(
    assignment: &ChannelAssignment,
    packed_suffix: &str,
    naming: &N,
) -> PathBuf {
    let output = naming.packed_path(&assignment.red, packed_suffix);
    if assignment.alpha.is_none() {
        return output;
    }
    match ExportOptions::for_path(&output, true) {
        Ok(opts) if opts.stores_alpha() => output,
        _ => {
            warn!(?output, "format cannot store alpha, writing targa instead");
            output.with_extension("tga")
        }
    }
}

#[instrument(skip_all, fields(count = assignments.len(), suffix = packed_suffix))]
/// Packs each assignment's sources into the R/G/B(/A) channels of a new
/// texture sized like the red source, exported to `packed_output_path`.
///
/// If a pack fails, every document it opened is closed before the error is
/// returned.
pub fn pack_textures<E, N>(
    editor: &mut E,
    assignments: &[ChannelAssignment],
    packed_suffix: &str,
    naming: &N,
    cancel: &CancelFlag,
    mut on_progress: impl FnMut(RunProgress<'_>),
) -> Result<RunSummary>
where
    E: ImageEditor + ?Sized,
    N: NamingConvention + ?Sized,
{
    let mut summary = RunSummary::default();
    for (index, assignment) in assignments.iter().enumerate() {
        if cancel.is_canceled() {
            warn!(done = index, "pack canceled");
            summary.canceled = true;
            break;
        }
        let output = packed_output_path(assignment, packed_suffix, naming);
        on_progress(RunProgress {
            index,
            total: assignments.len(),
            output: &output,
        });

        let mut open = Vec::new();
        if let Err(e) = pack_one(editor, assignment, &output, &mut open) {
            for doc in open.into_iter().rev() {
                if let Err(close_err) = editor.close(doc, false) {
                    warn!(doc = %doc, error = %close_err, "cannot close document");
                }
            }
            return Err(e);
        }
        info!(dir = ?assignment.directory, ?output, alpha = assignment.alpha.is_some(), "packed");
        summary.written.push(output);
    }
    Ok(summary)
}

fn open_tracked<E: ImageEditor + ?Sized>(
    editor: &mut E,
    path: &Path,
    open: &mut Vec<DocumentId>,
) -> Result<DocumentId> {
    let doc = editor.open(path)?;
    open.push(doc);
    Ok(doc)
}

fn close_tracked<E: ImageEditor + ?Sized>(
    editor: &mut E,
    doc: DocumentId,
    open: &mut Vec<DocumentId>,
) -> Result<()> {
    open.retain(|d| *d != doc);
    editor.close(doc, false)
}

/// Runs one pack. Every document still open is left in `open`.
fn pack_one<E: ImageEditor + ?Sized>(
    editor: &mut E,
    assignment: &ChannelAssignment,
    output: &Path,
    open: &mut Vec<DocumentId>,
) -> Result<()> {
    let red = open_tracked(editor, &assignment.red, open)?;
    let (w, h) = editor.dimensions(red)?;
    editor.copy(red)?;
    let canvas = editor.new_canvas(w, h)?;
    open.push(canvas);
    editor.paste_into_channel(canvas, Channel::Red)?;

    let mut sources: Vec<DocumentId> = vec![red];
    for (channel, path) in [
        (Channel::Green, &assignment.green),
        (Channel::Blue, &assignment.blue),
    ] {
        let doc = open_tracked(editor, path, open)?;
        sources.push(doc);
        editor.copy(doc)?;
        editor.paste_into_channel(canvas, channel)?;
    }
    for doc in sources {
        close_tracked(editor, doc, open)?;
    }

    if let Some(alpha_path) = &assignment.alpha {
        let doc = open_tracked(editor, alpha_path, open)?;
        editor.copy(doc)?;
        editor.paste_into_channel(canvas, Channel::Alpha)?;
        close_tracked(editor, doc, open)?;
    }

    let options = ExportOptions::for_path(output, assignment.alpha.is_some())?;
    editor.export_as(canvas, output, &options)?;
    close_tracked(editor, canvas, open)
}
