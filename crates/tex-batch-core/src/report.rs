use crate::channels::ChannelAssignment;
use crate::classify::ResizeReport;
use crate::config::TextureSize;
use crate::driver::packed_output_path;
use crate::naming::NamingConvention;
use serde_json::{Value, json};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Plain-text summary of a resize scan, one section per bucket.
///
/// `resized` picks the heading of the first section: "Resized Textures:" after
/// a resize run, "Textures To Resize:" when nothing was written.
pub fn resize_summary_text(report: &ResizeReport, target: TextureSize, resized: bool) -> String {
    let mut out = String::new();
    let heading = if resized {
        "Resized Textures:"
    } else {
        "Textures To Resize:"
    };
    if report.larger_than_target.is_empty() {
        let _ = writeln!(out, "{}", heading);
        let _ = writeln!(out, "No textures larger than {} were found", target);
    } else {
        section(&mut out, heading, &report.larger_than_target);
    }
    section(&mut out, "\nAlready Sized and Skipped:", &report.already_sized);
    section(&mut out, "\nNot Power of 2 Textures:", &report.not_power_of_two);
    section(&mut out, "\nNot Square Textures:", &report.not_square);
    if !report.unreadable.is_empty() {
        let _ = writeln!(out, "\nUnreadable Files:");
        for (p, err) in &report.unreadable {
            let _ = writeln!(out, "{} ({})", p.display(), err);
        }
    }
    out
}

fn section(out: &mut String, header: &str, paths: &[PathBuf]) {
    let _ = writeln!(out, "{}", header);
    for p in paths {
        let _ = writeln!(out, "{}", p.display());
    }
}

/// Scan report as JSON: `{ target, buckets: {..}, counts: {..} }`.
pub fn resize_report_json(report: &ResizeReport, target: TextureSize) -> Value {
    let unreadable: Vec<Value> = report
        .unreadable
        .iter()
        .map(|(p, e)| json!({"path": p, "error": e}))
        .collect();
    json!({
        "target": target.pixels(),
        "buckets": {
            "larger_than_target": &report.larger_than_target,
            "already_sized": &report.already_sized,
            "not_power_of_two": &report.not_power_of_two,
            "not_square": &report.not_square,
            "within_target": &report.within_target,
            "unreadable": unreadable,
        },
        "counts": {
            "larger_than_target": report.larger_than_target.len(),
            "already_sized": report.already_sized.len(),
            "not_power_of_two": report.not_power_of_two.len(),
            "not_square": report.not_square.len(),
            "within_target": report.within_target.len(),
            "unreadable": report.unreadable.len(),
        }
    })
}

/// Planned pack outputs as JSON: `{ packed_suffix, textures: [{ output, red, green, blue, alpha }] }`.
pub fn pack_plan_json<N: NamingConvention + ?Sized>(
    assignments: &[ChannelAssignment],
    packed_suffix: &str,
    naming: &N,
) -> Value {
    let textures: Vec<Value> = assignments
        .iter()
        .map(|a| {
            json!({
                "directory": &a.directory,
                "output": packed_output_path(a, packed_suffix, naming),
                "red": &a.red,
                "green": &a.green,
                "blue": &a.blue,
                "alpha": &a.alpha,
            })
        })
        .collect();
    json!({ "packed_suffix": packed_suffix, "textures": textures })
}
