use std::path::{Path, PathBuf};
use tex_batch_core::prelude::*;
use tex_batch_core::{pack_plan_json, resize_report_json, resize_summary_text};

fn sample_report() -> ResizeReport {
    ResizeReport {
        larger_than_target: vec![PathBuf::from("/art/big.tga")],
        already_sized: vec![PathBuf::from("/art/rock_512.tga")],
        not_power_of_two: vec![],
        not_square: vec![PathBuf::from("/art/wide.png")],
        within_target: vec![PathBuf::from("/art/ok.png")],
        unreadable: vec![(PathBuf::from("/art/bad.jpg"), "truncated".into())],
    }
}

#[test]
fn summary_text_lists_every_section() {
    let text = resize_summary_text(&sample_report(), TextureSize::S512, true);
    assert!(text.starts_with("Resized Textures:\n/art/big.tga\n"));
    assert!(text.contains("Already Sized and Skipped:\n/art/rock_512.tga\n"));
    assert!(text.contains("Not Power of 2 Textures:\n\nNot Square Textures:"));
    assert!(text.contains("/art/bad.jpg (truncated)"));
}

#[test]
fn summary_text_mentions_target_when_nothing_is_larger() {
    let text = resize_summary_text(&ResizeReport::default(), TextureSize::S256, true);
    assert!(text.contains("No textures larger than 256 were found"));
    assert!(!text.contains("Unreadable"));
}

#[test]
fn summary_text_lists_candidates_when_nothing_was_written() {
    let text = resize_summary_text(&sample_report(), TextureSize::S512, false);
    assert!(text.starts_with("Textures To Resize:\n/art/big.tga\n"));
    assert!(!text.contains("Resized Textures:"));

    let empty = resize_summary_text(&ResizeReport::default(), TextureSize::S256, false);
    assert!(empty.starts_with("Textures To Resize:\nNo textures larger than 256 were found\n"));
}

#[test]
fn report_json_has_buckets_and_counts() {
    let v = resize_report_json(&sample_report(), TextureSize::S512);
    assert_eq!(v["target"], 512);
    assert_eq!(v["counts"]["larger_than_target"], 1);
    assert_eq!(v["counts"]["not_power_of_two"], 0);
    assert_eq!(v["buckets"]["not_square"][0], "/art/wide.png");
    assert_eq!(v["buckets"]["unreadable"][0]["error"], "truncated");
}

#[test]
fn pack_plan_json_includes_output_names() {
    let dir = Path::new("/art/wall");
    let a = ChannelAssignment {
        directory: dir.to_path_buf(),
        red: dir.join("wall_albedo_d.tga"),
        green: dir.join("wall_albedo_n.tga"),
        blue: dir.join("wall_albedo_m.tga"),
        alpha: None,
    };
    let v = pack_plan_json(&[a], "_rmn", &TrailingTokenConvention);
    assert_eq!(v["packed_suffix"], "_rmn");
    assert_eq!(v["textures"][0]["output"], "/art/wall/wall_albedo_rmn.tga");
    assert!(v["textures"][0]["alpha"].is_null());
}

#[test]
fn pack_plan_json_switches_to_targa_for_alpha_in_jpeg() {
    let dir = Path::new("/art/wall");
    let a = ChannelAssignment {
        directory: dir.to_path_buf(),
        red: dir.join("wall_d.jpg"),
        green: dir.join("wall_n.jpg"),
        blue: dir.join("wall_m.jpg"),
        alpha: Some(dir.join("wall_h.jpg")),
    };
    let v = pack_plan_json(&[a], "_p", &TrailingTokenConvention);
    assert_eq!(v["textures"][0]["output"], "/art/wall/wall_p.tga");
}
