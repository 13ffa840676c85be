use image::{GrayImage, Luma};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tex_batch_core::error::{Result, TexBatchError};
use tex_batch_core::prelude::*;
use tex_batch_core::{analyze_directory, classify_file, contains_size_token};

/// Answers dimensions from a table instead of reading files.
struct FixedDimensions(HashMap<String, (u32, u32)>);

impl FixedDimensions {
    fn new(entries: &[(&str, u32, u32)]) -> Self {
        Self(
            entries
                .iter()
                .map(|(n, w, h)| (n.to_string(), (*w, *h)))
                .collect(),
        )
    }
}

impl DimensionReader for FixedDimensions {
    fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.0
            .get(&name)
            .copied()
            .ok_or_else(|| TexBatchError::InvalidConfig(format!("no size for {}", name)))
    }
}

fn write_gray(path: &Path, w: u32, h: u32) {
    GrayImage::from_pixel(w, h, Luma([128])).save(path).expect("write image");
}

#[test]
fn power_of_two_check() {
    for n in [1u32, 2, 4, 8, 16, 64, 512, 1024, 4096] {
        assert!(is_power_of_two(n), "{} should be a power of two", n);
    }
    for n in [0u32, 3, 6, 100, 513, 4095] {
        assert!(!is_power_of_two(n), "{} should not be a power of two", n);
    }
}

#[test]
fn non_square_wins_over_power_of_two() {
    let t = TextureSize::S512;
    assert_eq!(
        classify_dimensions(1024, 512, t),
        Classification::Bucket(TextureBucket::NotSquare)
    );
    assert_eq!(
        classify_dimensions(300, 200, t),
        Classification::Bucket(TextureBucket::NotSquare)
    );
}

#[test]
fn square_non_power_of_two() {
    assert_eq!(
        classify_dimensions(1000, 1000, TextureSize::S512),
        Classification::Bucket(TextureBucket::NotPowerOfTwo)
    );
}

#[test]
fn larger_than_target_uses_strict_greater() {
    let t = TextureSize::S512;
    for edge in [1024u32, 2048, 4096, 8192] {
        assert_eq!(
            classify_dimensions(edge, edge, t),
            Classification::Bucket(TextureBucket::LargerThanTarget)
        );
    }
    assert_eq!(classify_dimensions(512, 512, t), Classification::WithinTarget);
    assert_eq!(classify_dimensions(64, 64, t), Classification::WithinTarget);
}

#[test]
fn size_token_in_name_skips_header_read() {
    let cfg = ResizeConfig::builder().target_size(TextureSize::S256).build();
    // the true size would make it LargerThanTarget
    let reader = FixedDimensions::new(&[("tower_512.tga", 2048, 2048)]);
    let class = classify_file(Path::new("/art/tower_512.tga"), &cfg, &reader).unwrap();
    assert_eq!(class, Some(Classification::Bucket(TextureBucket::AlreadySized)));
    assert!(contains_size_token("v1024_notes.png"));
    assert!(!contains_size_token("tower.tga"));
}

#[test]
fn extension_allow_list_is_case_insensitive() {
    let cfg = ResizeConfig::builder().target_size(TextureSize::S64).build();
    let reader = FixedDimensions::new(&[("FOO.TGA", 128, 128), ("foo.tga", 128, 128)]);
    for name in ["FOO.TGA", "foo.tga"] {
        let class = classify_file(&Path::new("/art").join(name), &cfg, &reader).unwrap();
        assert_eq!(
            class,
            Some(Classification::Bucket(TextureBucket::LargerThanTarget))
        );
    }
    let class = classify_file(Path::new("/art/foo.bmp"), &cfg, &reader).unwrap();
    assert_eq!(class, None);
}

#[test]
fn analyze_directory_partitions_files() {
    let cfg = ResizeConfig::builder().target_size(TextureSize::S512).build();
    let reader = FixedDimensions::new(&[
        ("big.tga", 2048, 2048),
        ("ok.png", 256, 256),
        ("odd.jpg", 300, 300),
        ("wide.tga", 1024, 512),
    ]);
    let listing = DirListing {
        dir: PathBuf::from("/art"),
        files: vec![
            "big.tga".into(),
            "notes.txt".into(),
            "odd.jpg".into(),
            "ok.png".into(),
            "rock_1024.tga".into(),
            "wide.tga".into(),
        ],
    };
    let mut report = ResizeReport::default();
    analyze_directory(&listing, &cfg, &reader, &mut report);
    assert_eq!(report.larger_than_target, vec![PathBuf::from("/art/big.tga")]);
    assert_eq!(report.already_sized, vec![PathBuf::from("/art/rock_1024.tga")]);
    assert_eq!(report.not_power_of_two, vec![PathBuf::from("/art/odd.jpg")]);
    assert_eq!(report.not_square, vec![PathBuf::from("/art/wide.tga")]);
    assert_eq!(report.within_target, vec![PathBuf::from("/art/ok.png")]);
    assert_eq!(report.total(), 5);
}

#[test]
fn scan_reads_headers_and_records_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_gray(&root.join("big.png"), 128, 128);
    write_gray(&root.join("small.png"), 64, 64);
    write_gray(&root.join("wide.png"), 128, 64);
    write_gray(&root.join("odd.png"), 100, 100);
    fs::write(root.join("broken.png"), b"not an image").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    write_gray(&root.join("sub").join("BIG2.PNG"), 256, 256);

    let cfg = ResizeConfig::builder().target_size(TextureSize::S64).build();
    let mut dirs_seen = 0;
    let report = scan_for_resize(root, &cfg, &HeaderReader, &CancelFlag::new(), |_| {
        dirs_seen += 1;
        DirAction::Scan
    })
    .expect("scan");

    assert_eq!(dirs_seen, 2);
    assert_eq!(
        report.larger_than_target,
        vec![root.join("big.png"), root.join("sub").join("BIG2.PNG")]
    );
    assert_eq!(report.within_target, vec![root.join("small.png")]);
    assert_eq!(report.not_square, vec![root.join("wide.png")]);
    assert_eq!(report.not_power_of_two, vec![root.join("odd.png")]);
    assert_eq!(report.unreadable.len(), 1);
    assert_eq!(report.unreadable[0].0, root.join("broken.png"));
}

#[test]
fn scan_rejects_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let cfg = ResizeConfig::default();
    let err = scan_for_resize(&missing, &cfg, &HeaderReader, &CancelFlag::new(), |_| DirAction::Scan);
    assert!(matches!(err, Err(TexBatchError::InvalidDirectory(p)) if p == missing));
}

#[test]
fn scan_stops_when_canceled() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("a")).unwrap();
    let cancel = CancelFlag::new();
    let c = cancel.clone();
    let res = scan_for_resize(dir.path(), &ResizeConfig::default(), &HeaderReader, &cancel, |_| {
        c.cancel();
        DirAction::Scan
    });
    assert!(matches!(res, Err(TexBatchError::Canceled)));
}

#[test]
fn skipped_directory_stays_out_of_report() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("cache")).unwrap();
    write_gray(&root.join("big.png"), 128, 128);
    write_gray(&root.join("cache").join("huge.png"), 256, 256);

    let cfg = ResizeConfig::builder().target_size(TextureSize::S64).build();
    let report = scan_for_resize(root, &cfg, &HeaderReader, &CancelFlag::new(), |l| {
        if l.dir == root.join("cache") {
            DirAction::Skip
        } else {
            DirAction::Scan
        }
    })
    .expect("scan");
    assert_eq!(report.larger_than_target, vec![root.join("big.png")]);
    assert_eq!(report.total(), 1);
}
