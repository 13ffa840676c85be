use std::fs;
use tex_batch_core::error::TexBatchError;
use tex_batch_core::has_allowed_extension;
use tex_batch_core::prelude::*;

#[test]
fn walk_lists_each_directory_top_down() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("b").join("deep")).unwrap();
    fs::create_dir(root.join("a")).unwrap();
    fs::write(root.join("z.tga"), b"").unwrap();
    fs::write(root.join("m.png"), b"").unwrap();
    fs::write(root.join("b").join("deep").join("x.jpg"), b"").unwrap();

    let listings: Vec<DirListing> = walk_texture_dirs(root).expect("walk").collect();
    let dirs: Vec<_> = listings.iter().map(|l| l.dir.clone()).collect();
    assert_eq!(
        dirs,
        vec![
            root.to_path_buf(),
            root.join("a"),
            root.join("b"),
            root.join("b").join("deep"),
        ]
    );
    assert_eq!(listings[0].files, vec!["m.png", "z.tga"]);
    assert!(listings[1].files.is_empty());
    assert_eq!(listings[3].files, vec!["x.jpg"]);
}

#[test]
fn walk_rejects_files_and_missing_paths() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("f.tga");
    fs::write(&file, b"").unwrap();
    assert!(matches!(
        walk_texture_dirs(&file),
        Err(TexBatchError::InvalidDirectory(_))
    ));
    assert!(matches!(
        walk_texture_dirs(dir.path().join("missing")),
        Err(TexBatchError::InvalidDirectory(_))
    ));
}

#[test]
fn allowed_extension_ignores_case() {
    let exts = [".tga", ".png", ".jpg"];
    assert!(has_allowed_extension("FOO.TGA", &exts));
    assert!(has_allowed_extension("foo.tga", &exts));
    assert!(has_allowed_extension("a.Jpg", &exts));
    assert!(!has_allowed_extension("a.jpeg", &exts));
    assert!(!has_allowed_extension("tga", &exts));
}

#[cfg(unix)]
#[test]
fn walk_lists_symlinked_files_but_not_symlinked_dirs() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let shared = root.join("shared");
    fs::create_dir(&shared).unwrap();
    fs::write(shared.join("base.tga"), b"").unwrap();
    fs::create_dir(root.join("wall")).unwrap();
    symlink(shared.join("base.tga"), root.join("wall").join("wall_d.tga")).unwrap();
    symlink(root.join("missing.tga"), root.join("wall").join("dangling.tga")).unwrap();
    symlink(&shared, root.join("wall").join("linked")).unwrap();

    let listings: Vec<DirListing> = walk_texture_dirs(root).expect("walk").collect();
    let dirs: Vec<_> = listings.iter().map(|l| l.dir.clone()).collect();
    assert_eq!(dirs, vec![root.to_path_buf(), shared.clone(), root.join("wall")]);
    assert_eq!(listings[2].files, vec!["wall_d.tga"]);
}
