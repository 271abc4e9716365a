use dirtemplate::copy::{copy_dir, copy_file};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_copy_file() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("test-copy-file1");
    let dest = temp_dir.path().join("test-copy-file2");
    fs::write(&src, "test\ncopy\nfile\n").unwrap();

    copy_file(&src, &dest).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "test\ncopy\nfile\n");
}

#[test]
fn test_copy_file_missing_source() {
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("dest");

    assert!(copy_file(temp_dir.path().join("missing"), &dest).is_err());
    assert!(!dest.exists());
}

#[test]
fn test_copy_dir() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let dest = temp_dir.path().join("dest");
    fs::create_dir_all(src.join("child/empty")).unwrap();
    fs::write(src.join("child/1.txt"), "test\ncopy\ndir\n").unwrap();
    fs::write(src.join("top.txt"), "{{ not rendered }}").unwrap();

    copy_dir(&src, &dest).unwrap();

    assert_eq!(fs::read_to_string(dest.join("child/1.txt")).unwrap(), "test\ncopy\ndir\n");
    assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "{{ not rendered }}");
    assert!(dest.join("child/empty").is_dir());
    assert!(!dir_diff::is_different(&src, &dest).unwrap());
}

#[cfg(unix)]
#[test]
fn test_copy_preserves_modes() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let dest = temp_dir.path().join("dest");
    fs::create_dir_all(src.join("bin")).unwrap();
    fs::write(src.join("bin/run.sh"), "#!/bin/sh\n").unwrap();
    fs::write(src.join("secret.txt"), "s").unwrap();
    fs::set_permissions(src.join("bin/run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(src.join("secret.txt"), fs::Permissions::from_mode(0o600)).unwrap();
    fs::set_permissions(src.join("bin"), fs::Permissions::from_mode(0o750)).unwrap();

    copy_dir(&src, &dest).unwrap();

    let mode = |p: &std::path::Path| fs::metadata(p).unwrap().permissions().mode() & 0o7777;
    assert_eq!(mode(&dest.join("bin/run.sh")), 0o755);
    assert_eq!(mode(&dest.join("secret.txt")), 0o600);
    assert_eq!(mode(&dest.join("bin")), 0o750);
    assert_eq!(mode(&dest), mode(&src));
}

#[cfg(unix)]
#[test]
fn test_copy_dir_removes_destination_after_nested_failure() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let dest = temp_dir.path().join("dest");
    fs::create_dir_all(src.join("a/b")).unwrap();
    fs::write(src.join("a/ok.txt"), "ok").unwrap();
    fs::write(src.join("a/b/first.txt"), "first").unwrap();
    std::os::unix::fs::symlink(temp_dir.path().join("missing"), src.join("a/b/zz")).unwrap();

    assert!(copy_dir(&src, &dest).is_err());
    assert!(!dest.exists());
}
