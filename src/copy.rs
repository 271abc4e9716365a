//! Recursive copy of a template tree that keeps permission bits.

use log::{debug, warn};
use std::fs::{self, File};
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Copies a single file byte-for-byte and gives the copy the source's permissions.
///
/// If the permissions cannot be applied the partially written destination is
/// removed before the error is returned.
pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    if src.as_os_str().is_empty() {
        return Err(Error::EmptyPath { what: "Source file" });
    }
    if dest.as_os_str().is_empty() {
        return Err(Error::EmptyPath { what: "Destination file" });
    }

    let mut src_file = File::open(src).map_err(Error::io("open source file", src))?;
    let permissions = src_file
        .metadata()
        .map_err(Error::io("read metadata of", src))?
        .permissions();

    let mut dest_file = File::create(dest).map_err(Error::io("create destination file", dest))?;
    io::copy(&mut src_file, &mut dest_file).map_err(Error::io("copy file to", dest))?;
    drop(dest_file);

    if let Err(e) = fs::set_permissions(dest, permissions) {
        let _ = fs::remove_file(dest);
        return Err(Error::Io { op: "copy file mode to", path: dest.to_path_buf(), source: e });
    }

    debug!("Copied file '{}' to '{}'", src.display(), dest.display());
    Ok(())
}

/// Recursively copies a directory, preserving the permission bits of every
/// file and directory.
///
/// On failure the destination tree is removed (best-effort) when this call
/// created it. An already existing destination directory is left in place.
pub fn copy_dir<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()> {
    let (src, dest) = (src.as_ref(), dest.as_ref());
    if src.as_os_str().is_empty() {
        return Err(Error::EmptyPath { what: "Source directory" });
    }
    if dest.as_os_str().is_empty() {
        return Err(Error::EmptyPath { what: "Destination directory" });
    }

    let dest_existed = fs::symlink_metadata(dest).is_ok();
    let result = copy_dir_recursive(src, dest);
    if result.is_err() && !dest_existed {
        if let Err(e) = fs::remove_dir_all(dest) {
            warn!("Cannot clean up '{}' after failed copy: {}", dest.display(), e);
        }
    }
    result
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    let permissions = fs::metadata(src)
        .map_err(Error::io("read metadata of source directory", src))?
        .permissions();
    let entries = fs::read_dir(src).map_err(Error::io("read source directory", src))?;

    fs::create_dir_all(dest).map_err(Error::io("create destination directory", dest))?;

    for entry in entries {
        let entry = entry.map_err(Error::io("read source directory", src))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        // Symlinks are followed so the copy holds the linked content.
        let metadata =
            fs::metadata(&src_path).map_err(Error::io("read metadata of", &src_path))?;
        if metadata.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            copy_file(&src_path, &dest_path)?;
        }
    }

    // Applied last so read-only directories still receive their children.
    fs::set_permissions(dest, permissions).map_err(Error::io("copy directory mode to", dest))?;
    debug!("Copied directory '{}' to '{}'", src.display(), dest.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_file_rejects_empty_paths() {
        assert!(matches!(copy_file("", "dest"), Err(Error::EmptyPath { .. })));
        assert!(matches!(copy_file("src", ""), Err(Error::EmptyPath { .. })));
        assert!(matches!(copy_dir("", "dest"), Err(Error::EmptyPath { .. })));
        assert!(matches!(copy_dir("src", ""), Err(Error::EmptyPath { .. })));
    }

    #[test]
    fn test_copy_dir_cleans_up_created_destination() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dest");

        let result = copy_dir(temp_dir.path().join("missing"), &dest);
        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_copy_dir_keeps_existing_destination_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let dest = temp_dir.path().join("dest");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "keep").unwrap();

        assert!(copy_dir(temp_dir.path().join("missing"), &dest).is_err());
        assert_eq!(fs::read_to_string(dest.join("keep.txt")).unwrap(), "keep");
    }
}
