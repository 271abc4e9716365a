//! tar.gz archives of generated output.
//! Not part of the generation pipeline; callers use it after a successful run.

use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use std::fs::{self, File, Metadata};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::paths::relative_key;

/// Writes a gzip-compressed tar archive of `source` to `archive_path`.
///
/// For a directory every regular file is stored under its '/'-separated path
/// relative to `source`; a single file is stored under its base name. Each
/// entry header carries the file's size, permission mode and modification
/// time.
pub fn create_archive<P: AsRef<Path>, Q: AsRef<Path>>(source: P, archive_path: Q) -> Result<()> {
    let (source, archive_path) = (source.as_ref(), archive_path.as_ref());
    let archive_error = |reason: String| Error::ArchiveError {
        path: archive_path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(source).map_err(Error::io("read metadata of", source))?;
    let file = File::create(archive_path).map_err(Error::io("create archive", archive_path))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    if metadata.is_dir() {
        let root = fs::canonicalize(source).map_err(Error::io("resolve", source))?;
        let own_archive: Option<PathBuf> = fs::canonicalize(archive_path).ok();

        for entry in WalkDir::new(&root).min_depth(1).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| archive_error(e.to_string()))?;
            if !entry.file_type().is_file() || Some(entry.path()) == own_archive.as_deref() {
                continue;
            }
            let name = relative_key(&root, entry.path()).ok_or_else(|| {
                archive_error(format!("'{}' escapes the root", entry.path().display()))
            })?;
            let entry_metadata = entry.metadata().map_err(|e| archive_error(e.to_string()))?;
            append_file(&mut builder, entry.path(), &name, &entry_metadata)?;
        }
    } else {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| archive_error(format!("'{}' has no file name", source.display())))?;
        append_file(&mut builder, source, &name, &metadata)?;
    }

    builder
        .into_inner()
        .and_then(|encoder| encoder.finish())
        .map_err(|e| archive_error(e.to_string()))?;

    debug!("Archived '{}' into '{}'", source.display(), archive_path.display());
    Ok(())
}

fn append_file<W: std::io::Write>(
    builder: &mut tar::Builder<W>,
    path: &Path,
    name: &str,
    metadata: &Metadata,
) -> Result<()> {
    let file = File::open(path).map_err(Error::io("open file for archiving", path))?;

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(metadata.len());
    header.set_mode(file_mode(metadata));
    header.set_mtime(
        metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs())
            .unwrap_or_default(),
    );

    builder
        .append_data(&mut header, name, file)
        .map_err(Error::io("append archive entry for", path))?;
    debug!("Archived entry '{}'", name);
    Ok(())
}

#[cfg(unix)]
fn file_mode(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o644
    }
}
