//! Execution of a template directory: copy, rename, render.

use log::{debug, info};
use std::fs;
use std::path::Path;

use crate::{
    config::Config,
    copy::{copy_dir, copy_file},
    error::{Error, Result},
    paths::{apply_renames, resolve_rename_rules, SkipPaths},
    processor::Processor,
    renderer::{MiniJinjaRenderer, TemplateRenderer},
};

/// A text template applied to a whole directory tree.
///
/// [`DirTemplate::execute`] runs four phases in order and stops at the first
/// error:
/// 1. preflight: the destination must not exist and the source must
/// 2. copy: the source tree is copied with its permission bits
/// 3. rename: rename rules are rendered and applied under the destination
/// 4. render: every non-skipped file is rendered in place
///
/// Success is all-or-nothing; the disk state after a failure is not. Files
/// copied, moved or rendered before the error stay as they are.
pub struct DirTemplate {
    config: Config,
}

impl DirTemplate {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Generates the destination tree from the source tree.
    pub fn execute(&self) -> Result<()> {
        let renderer = MiniJinjaRenderer::from_config(&self.config)?;
        self.execute_with(&renderer)
    }

    /// Like [`DirTemplate::execute`], with a caller-provided renderer. The
    /// configured delimiters and functions are not applied to it.
    pub fn execute_with(&self, renderer: &dyn TemplateRenderer) -> Result<()> {
        let Config { source, destination, .. } = &self.config;

        let source_is_dir = self.preflight()?;
        info!("Copying '{}' to '{}'", source.display(), destination.display());
        if source_is_dir {
            copy_dir(source, destination)?;
        } else {
            copy_file(source, destination)?;
        }

        info!("Applying rename rules");
        let moves = self.rename_paths(renderer)?;

        info!("Rendering templates in '{}'", destination.display());
        let skip_paths = SkipPaths::new(&self.config.skip_paths).follow_moves(&moves);
        let rendered =
            Processor::new(renderer, &self.config.data, &skip_paths).render_tree(destination)?;

        info!("Rendered {} file(s) into '{}'", rendered, destination.display());
        Ok(())
    }

    /// Validates paths before anything is written. Returns whether the source
    /// is a directory.
    fn preflight(&self) -> Result<bool> {
        let Config { source, destination, .. } = &self.config;
        if source.as_os_str().is_empty() {
            return Err(Error::EmptyPath { what: "Source" });
        }
        if destination.as_os_str().is_empty() {
            return Err(Error::EmptyPath { what: "Destination" });
        }
        ensure_destination_absent(destination)?;

        let metadata = fs::metadata(source)
            .map_err(|e| Error::SourceNotFound { path: source.clone(), source: e })?;
        Ok(metadata.is_dir())
    }

    /// Returns the moves made, relative to the destination root.
    fn rename_paths(&self, renderer: &dyn TemplateRenderer) -> Result<Vec<(String, String)>> {
        let pairs = resolve_rename_rules(renderer, &self.config.rename_paths, &self.config.data)?;
        let moves = apply_renames(&self.config.destination, &pairs)?;
        debug!("Applied {} of {} rename rule(s)", moves.len(), pairs.len());
        Ok(moves)
    }
}

/// Fails if anything, including a dangling symlink, exists at `destination`.
pub fn ensure_destination_absent<P: AsRef<Path>>(destination: P) -> Result<()> {
    let destination = destination.as_ref();
    if fs::symlink_metadata(destination).is_ok() {
        return Err(Error::DestinationExists { path: destination.to_path_buf() });
    }
    Ok(())
}
