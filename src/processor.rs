//! In-place rendering of a copied template tree.

use log::debug;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    paths::{relative_key, SkipPaths},
    renderer::TemplateRenderer,
};

/// Renders every file below a root in place.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    context: &'a serde_json::Value,
    skip_paths: &'a SkipPaths,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        context: &'a serde_json::Value,
        skip_paths: &'a SkipPaths,
    ) -> Self {
        Self { renderer, context, skip_paths }
    }

    /// Renders `root`: every non-skipped file of a directory tree, or the file
    /// itself when `root` is a file.
    ///
    /// Walks depth-first in file-name order and stops at the first failure.
    /// Files rendered before the failure keep their new content. Returns the
    /// number of rendered files.
    pub fn render_tree<P: AsRef<Path>>(&self, root: P) -> Result<usize> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(Error::io("read metadata of", root))?;
        if !metadata.is_dir() {
            self.render_file(root)?;
            return Ok(1);
        }

        let mut rendered = 0;
        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_skipped(root, entry.path()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                Error::Io { op: "walk directory", path, source: e.into() }
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            self.render_file(entry.path())?;
            rendered += 1;
        }
        Ok(rendered)
    }

    fn is_skipped(&self, root: &Path, path: &Path) -> bool {
        match relative_key(root, path) {
            Some(key) if self.skip_paths.is_skipped(&key) => {
                debug!("Skipping '{}' from rendering", key);
                true
            }
            _ => false,
        }
    }

    /// Renders a single file against the context and overwrites it.
    ///
    /// The file is only truncated once the template parsed and executed
    /// successfully, so a broken template leaves the copied content intact.
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_error =
            |e: Error| Error::RenderFileError { path: path.to_path_buf(), source: Box::new(e) };

        let content = fs::read_to_string(path).map_err(Error::io("read template file", path))?;
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let rendered = self
            .renderer
            .render_named(&name, &content, self.context)
            .map_err(file_error)?;
        fs::write(path, rendered).map_err(Error::io("write rendered file", path))?;

        debug!("Rendered file '{}'", path.display());
        Ok(())
    }
}
