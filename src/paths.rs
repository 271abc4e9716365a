//! Placeholder-driven path handling: rename rules and skip paths.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path};

use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// A rename rule after both sides went through the template engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    /// Key of the rule as written, kept for diagnostics.
    pub rule: String,
    pub from: String,
    pub to: String,
}

/// Renders both sides of every rename rule against `context`.
///
/// The first rule that fails to render aborts resolution; the error names the
/// rule's original key. Pairs are returned sorted by their original key; the
/// order carries no meaning beyond reproducible logs.
pub fn resolve_rename_rules(
    renderer: &dyn TemplateRenderer,
    rules: &HashMap<String, String>,
    context: &serde_json::Value,
) -> Result<Vec<RenamePair>> {
    let mut keys: Vec<&String> = rules.keys().collect();
    keys.sort();

    let mut pairs = Vec::with_capacity(keys.len());
    for key in keys {
        let rule_error =
            |e: Error| Error::RenameRuleError { rule: key.clone(), source: Box::new(e) };
        let from = renderer.render(key, context).map_err(rule_error)?;
        let to = renderer.render(&rules[key], context).map_err(rule_error)?;
        debug!("Rename rule '{}' resolved to '{}' -> '{}'", key, from, to);
        pairs.push(RenamePair { rule: key.clone(), from, to });
    }
    Ok(pairs)
}

/// Checks that a rendered path is a non-empty relative path that stays inside
/// the root it is joined to.
pub fn is_rendered_path_valid(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Moves every applicable rename pair under `root`.
///
/// The source is the rendered key; when nothing exists there the key is tried
/// literally, so `app/{{ Name }}.go` in the template tree is found too. A pair
/// whose source exists under neither name (or rendered to an empty string) is
/// not applicable and is skipped silently. Missing parent directories of the
/// target are created. An occupied target aborts the operation.
///
/// Returns the moves that were made as `(from, to)` paths relative to `root`.
pub fn apply_renames<P: AsRef<Path>>(
    root: P,
    pairs: &[RenamePair],
) -> Result<Vec<(String, String)>> {
    let root = root.as_ref();
    let mut moved = Vec::new();

    for pair in pairs {
        if pair.from.trim().is_empty() {
            debug!("Skipping rename rule '{}': source rendered empty", pair.rule);
            continue;
        }
        for rendered in [&pair.from, &pair.to] {
            if !is_rendered_path_valid(rendered) {
                return Err(Error::InvalidRenderedPath {
                    rule: pair.rule.clone(),
                    path: rendered.clone(),
                });
            }
        }

        let Some(from_relative) = existing_source(root, pair) else {
            debug!("Skipping rename rule '{}': '{}' does not exist", pair.rule, pair.from);
            continue;
        };
        let from = root.join(from_relative);
        let to = root.join(&pair.to);
        if from == to {
            continue;
        }
        move_path(&from, &to)?;
        moved.push((from_relative.to_string(), pair.to.clone()));
    }
    Ok(moved)
}

/// The rendered source path, or the rule key taken literally when only the
/// template tree itself carries the placeholder in its file name.
fn existing_source<'p>(root: &Path, pair: &'p RenamePair) -> Option<&'p str> {
    if fs::symlink_metadata(root.join(&pair.from)).is_ok() {
        return Some(&pair.from);
    }
    if pair.rule != pair.from
        && is_rendered_path_valid(&pair.rule)
        && fs::symlink_metadata(root.join(&pair.rule)).is_ok()
    {
        return Some(&pair.rule);
    }
    None
}

fn move_path(from: &Path, to: &Path) -> Result<()> {
    let rename_error = |reason: String| Error::RenameError {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        reason,
    };

    if fs::symlink_metadata(to).is_ok() {
        return Err(rename_error("target already exists".to_string()));
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| rename_error(e.to_string()))?;
    }
    fs::rename(from, to).map_err(|e| rename_error(e.to_string()))?;

    debug!("Moved '{}' to '{}'", from.display(), to.display());
    Ok(())
}

/// Exact-match lookup of paths excluded from rendering.
///
/// Skip entries are relative to the template root; trailing slashes are
/// ignored. There is no glob or prefix matching; a skipped directory is
/// simply never descended into by the tree walk. Entries moved by rename
/// rules are followed with [`SkipPaths::follow_moves`].
#[derive(Debug, Clone, Default)]
pub struct SkipPaths {
    paths: Vec<String>,
}

impl SkipPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = paths
            .into_iter()
            .map(|p| p.as_ref().trim_end_matches('/').to_string())
            .collect();
        Self { paths }
    }

    /// Adds the new location of every entry that was moved, or that lies
    /// inside a moved directory. Original entries are kept.
    pub fn follow_moves(mut self, moves: &[(String, String)]) -> Self {
        let mut followed = Vec::new();
        for skip in &self.paths {
            let mut current = skip.clone();
            for (from, to) in moves {
                if let Some(moved) = moved_path(&current, from, to) {
                    debug!("Skip path '{}' follows rename to '{}'", skip, moved);
                    current = moved;
                }
            }
            if &current != skip {
                followed.push(current);
            }
        }
        self.paths.extend(followed);
        self
    }

    /// `relative` is the '/'-joined path of an entry below the root.
    pub fn is_skipped(&self, relative: &str) -> bool {
        self.paths.iter().any(|p| p == relative)
    }
}

/// Location of `path` after `from` was moved to `to`, if the move affected it.
fn moved_path(path: &str, from: &str, to: &str) -> Option<String> {
    let from = from.trim_end_matches('/');
    let to = to.trim_end_matches('/');
    if path == from {
        return Some(to.to_string());
    }
    path.strip_prefix(from)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| format!("{to}/{rest}"))
}

/// Joins the components of `path` below `root` with '/'.
pub fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
