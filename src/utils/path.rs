//! Path resolution utilities.
//!
//! Input paths come straight from the command line and may carry a leading
//! tilde; output directories are always siblings of the input named
//! `<basename>_<suffix>`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Expand `~` and normalize a user-supplied path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`). Falls back to
/// joining with the current directory when the path does not exist yet.
pub fn resolve_input(path: &Path) -> PathBuf {
    let expanded: PathBuf = shellexpand::tilde(&path.to_string_lossy())
        .into_owned()
        .into();

    expanded.canonicalize().unwrap_or_else(|_| {
        if expanded.is_absolute() {
            expanded.clone()
        } else {
            std::env::current_dir().map_or_else(|_| expanded.clone(), |cwd| cwd.join(&expanded))
        }
    })
}

/// Resolve a user-supplied path and require it to be an existing directory.
pub fn resolve_dir(path: &Path) -> Result<PathBuf> {
    let resolved = resolve_input(path);
    if !resolved.is_dir() {
        bail!("'{}' is not a directory", resolved.display());
    }
    Ok(resolved)
}

/// Sibling output directory: `<parent>/<basename>_<suffix>`.
pub fn sibling_dir(source: &Path, suffix: &str) -> Result<PathBuf> {
    let name = file_name(source)?;
    let parent = source.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!("{name}_{suffix}")))
}

/// Final path component as UTF-8.
pub fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("'{}' has no usable file name", path.display()))
}

/// Case-insensitive extension test against a lowercase list.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_dir_appends_suffix() {
        let out = sibling_dir(Path::new("/data/vol1"), "formatted").unwrap();
        assert_eq!(out, PathBuf::from("/data/vol1_formatted"));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(has_extension(Path::new("a.XHTML"), &["xhtml", "html"]));
        assert!(has_extension(Path::new("b.Jpg"), &["jpg"]));
        assert!(!has_extension(Path::new("c.txt"), &["xhtml"]));
        assert!(!has_extension(Path::new("noext"), &["xhtml"]));
    }

    #[test]
    fn resolve_input_makes_absolute() {
        assert!(resolve_input(Path::new("some/relative/file")).is_absolute());
    }
}
