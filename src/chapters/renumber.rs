//! Chapter folder renumbering.
//!
//! Folder names like `第二十九话 重逢` carry their order in a Chinese
//! numeral. Prefixing each with a zero-padded sequence number makes plain
//! filename sorting agree with reading order: `05 第二十九话 重逢`.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use regex::Regex;

use crate::chapters::numerals::chinese_to_arabic;
use crate::{debug, log};

/// `第<numeral>条` or `第<numeral>话` chapter markers.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"第(.*?)[条话]").unwrap());

/// Folders already carrying a numeric prefix.
static PREFIXED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\s").unwrap());

struct ChapterFolder {
    name: String,
    number: u64,
}

/// Prefix every chapter subfolder of `dir` with its sequence number.
///
/// Returns the number of folders that failed to rename. Folders without a
/// recognizable marker, with an unconvertible numeral, or already prefixed
/// are skipped with a warning and do not count as failures.
pub fn renumber_chapters(dir: &Path) -> Result<usize> {
    let mut folders = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?
    {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();

        if PREFIXED_RE.is_match(&name) {
            debug!("chapters"; "already numbered, skipping '{name}'");
            continue;
        }

        let Some(caps) = MARKER_RE.captures(&name) else {
            log!("chapters"; "no chapter marker in '{name}', skipping");
            continue;
        };
        let Some(number) = chinese_to_arabic(&caps[1]) else {
            log!("chapters"; "cannot read numeral '{}' in '{name}', skipping", &caps[1]);
            continue;
        };

        folders.push(ChapterFolder { name, number });
    }

    if folders.is_empty() {
        log!("chapters"; "nothing to renumber in {}", dir.display());
        return Ok(0);
    }

    folders.sort_by_key(|f| f.number);
    let width = folders.len().to_string().len();

    log!("chapters"; "renumbering {} folders (width {width})", folders.len());

    let mut failures = 0;
    for (index, folder) in folders.iter().enumerate() {
        let new_name = format!("{:0width$} {}", index + 1, folder.name);
        let target = dir.join(&new_name);
        if target.exists() {
            log!("chapters"; "target '{new_name}' already exists, skipping");
            continue;
        }
        match fs::rename(dir.join(&folder.name), &target) {
            Ok(()) => log!("chapters"; "{} {} -> {new_name}", "✓".green(), folder.name),
            Err(e) => {
                log!("chapters"; "{} {}: {e}", "✗".red(), folder.name);
                failures += 1;
            }
        }
    }

    Ok(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_dirs(root: &Path, names: &[&str]) {
        for name in names {
            fs::create_dir(root.join(name)).unwrap();
        }
    }

    fn dir_names(root: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn folders_are_prefixed_in_numeral_order() {
        let root = tempfile::tempdir().unwrap();
        make_dirs(
            root.path(),
            &["第二十九话 重逢", "第三话 出发", "第一话 开始"],
        );

        let failures = renumber_chapters(root.path()).unwrap();
        assert_eq!(failures, 0);
        assert_eq!(
            dir_names(root.path()),
            vec!["1 第一话 开始", "2 第三话 出发", "3 第二十九话 重逢"]
        );
    }

    #[test]
    fn width_grows_with_count() {
        let root = tempfile::tempdir().unwrap();
        let names: Vec<String> = (1..=10).map(|i| format!("第{i}话")).collect();
        make_dirs(root.path(), &names.iter().map(String::as_str).collect::<Vec<_>>());

        renumber_chapters(root.path()).unwrap();
        let renamed = dir_names(root.path());
        assert!(renamed.contains(&"01 第1话".to_string()));
        assert!(renamed.contains(&"10 第10话".to_string()));
    }

    #[test]
    fn unrecognized_and_prefixed_folders_are_left_alone() {
        let root = tempfile::tempdir().unwrap();
        make_dirs(root.path(), &["第一话 开始", "07 第七话 旧", "extras"]);

        renumber_chapters(root.path()).unwrap();
        let renamed = dir_names(root.path());
        assert!(renamed.contains(&"1 第一话 开始".to_string()));
        assert!(renamed.contains(&"07 第七话 旧".to_string()));
        assert!(renamed.contains(&"extras".to_string()));
    }

    #[test]
    fn files_are_ignored() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("第一话.txt"), b"x").unwrap();
        assert_eq!(renumber_chapters(root.path()).unwrap(), 0);
        assert_eq!(dir_names(root.path()), vec!["第一话.txt"]);
    }
}
