//! Volume splitting.
//!
//! A scanned volume arrives as one flat folder of page images plus a
//! hand-written contents listing mapping chapter titles to printed start
//! pages. Pages after the table-of-contents image are dealt out to chapter
//! folders whose sizes come from consecutive start-page differences.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

use crate::config::SortOrder;
use crate::utils::path::sibling_dir;
use crate::{batch, log};

/// Image formats volumes are scanned to. AVIF appears in the wild; it is
/// only copied here, never decoded.
const PAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "avif", "webp"];

/// Numbered chapter line: `"<n> <title> <page>"`.
static NUMBERED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(\D+?)\s+(\d+)$").unwrap());

/// Bare chapter line: `"<title> <page>"`.
static BARE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+?)\s+(\d+)$").unwrap());

static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

#[derive(Debug, PartialEq, Eq)]
pub struct ChapterEntry {
    pub title: String,
    pub start_page: u64,
}

/// Parse the contents listing. Unparseable lines are ignored; entries come
/// back sorted by start page.
pub fn parse_contents(text: &str) -> Vec<ChapterEntry> {
    let mut chapters = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = NUMBERED_LINE_RE.captures(line) {
            chapters.push(ChapterEntry {
                title: format!("{} {}", &caps[1], caps[2].trim()),
                start_page: caps[3].parse().unwrap_or(0),
            });
        } else if let Some(caps) = BARE_LINE_RE.captures(line) {
            chapters.push(ChapterEntry {
                title: caps[1].trim().to_string(),
                start_page: caps[2].parse().unwrap_or(0),
            });
        }
    }

    chapters.sort_by_key(|c| c.start_page);
    chapters
}

/// Order pages by the last digit run in the stem (`page_12.jpg` → 12).
fn page_number(path: &Path) -> u64 {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    DIGIT_RUN_RE
        .find_iter(&stem)
        .last()
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Page counts per chapter: consecutive start-page differences, with the
/// last chapter taking every remaining page.
fn chapter_counts(chapters: &[ChapterEntry], available: usize) -> Vec<usize> {
    let mut counts: Vec<usize> = chapters
        .windows(2)
        .map(|pair| (pair[1].start_page.saturating_sub(pair[0].start_page)) as usize)
        .collect();
    let used: usize = counts.iter().sum();
    counts.push(available.saturating_sub(used));
    counts
}

/// Split a volume folder into per-chapter folders.
pub fn split_volume(input_dir: &Path, toc_page: &str, contents_file: &Path) -> Result<()> {
    let listing = fs::read_to_string(contents_file)
        .with_context(|| format!("failed to read '{}'", contents_file.display()))?;
    let chapters = parse_contents(&listing);
    if chapters.is_empty() {
        bail!(
            "no chapter entries found in '{}'",
            contents_file.display()
        );
    }

    let mut pages = batch::collect_files(input_dir, &PAGE_EXTENSIONS, SortOrder::Lexicographic)?;
    pages.sort_by_key(|p| page_number(p));

    let toc_index = pages
        .iter()
        .position(|p| p.file_name().is_some_and(|n| n == toc_page))
        .with_context(|| format!("table-of-contents page '{toc_page}' not found"))?;

    let first_content = toc_index + 1;
    let counts = chapter_counts(&chapters, pages.len() - first_content);

    let output_dir = sibling_dir(input_dir, "split")?;
    fs::create_dir_all(&output_dir)?;
    log!("chapters"; "splitting {} chapters into {}", chapters.len(), output_dir.display());

    let mut current = first_content;
    for (chapter, count) in chapters.iter().zip(counts.iter()) {
        let chapter_dir = output_dir.join(&chapter.title);
        fs::create_dir_all(&chapter_dir)?;

        let mut copied = 0;
        for _ in 0..*count {
            let Some(page) = pages.get(current) else {
                log!("chapters"; "'{}' expected {count} pages, only {copied} available", chapter.title);
                break;
            };
            let name: PathBuf = page.file_name().map(PathBuf::from).unwrap_or_default();
            fs::copy(page, chapter_dir.join(name))
                .with_context(|| format!("failed to copy '{}'", page.display()))?;
            current += 1;
            copied += 1;
        }
        log!("chapters"; "[{}] {} pages", chapter.title, copied);
    }

    Ok(())
}
