//! EPUB to CBZ conversion.
//!
//! Comic EPUBs are image galleries wrapped in XHTML: every spine document
//! holds one (occasionally several) page images. The conversion reads the
//! spine order from the package document, pulls the referenced images
//! straight out of the EPUB zip and repacks them into a CBZ with
//! zero-padded sequential names, cover first. No temporary extraction.

pub mod opf;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::{debug, log};

static IMG_SRC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<img\s+[^>]*src\s*=\s*["']([^"']+)["']"#).unwrap());

/// SVG page wrappers (`<image xlink:href="…">`), the other common shape of
/// fixed-layout manga EPUBs.
static IMAGE_HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<image\s+[^>]*href\s*=\s*["']([^"']+)["']"#).unwrap());

const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Convert one EPUB to a CBZ. Returns the written path.
pub fn epub_to_cbz(epub_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let file = File::open(epub_path)
        .with_context(|| format!("failed to open '{}'", epub_path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("'{}' is not a zip archive", epub_path.display()))?;

    let names: HashSet<String> = archive.file_names().map(String::from).collect();

    // Tolerate archives with an extra top-level folder above META-INF.
    let container_name = names
        .iter()
        .find(|n| n.as_str() == "META-INF/container.xml" || n.ends_with("/META-INF/container.xml"))
        .cloned()
        .context("no META-INF/container.xml, not an EPUB")?;
    let root_prefix = container_name
        .strip_suffix("META-INF/container.xml")
        .unwrap_or("")
        .to_string();

    let container_xml = read_entry_string(&mut archive, &container_name)?;
    let opf_path = format!("{root_prefix}{}", opf::rootfile_path(&container_xml)?);
    let opf_dir = parent_dir(&opf_path);

    let opf_xml = read_entry_string(&mut archive, &opf_path)
        .with_context(|| format!("missing package document '{opf_path}'"))?;
    let package = opf::parse_package(&opf_xml)?;

    // Cover first, then spine-ordered page images, deduplicated.
    let mut ordered: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if let Some(cover) = package.cover() {
        let cover_path = resolve_zip_path(&opf_dir, &cover.href);
        if names.contains(&cover_path) {
            seen.insert(cover_path.clone());
            ordered.push(cover_path);
        }
    }

    for idref in &package.spine {
        let Some(item) = package.item(idref) else {
            continue;
        };
        if item.media_type != XHTML_MEDIA_TYPE {
            continue;
        }

        let doc_path = resolve_zip_path(&opf_dir, &item.href);
        let Ok(content) = read_entry_string(&mut archive, &doc_path) else {
            debug!("cbz"; "spine document '{doc_path}' missing, skipping");
            continue;
        };

        let doc_dir = parent_dir(&doc_path);
        for href in image_refs(&content) {
            let candidates = [
                resolve_zip_path(&doc_dir, &href),
                resolve_zip_path(&opf_dir, &href),
                resolve_zip_path(root_prefix.trim_end_matches('/'), &href),
            ];
            match candidates.iter().find(|c| names.contains(*c)) {
                Some(found) => {
                    if seen.insert(found.clone()) {
                        ordered.push(found.clone());
                    }
                }
                None => debug!("cbz"; "image '{href}' not found in archive"),
            }
        }
    }

    if ordered.is_empty() {
        bail!("no page images found in '{}'", epub_path.display());
    }

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => epub_path.with_extension("cbz"),
    };
    write_cbz(&mut archive, &ordered, &out_path)?;

    log!("cbz"; "{} pages -> {}", ordered.len(), out_path.display());
    Ok(out_path)
}

fn write_cbz(
    archive: &mut ZipArchive<BufReader<File>>,
    pages: &[String],
    out_path: &Path,
) -> Result<()> {
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create '{}'", out_path.display()))?;
    let mut writer = ZipWriter::new(BufWriter::new(out_file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (index, page) in pages.iter().enumerate() {
        let mut data = Vec::new();
        archive
            .by_name(page)?
            .read_to_end(&mut data)
            .with_context(|| format!("failed to read '{page}'"))?;

        let name = format!("{index:05}{}", extension_of(page));
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }

    writer.finish()?;
    Ok(())
}

/// Image references of a spine document in source order.
fn image_refs(content: &str) -> Vec<String> {
    let mut refs: Vec<(usize, String)> = IMG_SRC_RE
        .captures_iter(content)
        .chain(IMAGE_HREF_RE.captures_iter(content))
        .map(|caps| {
            let m = caps.get(1).unwrap();
            (m.start(), m.as_str().to_string())
        })
        .collect();
    refs.sort_by_key(|(pos, _)| *pos);
    refs.into_iter().map(|(_, href)| href).collect()
}

fn read_entry_string<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String> {
    let mut content = String::new();
    archive
        .by_name(name)?
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read '{name}'"))?;
    Ok(content)
}

/// Directory part of a zip entry name, without trailing slash.
fn parent_dir(entry: &str) -> String {
    entry.rsplit_once('/').map_or(String::new(), |(dir, _)| dir.to_string())
}

/// Join an href to a base directory inside the archive, folding `.` and
/// `..` segments.
fn resolve_zip_path(base_dir: &str, href: &str) -> String {
    let mut segments: Vec<&str> = if href.starts_with('/') {
        Vec::new()
    } else {
        base_dir.split('/').filter(|s| !s.is_empty()).collect()
    };

    for segment in href.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// File extension with its dot, as written in the archive.
fn extension_of(entry: &str) -> &str {
    entry
        .rsplit('/')
        .next()
        .and_then(|name| name.rfind('.').map(|i| &name[i..]))
        .unwrap_or("")
}
