//! `format` command: batch XHTML canonicalization.

use std::fs;

use anyhow::{Context, Result};

use crate::batch;
use crate::cli::FormatArgs;
use crate::config::ToolConfig;
use crate::format::{FormatOptions, SkipPatterns, XhtmlFormatter};
use crate::utils::path::{file_name, resolve_dir, sibling_dir};
use crate::{debug, log};

/// Input extensions handled by the formatter.
const FORMAT_EXTENSIONS: [&str; 3] = ["xhtml", "html", "xml"];

pub fn run(args: &FormatArgs, config: &ToolConfig) -> Result<usize> {
    let source = resolve_dir(&args.source_dir)?;
    let section = &config.format;

    let skip_patterns = if args.no_skip {
        SkipPatterns::none()
    } else {
        SkipPatterns::compile(&section.skip_titles)?
    };
    let formatter = XhtmlFormatter::new(FormatOptions {
        indent: args.indent.unwrap_or(section.indent),
        curate_head: section.curate_head && !args.keep_head,
        update_title: section.update_title && !args.no_title_update,
        skip_patterns,
    });

    let sort = args.sort.unwrap_or(section.sort);
    let files = batch::collect_files(&source, &FORMAT_EXTENSIONS, sort)?;

    let output_dir = sibling_dir(&source, "formatted")?;
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create '{}'", output_dir.display()))?;

    log!("format"; "scanning {}", source.display());
    log!("format"; "writing to {}", output_dir.display());
    log!("format"; "{} files found", files.len());

    let outcome = batch::run_batch("format", &files, |file| {
        let input = fs::read_to_string(file)
            .with_context(|| format!("failed to read '{}'", file.display()))?;
        let result = formatter.format(&input)?;
        if result.body_skipped {
            debug!("format"; "body layout kept: {}", file_name(file)?);
        }
        let target = output_dir.join(file_name(file)?);
        fs::write(&target, result.content)
            .with_context(|| format!("failed to write '{}'", target.display()))?;
        Ok(())
    });

    Ok(outcome.failures())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::Path;

    fn format_args(dir: &Path, extra: &[&str]) -> FormatArgs {
        let mut argv = vec!["mangaprep", "format", dir.to_str().unwrap()];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Format { args } => args,
            _ => panic!("expected format"),
        }
    }

    #[test]
    fn batch_formats_all_files_and_isolates_failures() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("book");
        fs::create_dir(&source).unwrap();

        fs::write(
            source.join("1.xhtml"),
            "<html><head><title>a</title></head><body><p>x</p></body></html>",
        )
        .unwrap();
        fs::write(source.join("2.xhtml"), "not markup at all").unwrap();
        fs::write(
            source.join("10.xhtml"),
            "<html><head><title>b</title></head><body><p>y</p></body></html>",
        )
        .unwrap();

        let args = format_args(&source, &[]);
        let failures = run(&args, &ToolConfig::default()).unwrap();

        assert_eq!(failures, 1);
        let out = root.path().join("book_formatted");
        assert!(out.join("1.xhtml").exists());
        assert!(out.join("10.xhtml").exists());
        assert!(!out.join("2.xhtml").exists());

        let formatted = fs::read_to_string(out.join("1.xhtml")).unwrap();
        assert!(formatted.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(formatted.contains("xml:lang=\"zh-Hans\""));
    }

    #[test]
    fn indent_flag_overrides_config() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("book");
        fs::create_dir(&source).unwrap();
        fs::write(source.join("1.xhtml"), "<html><body><p>x</p></body></html>").unwrap();

        let args = format_args(&source, &["--indent", "2"]);
        run(&args, &ToolConfig::default()).unwrap();

        let formatted =
            fs::read_to_string(root.path().join("book_formatted").join("1.xhtml")).unwrap();
        assert!(formatted.contains("\n  <body>"));
        assert!(formatted.contains("\n    <p>x</p>"));
    }

    #[test]
    fn keep_head_flag_disables_curation() {
        let root = tempfile::tempdir().unwrap();
        let source = root.path().join("book");
        fs::create_dir(&source).unwrap();
        fs::write(
            source.join("1.xhtml"),
            "<html><head><meta charset=\"utf-8\"/></head><body/></html>",
        )
        .unwrap();

        let args = format_args(&source, &["--keep-head"]);
        run(&args, &ToolConfig::default()).unwrap();

        let formatted =
            fs::read_to_string(root.path().join("book_formatted").join("1.xhtml")).unwrap();
        assert!(formatted.contains("<meta"));
    }

    #[test]
    fn missing_source_dir_is_an_error() {
        let args = format_args(Path::new("/nonexistent-dir"), &[]);
        assert!(run(&args, &ToolConfig::default()).is_err());
    }
}
