//! EPUB XHTML canonicalization.
//!
//! Single-pass pipeline, one run per file:
//!
//! 1. root-tag attribute standardization on the raw text;
//! 2. raw-title extraction and skip-pattern test;
//! 3. declaration strip (standard lines always replace what was there);
//! 4. recovering tree parse;
//! 5. head curation;
//! 6. title-from-heading update (unless the file is skip-matched);
//! 7. empty-element normalization + re-indent (unless skip-matched);
//! 8. serialization, rejoined with the standard declarations.
//!
//! Applied to its own output the pipeline is a fixed point: declarations,
//! root attributes, head contents and indentation are all already canonical
//! the second time around.

pub mod declaration;
mod head;
mod root;
mod selfclose;
mod serialize;
mod skip;
pub mod tree;

pub use skip::SkipPatterns;

use anyhow::Result;

/// Formatter behavior. The toggles correspond to the knobs that historically
/// drifted between copies of the formatter script.
#[derive(Debug)]
pub struct FormatOptions {
    /// Spaces per indent level.
    pub indent: usize,
    /// Reduce `<head>` to title + stylesheet links.
    pub curate_head: bool,
    /// Copy the first heading's text into `<title>`.
    pub update_title: bool,
    /// Raw titles matching these keep their body layout.
    pub skip_patterns: SkipPatterns,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            curate_head: true,
            update_title: true,
            skip_patterns: SkipPatterns::none(),
        }
    }
}

/// Result of formatting one file.
pub struct FormatOutcome {
    pub content: String,
    /// True when a skip pattern matched the raw title and body formatting
    /// was left out.
    pub body_skipped: bool,
}

/// The canonicalization pipeline.
pub struct XhtmlFormatter {
    options: FormatOptions,
}

impl XhtmlFormatter {
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Format one document.
    ///
    /// Only unparseable input fails; structural damage (missing head,
    /// missing declarations, mismatched tags) is absorbed.
    pub fn format(&self, input: &str) -> Result<FormatOutcome> {
        let standardized = root::standardize_root_tag(input);

        let body_skipped = skip::extract_raw_title(&standardized)
            .is_some_and(|title| self.options.skip_patterns.matches(title));

        let body = declaration::strip_declarations(&standardized);
        let mut doc = tree::parse(body)?;

        if self.options.curate_head {
            head::curate(&mut doc);
        }
        if self.options.update_title && !body_skipped {
            head::update_title_from_heading(&mut doc);
        }
        if !body_skipped {
            selfclose::restore_empty_elements(&mut doc);
            serialize::indent(&mut doc, self.options.indent);
        }

        let mut content = String::with_capacity(input.len() + 128);
        content.push_str(declaration::XML_DECLARATION);
        content.push('\n');
        content.push_str(declaration::DOCTYPE);
        content.push('\n');
        serialize::write(&doc, &mut content);
        content.push('\n');

        Ok(FormatOutcome {
            content,
            body_skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SKIP_TITLES;

    fn formatter() -> XhtmlFormatter {
        let patterns: Vec<String> = DEFAULT_SKIP_TITLES.iter().map(|s| (*s).to_string()).collect();
        XhtmlFormatter::new(FormatOptions {
            skip_patterns: SkipPatterns::compile(&patterns).unwrap(),
            ..FormatOptions::default()
        })
    }

    const SAMPLE: &str = concat!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
        "<!DOCTYPE html SYSTEM \"old.dtd\">\n",
        "<html xmlns=\"http://www.w3.org/1999/xhtml\">\n",
        "<head>\n",
        "<meta charset=\"utf-8\"/>\n",
        "<title>placeholder</title>\n",
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"../style/main.css\"/>\n",
        "<script src=\"x.js\"></script>\n",
        "</head>\n",
        "<body>\n",
        "<h2><span>第一话 出发</span></h2>\n",
        "<p>正文第一段。</p>\n",
        "<p/>\n",
        "<p>正文第二段。</p>\n",
        "</body>\n",
        "</html>\n",
    );

    #[test]
    fn output_starts_with_standard_declarations() {
        let out = formatter().format(SAMPLE).unwrap();
        let mut lines = out.content.lines();
        assert_eq!(lines.next(), Some(declaration::XML_DECLARATION));
        assert_eq!(lines.next(), Some(declaration::DOCTYPE));
        assert!(lines.next().unwrap().starts_with("<html"));
    }

    #[test]
    fn declarations_are_standardized_even_when_absent() {
        let out = formatter().format("<html><body/></html>").unwrap();
        assert!(out.content.starts_with(declaration::XML_DECLARATION));
    }

    #[test]
    fn head_is_curated_and_title_updated() {
        let out = formatter().format(SAMPLE).unwrap().content;
        assert!(!out.contains("<meta"));
        assert!(!out.contains("<script"));
        assert!(out.contains("<title>第一话 出发</title>"));
        assert!(out.contains("href=\"../style/main.css\""));
    }

    #[test]
    fn missing_root_attributes_are_injected() {
        let out = formatter().format("<html><body/></html>").unwrap().content;
        assert!(out.contains("xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(out.contains("xml:lang=\"zh-Hans\""));
    }

    #[test]
    fn present_root_attributes_are_preserved() {
        let out = formatter()
            .format("<html xml:lang=\"ja\" class=\"c\"><body/></html>")
            .unwrap()
            .content;
        assert!(out.contains("xml:lang=\"ja\""));
        assert!(out.contains("class=\"c\""));
        assert!(!out.contains("zh-Hans"));
    }

    #[test]
    fn empty_paragraphs_stay_paired_on_one_line() {
        let out = formatter().format(SAMPLE).unwrap().content;
        assert!(out.contains("<p></p>"));
        assert!(!out.contains("<p/>"));
        assert!(!out.contains("<p>\n"));
    }

    #[test]
    fn formatting_is_idempotent() {
        let first = formatter().format(SAMPLE).unwrap().content;
        let second = formatter().format(&first).unwrap().content;
        assert_eq!(first, second);
    }

    #[test]
    fn volume_title_skips_body_formatting() {
        let input = concat!(
            "<html><head><title>第三卷</title></head>",
            "<body><h2><span>第三卷</span></h2>",
            "<div>  <p>original   layout</p></div></body></html>"
        );
        let out = formatter().format(input).unwrap();
        assert!(out.body_skipped);
        // Head still curated, declarations still standardized.
        assert!(out.content.starts_with(declaration::XML_DECLARATION));
        // Body whitespace untouched: no four-space indentation introduced.
        assert!(out.content.contains("<div>  <p>original   layout</p></div>"));
    }

    #[test]
    fn chapter_title_does_not_skip() {
        let input = concat!(
            "<html><head><title>第一话 出发</title></head>",
            "<body><p>x</p></body></html>"
        );
        let out = formatter().format(input).unwrap();
        assert!(!out.body_skipped);
        assert!(out.content.contains("\n    <body>"));
    }

    #[test]
    fn skip_logic_can_be_disabled() {
        let plain = XhtmlFormatter::new(FormatOptions::default());
        let input = concat!(
            "<html><head><title>第三卷</title></head>",
            "<body><p>x</p></body></html>"
        );
        let out = plain.format(input).unwrap();
        assert!(!out.body_skipped);
    }

    #[test]
    fn head_curation_can_be_disabled() {
        let formatter = XhtmlFormatter::new(FormatOptions {
            curate_head: false,
            ..FormatOptions::default()
        });
        let out = formatter
            .format("<html><head><meta charset=\"utf-8\"/></head><body/></html>")
            .unwrap()
            .content;
        assert!(out.contains("<meta"));
    }

    #[test]
    fn unparseable_input_fails() {
        assert!(formatter().format("not markup at all").is_err());
    }

    #[test]
    fn entities_survive_the_round_trip() {
        let out = formatter()
            .format("<html><body><p>a &amp; b&#160;c</p></body></html>")
            .unwrap()
            .content;
        assert!(out.contains("a &amp; b&#160;c"));
    }
}
