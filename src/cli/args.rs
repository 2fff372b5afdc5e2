//! Command-line interface definitions.

use clap::{ArgGroup, ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::SortOrder;
use crate::pages::convert::TargetFormat;

/// Batch utilities for digitized manga and EPUB material
#[derive(Parser, Debug)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: mangaprep.toml)
    #[arg(short = 'C', long, default_value = "mangaprep.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Canonicalize EPUB XHTML files into a sibling _formatted directory
    #[command(visible_alias = "f")]
    Format {
        #[command(flatten)]
        args: FormatArgs,
    },

    /// Convert EPUB archives to CBZ image archives
    #[command(visible_alias = "c")]
    Cbz {
        /// EPUB files to convert
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        epubs: Vec<PathBuf>,

        /// Output path (single input only; default: next to the input)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Split double-page scans into single pages, right page first
    Split {
        /// Directory of page images
        #[arg(value_hint = clap::ValueHint::DirPath)]
        input_dir: PathBuf,
    },

    /// Join two page images edge to edge
    #[command(group = ArgGroup::new("direction").required(true))]
    Concat {
        /// Join left-to-right (heights must match)
        #[arg(short = 'H', long, group = "direction")]
        horizontal: bool,

        /// Join top-to-bottom (widths must match)
        #[arg(short = 'V', long, group = "direction")]
        vertical: bool,

        image1: PathBuf,
        image2: PathBuf,
    },

    /// Splice two same-sized pages along one edge
    #[command(group = ArgGroup::new("edge").required(true))]
    Blend {
        /// Take the band from the first image's top edge
        #[arg(short, long, group = "edge")]
        up: bool,

        /// Take the band from the first image's bottom edge
        #[arg(short, long, group = "edge")]
        down: bool,

        /// Take the band from the first image's left edge
        #[arg(short, long, group = "edge")]
        left: bool,

        /// Take the band from the first image's right edge
        #[arg(short, long, group = "edge")]
        right: bool,

        /// Band depth in pixels
        band: u32,

        image1: PathBuf,
        image2: PathBuf,
    },

    /// Re-encode page images into another format
    Convert {
        /// Target format
        #[arg(short, long, value_enum)]
        to: TargetFormat,

        /// Directory of page images
        #[arg(value_hint = clap::ValueHint::DirPath)]
        input_dir: PathBuf,
    },

    /// Number chapter folders by their Chinese-numeral markers
    Chapters {
        /// Directory containing the chapter folders
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: PathBuf,
    },

    /// Split a volume folder into chapters from a contents listing
    Volume {
        /// Directory of page images
        #[arg(value_hint = clap::ValueHint::DirPath)]
        input_dir: PathBuf,

        /// Filename of the table-of-contents page (e.g. "6.jpg")
        toc_page: String,

        /// Chapter listing file ("<title> <start page>" per line)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        contents_file: PathBuf,
    },
}

/// Format command arguments.
#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// Source directory of .xhtml/.html/.xml files
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub source_dir: PathBuf,

    /// Spaces per indent level (overrides [format].indent, default 4)
    #[arg(long)]
    pub indent: Option<usize>,

    /// Batch processing order
    #[arg(long, value_enum)]
    pub sort: Option<SortOrder>,

    /// Keep the full <head> instead of reducing it to title + stylesheets
    #[arg(long)]
    pub keep_head: bool,

    /// Do not copy heading text into <title>
    #[arg(long)]
    pub no_title_update: bool,

    /// Format every file, ignoring skip-title patterns
    #[arg(long)]
    pub no_skip: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn concat_requires_a_direction() {
        assert!(Cli::try_parse_from(["mangaprep", "concat", "a.png", "b.png"]).is_err());
        assert!(Cli::try_parse_from(["mangaprep", "concat", "-H", "a.png", "b.png"]).is_ok());
        assert!(
            Cli::try_parse_from(["mangaprep", "concat", "-H", "-V", "a.png", "b.png"]).is_err()
        );
    }

    #[test]
    fn blend_takes_edge_band_and_two_images() {
        let cli = Cli::try_parse_from(["mangaprep", "blend", "-u", "300", "a.jpg", "b.jpg"]).unwrap();
        match cli.command {
            Commands::Blend { up, band, .. } => {
                assert!(up);
                assert_eq!(band, 300);
            }
            _ => panic!("expected blend"),
        }
    }

    #[test]
    fn format_flags_parse() {
        let cli = Cli::try_parse_from([
            "mangaprep", "format", "src", "--indent", "2", "--sort", "lexicographic", "--no-skip",
        ])
        .unwrap();
        match cli.command {
            Commands::Format { args } => {
                assert_eq!(args.indent, Some(2));
                assert_eq!(args.sort, Some(SortOrder::Lexicographic));
                assert!(args.no_skip);
                assert!(!args.keep_head);
            }
            _ => panic!("expected format"),
        }
    }
}
