//! mangaprep - batch utilities for digitized manga and EPUB material.

mod batch;
mod chapters;
mod cli;
mod config;
mod epub;
mod format;
mod logger;
mod pages;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ToolConfig;
use pages::blend::Edge;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ToolConfig::load(&cli.config)?;

    let failures = match &cli.command {
        Commands::Format { args } => cli::format::run(args, &config)?,
        Commands::Cbz { epubs, output } => cli::cbz::run(epubs, output.as_deref())?,
        Commands::Split { input_dir } => cli::pages::run_split(input_dir)?,
        Commands::Convert { to, input_dir } => cli::pages::run_convert(input_dir, *to)?,
        Commands::Chapters { dir } => cli::chapters::run_chapters(dir)?,
        Commands::Concat {
            horizontal,
            image1,
            image2,
            ..
        } => {
            cli::pages::run_concat(*horizontal, image1, image2)?;
            0
        }
        Commands::Blend {
            up,
            down,
            left,
            band,
            image1,
            image2,
            ..
        } => {
            let edge = if *up {
                Edge::Up
            } else if *down {
                Edge::Down
            } else if *left {
                Edge::Left
            } else {
                Edge::Right
            };
            cli::pages::run_blend(edge, *band, image1, image2)?;
            0
        }
        Commands::Volume {
            input_dir,
            toc_page,
            contents_file,
        } => {
            cli::chapters::run_volume(input_dir, toc_page, contents_file)?;
            0
        }
    };

    // Partial failure still exits non-zero so scripted callers notice.
    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}
