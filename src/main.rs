// Copyright © 2024 SitemapFlow. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # SitemapFlow CLI
//!
//! This is the main entry point for the SitemapFlow command-line interface.
//! It initializes the logger, parses arguments and generates a sitemap for a
//! statically-described site to a file or to standard output.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use sitemapflow::{
    ConfigBuilder, Locale, SitemapFlow, StaticCatalog, StaticLocaleProvider,
    StaticRouteResolver, StaticSlugResolver,
};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Main command-line interface for SitemapFlow.
#[derive(Parser)]
#[command(
    name = "SitemapFlow",
    version,
    about = "An XML sitemap generator"
)]
struct Cli {
    /// Verbose mode (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The action to perform, such as `generate`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sitemap for a statically-described site
    Generate {
        /// Host the sitemap URLs point at
        #[arg(long, default_value = "www.example.com")]
        host: String,

        /// Optional TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Active locale codes, in alternate-link order (repeatable)
        #[arg(short, long = "locale")]
        locales: Vec<String>,

        /// Custom URLs appended to the sitemap (repeatable)
        #[arg(long = "custom-url")]
        custom_urls: Vec<String>,

        /// Resolve every URL with the https scheme
        #[arg(long)]
        https: bool,

        /// Maximum number of entries per sitemap document
        #[arg(long)]
        max_per_sitemap: Option<usize>,

        /// 1-based shard to write instead of the index/single document
        #[arg(short, long)]
        shard: Option<usize>,

        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Builds the generator from the command-line description and writes the
/// sitemap to the requested destination.
///
/// # Errors
///
/// This function will return an error if:
/// - The configuration file cannot be read or fails validation.
/// - The output file cannot be created.
/// - Sitemap generation itself fails.
#[allow(clippy::too_many_arguments)]
fn run(
    host: &str,
    config_file: Option<&PathBuf>,
    locales: &[String],
    custom_urls: &[String],
    https: bool,
    max_per_sitemap: Option<usize>,
    shard: Option<usize>,
    output: Option<&PathBuf>,
) -> Result<(), anyhow::Error> {
    info!("Starting SitemapFlow...");

    let mut builder = ConfigBuilder::new();
    if let Some(path) = config_file {
        builder = builder.with_file(path);
    }
    if https {
        builder = builder.with_override("force_https", true);
    }
    if !locales.is_empty() {
        builder = builder.with_override("localized_urls_enabled", true);
    }
    if !custom_urls.is_empty() {
        builder =
            builder.with_override("custom_urls", custom_urls.join(","));
    }
    if let Some(max) = max_per_sitemap {
        builder = builder.with_override(
            "max_urls_per_sitemap",
            i64::try_from(max).unwrap_or(i64::MAX),
        );
    }

    let config = builder
        .build()
        .context("Failed to build the sitemap configuration")?;

    let active_locales = locales
        .iter()
        .enumerate()
        .map(|(index, code)| Locale::new(index as u64 + 1, code.clone()))
        .collect();

    let flow = SitemapFlow::new(
        config,
        Box::new(StaticRouteResolver::new(host)),
        Box::new(StaticCatalog::default()),
        Box::new(StaticSlugResolver::default()),
        Box::new(StaticLocaleProvider::new(active_locales)),
    );

    match output {
        Some(path) => {
            let file = File::create(path).with_context(|| {
                format!("Failed to create output file {:?}", path)
            })?;
            flow.generate(file, shard)
                .context("Failed to generate sitemap")?;
            info!("Sitemap written to {:?}", path);
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            flow.generate(&mut handle, shard)
                .context("Failed to generate sitemap")?;
            handle.flush()?;
        }
    }

    Ok(())
}

/// The main entry point for the SitemapFlow CLI.
fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Err(err) = match &cli.command {
        Some(Commands::Generate {
            host,
            config,
            locales,
            custom_urls,
            https,
            max_per_sitemap,
            shard,
            output,
        }) => run(
            host,
            config.as_ref(),
            locales,
            custom_urls,
            *https,
            *max_per_sitemap,
            *shard,
            output.as_ref(),
        ),
        None => {
            println!(
                "No command provided. Use --help for more information."
            );
            Ok(())
        }
    } {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
