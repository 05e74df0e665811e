// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The surveyor takes the host and port as positional arguments because
// that's the whole address of the crawl: everything else (output format,
// politeness delay, capacity) is an optional flag with a sensible default.
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "site-surveyor",
    version = "0.1.0",
    about = "Crawl a single web host and report its link structure",
    long_about = "site-surveyor crawls one web host breadth-first starting from '/', \
                  classifies every fetched resource by HTTP status, and prints a report \
                  covering URL counts, size and modification-time extremes, broken links, \
                  redirects, and the reachability of off-site links."
)]
pub struct Cli {
    /// Host name of the site to crawl (e.g., example.com)
    ///
    /// This is a positional argument (required, no flag needed)
    pub host: String,

    /// TCP port the web server listens on (e.g., 80)
    ///
    /// This is a positional argument (required)
    pub port: u16,

    /// Output the report in JSON format instead of text
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,

    /// Politeness delay between consecutive fetches, in milliseconds
    ///
    /// The first fetch is never delayed. This is a fixed pause, not
    /// adaptive backoff.
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Upper bound on URLs tracked per category
    ///
    /// Caps every registry and the crawl queue. Discoveries beyond the
    /// bound are silently dropped, which also bounds the crawl itself.
    #[arg(long, default_value_t = 512)]
    pub max_urls: usize,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why positional arguments instead of flags?
//    - host and port are always required, and together they are the one
//      thing this tool operates on
//    - `site-surveyor example.com 80` reads like a sentence
//
// 2. What does default_value_t do?
//    - Supplies a default when the flag is omitted
//    - The _t suffix means the default is a typed value, not a string
//
// 3. Why u16 for the port?
//    - TCP ports are 0-65535, which is exactly the range of u16
//    - clap rejects out-of-range values for us during parsing
// -----------------------------------------------------------------------------
