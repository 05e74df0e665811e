// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap (usage errors exit with 1)
// 2. Run the breadth-first crawl over the target host
// 3. Probe every off-site host the crawl discovered
// 4. Print the report as text or JSON
// 5. Exit with proper code (0 = success, 2 = fatal crawl error)
//
// The error policy lives here too: anything the crawl loop could not
// resolve locally bubbles up as an anyhow error, gets printed as a
// diagnostic, and terminates the process with exit code 2. No partial
// report is produced for a failed crawl.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - registries, frontier, session, scheduler
mod offsite; // src/offsite.rs - off-site host validation
mod parser; // src/parser/ - response and body parsing
mod report; // src/report.rs - report assembly and rendering
mod transport; // src/transport.rs - raw HTTP over TCP

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use crawl::CrawlConfig;
use report::CrawlReport;
use transport::TcpTransport;

// The #[tokio::main] attribute transforms our async main into a real main
// function that runs our async code inside a tokio runtime
#[tokio::main]
async fn main() {
    // try_parse instead of parse: argument errors must exit with code 1,
    // while clap's own exit would use a different code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                // --help and --version are not usage errors
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            // Fatal resource or protocol error: print and exit with code 2
            eprintln!("Error: {:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

// The main application logic
//
// Returns:
//   Ok(0) = crawl and report completed
//   Err   = fatal error (mapped to exit code 2 above)
async fn run(cli: Cli) -> Result<i32> {
    println!("🔍 Crawling http://{}:{}/", cli.host, cli.port);

    let mut config = CrawlConfig::new(&cli.host, cli.port);
    config.delay = Duration::from_millis(cli.delay_ms);
    config.capacity = cli.max_urls;

    let transport = TcpTransport::new();

    // Phase 1: the breadth-first crawl of the target host
    let session = crawl::run_crawl(&transport, &config).await?;
    println!(
        "📄 Crawled {} page(s), found {} image(s) and {} off-site host(s)",
        session.pages.len(),
        session.images.len(),
        session.offsite_hosts.len()
    );

    // Phase 2: one reachability probe per off-site host
    let offsite_flags = if session.offsite_hosts.is_empty() {
        Vec::new()
    } else {
        println!("🌐 Probing off-site hosts...");
        offsite::validate_offsite_hosts(&transport, &session).await
    };

    // Phase 3: assemble and print the report
    let report = CrawlReport::build(&cli.host, &session, &offsite_flags);
    if cli.json {
        // Serialize the report to JSON and print
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        report.print_table();
    }

    Ok(0)
}
