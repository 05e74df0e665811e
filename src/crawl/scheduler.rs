// src/crawl/scheduler.rs
// =============================================================================
// This module drives the breadth-first crawl.
//
// How it works:
// 1. Seed the frontier (and the visited-pages registry) with "/"
// 2. Dequeue a path and fetch it over the transport
// 3. Parse the response status and headers
// 4. Update the registries and extremes for this fetch's status
// 5. Scan the body for references; enqueue new on-site pages
// 6. Repeat until the frontier is empty
//
// Politeness:
// - Sleeps a fixed delay before every fetch except the very first, so we
//   never hammer the server (a simple rate limit, not adaptive backoff)
//
// Error policy: anything the loop cannot resolve locally - a connection
// failure, a missing status line, an unparseable Last-Modified - aborts
// the whole crawl via `?`. There is no per-URL retry or skip; a partial
// report would misrepresent the site.
// =============================================================================

use anyhow::Result;
use tokio::time::sleep;

use crate::crawl::session::{CrawlConfig, CrawlSession};
use crate::parser::{extract_references, parse_response, LinkReference, StatusClass};
use crate::transport::{Method, Transport};

// Crawls the whole site and returns the session for reporting
//
// The transport is borrowed behind its trait so tests can drive the loop
// with an in-memory site instead of a socket.
pub async fn run_crawl<T: Transport>(transport: &T, config: &CrawlConfig) -> Result<CrawlSession> {
    let mut session = CrawlSession::new(config.capacity);

    // The crawl is rooted at "/": seed it as both queued and visited
    session.frontier.enqueue("/");
    session.pages.insert("/");

    let mut is_initial_request = true;

    while let Some(path) = session.frontier.dequeue() {
        // Delay if it's not the initial request
        if !is_initial_request {
            sleep(config.delay).await;
        }
        is_initial_request = false;

        println!("  Fetching: {}", path);
        let raw = transport
            .fetch(&config.host, config.port, &path, Method::Get)
            .await?;
        let fetched = parse_response(raw)?;

        match fetched.status {
            StatusClass::NotFound => {
                // No body is trusted on a 404; record it and move on
                session.record_not_found(&path);
                continue;
            }
            StatusClass::Ok => {
                // parse_response guarantees the timestamp for Ok pages;
                // a missing Content-Length counts as zero
                if let Some(modified) = fetched.last_modified {
                    session
                        .extremes
                        .record(&path, fetched.content_length.unwrap_or(0), modified);
                }
            }
            StatusClass::Redirect => {}
        }

        let is_redirect = fetched.status == StatusClass::Redirect;
        let mut redirect_recorded = false;

        for reference in extract_references(&fetched.raw, &path, &config.host) {
            match reference {
                LinkReference::Image { path: image_path } => {
                    session.record_image(&image_path);
                }
                LinkReference::Page { path: target } => {
                    // The first anchor of a redirect body is where the
                    // redirect points; it is also a normal discovery
                    if is_redirect && !redirect_recorded {
                        session.record_redirect(&path, &target);
                        redirect_recorded = true;
                    }
                    session.discover_page(&target);
                }
                LinkReference::OffSite {
                    host,
                    port,
                    path: destination,
                } => {
                    if is_redirect && !redirect_recorded {
                        session.record_redirect(&path, &destination);
                        redirect_recorded = true;
                    }
                    session.record_offsite(&host, port, &destination, &path);
                }
            }
        }
    }

    Ok(session)
}
