// src/crawl/session.rs
// =============================================================================
// This module defines the state a crawl owns while it runs: the
// configuration, every dedup registry, the frontier, and the running
// extremes that feed the report.
//
// Bundling all of it into one CrawlSession keeps two invariants easy to
// hold:
// - Index alignment: redirect sources/targets and the four off-site
//   registries (hosts, destination paths, offering pages, ports) must
//   line up entry by entry. Paired inserts happen together inside the
//   session's record_* methods, never from call sites.
// - Single ownership: the session is created by the scheduler, mutated
//   only on its single control flow, and handed to the report when the
//   crawl ends. No globals, no locking.
// =============================================================================

use chrono::NaiveDateTime;
use std::time::Duration;

use crate::crawl::frontier::Frontier;
use crate::crawl::registry::DedupRegistry;

// Capacity of every registry and the frontier unless overridden
pub const DEFAULT_CAPACITY: usize = 512;

// Pause between consecutive fetches unless overridden
pub const DEFAULT_DELAY_MS: u64 = 500;

// Everything the crawl needs to know before it starts
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Host name of the site being crawled (also the on-site/off-site divider)
    pub host: String,
    /// TCP port the site's server listens on
    pub port: u16,
    /// Politeness delay before every fetch except the first
    pub delay: Duration,
    /// Capacity of every registry and the frontier
    pub capacity: usize,
}

impl CrawlConfig {
    pub fn new(host: &str, port: u16) -> Self {
        CrawlConfig {
            host: host.to_string(),
            port,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

// Running size and modification-time extremes across Ok pages
//
// The first recorded page seeds all four slots; later pages displace a
// slot only when strictly smaller/larger/older/newer.
#[derive(Debug, Default)]
pub struct PageExtremes {
    pub smallest: Option<(String, u64)>,
    pub largest: Option<(String, u64)>,
    pub oldest: Option<(String, NaiveDateTime)>,
    pub newest: Option<(String, NaiveDateTime)>,
}

impl PageExtremes {
    /// Feeds one Ok page into the accumulators
    pub fn record(&mut self, path: &str, size: u64, modified: NaiveDateTime) {
        match &self.smallest {
            Some((_, current)) if size >= *current => {}
            _ => self.smallest = Some((path.to_string(), size)),
        }
        match &self.largest {
            Some((_, current)) if size <= *current => {}
            _ => self.largest = Some((path.to_string(), size)),
        }
        match &self.oldest {
            Some((_, current)) if modified >= *current => {}
            _ => self.oldest = Some((path.to_string(), modified)),
        }
        match &self.newest {
            Some((_, current)) if modified <= *current => {}
            _ => self.newest = Some((path.to_string(), modified)),
        }
    }
}

// All mutable state of one crawl run
pub struct CrawlSession {
    /// Pages enqueued or visited (dedup for the frontier and the report)
    pub pages: DedupRegistry,
    /// On-site images discovered in bodies
    pub images: DedupRegistry,
    /// Paths that answered 404
    pub not_found: DedupRegistry,
    /// Redirect sources; index-aligned with redirect_targets
    pub redirect_sources: DedupRegistry,
    pub redirect_targets: DedupRegistry,
    /// Off-site hosts; the next three are index-aligned with this one
    pub offsite_hosts: DedupRegistry,
    /// Destination path on the off-site host
    pub offsite_paths: DedupRegistry,
    /// The on-site page that offered the link (first discovery wins)
    pub offsite_sources: DedupRegistry,
    /// Port per off-site host; None means unspecified (default 80)
    pub offsite_ports: Vec<Option<u16>>,
    pub frontier: Frontier,
    pub extremes: PageExtremes,
}

impl CrawlSession {
    pub fn new(capacity: usize) -> Self {
        CrawlSession {
            pages: DedupRegistry::with_capacity(capacity),
            images: DedupRegistry::with_capacity(capacity),
            not_found: DedupRegistry::with_capacity(capacity),
            redirect_sources: DedupRegistry::with_capacity(capacity),
            redirect_targets: DedupRegistry::with_capacity(capacity),
            offsite_hosts: DedupRegistry::with_capacity(capacity),
            offsite_paths: DedupRegistry::with_capacity(capacity),
            offsite_sources: DedupRegistry::with_capacity(capacity),
            offsite_ports: Vec::new(),
            frontier: Frontier::with_capacity(capacity),
            extremes: PageExtremes::default(),
        }
    }

    /// Queues a newly discovered on-site page exactly once
    ///
    /// A page dropped by a full frontier is still marked visited, so the
    /// crawl shrinks instead of looping when the bound is hit.
    pub fn discover_page(&mut self, path: &str) {
        if self.pages.contains(path) {
            return;
        }
        self.frontier.enqueue(path);
        self.pages.insert(path);
    }

    /// Records an on-site image exactly once
    pub fn record_image(&mut self, path: &str) {
        if !self.images.contains(path) {
            self.images.insert(path);
        }
    }

    /// Records a path that answered 404 exactly once
    pub fn record_not_found(&mut self, path: &str) {
        if !self.not_found.contains(path) {
            self.not_found.insert(path);
        }
    }

    /// Records a redirect source together with its destination
    ///
    /// The paired insert keeps the two registries index-aligned; the
    /// target registry tolerates duplicate destinations on purpose.
    pub fn record_redirect(&mut self, source: &str, target: &str) {
        if self.redirect_sources.contains(source) {
            return;
        }
        if self.redirect_sources.insert(source) {
            self.redirect_targets.insert(target);
        }
    }

    /// Records an off-site discovery, first-seen-host-wins
    ///
    /// Only the first page offering a link to a given host is recorded;
    /// later offers to the same host are ignored. All four registries
    /// move together so their indices stay aligned.
    pub fn record_offsite(&mut self, host: &str, port: Option<u16>, path: &str, source: &str) {
        if self.offsite_hosts.contains(host) {
            return;
        }
        if self.offsite_hosts.insert(host) {
            self.offsite_paths.insert(path);
            self.offsite_sources.insert(source);
            self.offsite_ports.push(port);
        }
    }
}
