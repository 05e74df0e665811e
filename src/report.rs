// src/report.rs
// =============================================================================
// This module assembles and renders the final crawl report.
//
// The report has seven numbered sections:
// 1. Total number of distinct URLs (pages + images + off-site hosts)
// 2. HTML page count vs non-HTML object count
// 3. Smallest and largest page by Content-Length
// 4. Oldest and most recently modified page by Last-Modified
// 5. Paths that answered 404
// 6. Redirect sources and their destinations
// 7. Off-site offering pages and destinations, flagged Valid/Invalid
//
// The same structure serves both output modes: print_table() renders the
// numbered text sections, and the Serialize derives give --json the full
// report as one document.
// =============================================================================

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::crawl::session::CrawlSession;

// A page singled out by its size
#[derive(Debug, Clone, Serialize)]
pub struct SizeEntry {
    pub url: String,
    pub bytes: u64,
}

// A page singled out by its modification time
#[derive(Debug, Clone, Serialize)]
pub struct ModifiedEntry {
    pub url: String,
    pub timestamp: NaiveDateTime,
}

// One redirect source and where it points
#[derive(Debug, Clone, Serialize)]
pub struct RedirectEntry {
    pub source: String,
    pub destination: String,
}

// One off-site discovery with its probe verdict
#[derive(Debug, Clone, Serialize)]
pub struct OffsiteEntry {
    /// The on-site page that offered the link
    pub source: String,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub destination: String,
    pub valid: bool,
}

// The whole report, ready to print or serialize
#[derive(Debug, Serialize)]
pub struct CrawlReport {
    pub host: String,
    pub total_distinct_urls: usize,
    pub page_count: usize,
    pub image_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smallest_page: Option<SizeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_page: Option<SizeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_page: Option<ModifiedEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_recent_page: Option<ModifiedEntry>,
    pub not_found: Vec<String>,
    pub redirects: Vec<RedirectEntry>,
    pub offsite: Vec<OffsiteEntry>,
}

impl CrawlReport {
    // Builds the report from a finished session and the probe flags
    //
    // offsite_flags is index-aligned with the session's off-site
    // registries (it came out of the validator that way).
    pub fn build(host: &str, session: &CrawlSession, offsite_flags: &[bool]) -> Self {
        let site_url = |path: &str| format!("http://{}{}", host, path);

        let size_entry = |slot: &Option<(String, u64)>| {
            slot.as_ref().map(|(path, bytes)| SizeEntry {
                url: site_url(path),
                bytes: *bytes,
            })
        };
        let modified_entry = |slot: &Option<(String, NaiveDateTime)>| {
            slot.as_ref().map(|(path, timestamp)| ModifiedEntry {
                url: site_url(path),
                timestamp: *timestamp,
            })
        };

        let redirects = session
            .redirect_sources
            .iter()
            .zip(session.redirect_targets.iter())
            .map(|(source, destination)| RedirectEntry {
                source: site_url(source),
                destination: site_url(destination),
            })
            .collect();

        let offsite = session
            .offsite_hosts
            .iter()
            .enumerate()
            .map(|(index, offsite_host)| {
                let port = session.offsite_ports.get(index).copied().flatten();
                let destination_path = session.offsite_paths.get(index).unwrap_or("/");
                let destination = match port {
                    Some(port) => format!("http://{}:{}{}", offsite_host, port, destination_path),
                    None => format!("http://{}{}", offsite_host, destination_path),
                };
                OffsiteEntry {
                    source: site_url(session.offsite_sources.get(index).unwrap_or("/")),
                    host: offsite_host.to_string(),
                    port,
                    destination,
                    valid: offsite_flags.get(index).copied().unwrap_or(false),
                }
            })
            .collect();

        CrawlReport {
            host: host.to_string(),
            total_distinct_urls: session.pages.len()
                + session.images.len()
                + session.offsite_hosts.len(),
            page_count: session.pages.len(),
            image_count: session.images.len(),
            smallest_page: size_entry(&session.extremes.smallest),
            largest_page: size_entry(&session.extremes.largest),
            oldest_page: modified_entry(&session.extremes.oldest),
            most_recent_page: modified_entry(&session.extremes.newest),
            not_found: session.not_found.iter().map(site_url).collect(),
            redirects,
            offsite,
        }
    }

    // Prints the seven numbered report sections
    pub fn print_table(&self) {
        println!("----- Report Items -----");

        println!("1.");
        println!("Total number of distinct URLs = {}", self.total_distinct_urls);

        println!("2.");
        println!("Number of HTML pages = {}", self.page_count);
        println!("Number of non-HTML objects = {}", self.image_count);

        println!("3.");
        if let Some(entry) = &self.smallest_page {
            println!("Smallest page is [{}], size = {} bytes", entry.url, entry.bytes);
        }
        if let Some(entry) = &self.largest_page {
            println!("Largest page is [{}], size = {} bytes", entry.url, entry.bytes);
        }

        println!("4.");
        if let Some(entry) = &self.oldest_page {
            println!(
                "Oldest page is [{}], timestamp = {}",
                entry.url,
                entry.timestamp.format("%a %b %e %H:%M:%S %Y")
            );
        }
        if let Some(entry) = &self.most_recent_page {
            println!(
                "Most recent-modified page is [{}], timestamp = {}",
                entry.url,
                entry.timestamp.format("%a %b %e %H:%M:%S %Y")
            );
        }

        println!("5.");
        println!("Invalid URLs (404):");
        for url in &self.not_found {
            println!("[{}]", url);
        }

        println!("6.");
        println!("Redirected URLs and destinations (30x):");
        for entry in &self.redirects {
            println!("[{}] -> [{}]", entry.source, entry.destination);
        }

        println!("7.");
        println!("Off-site URLs and valid flags:");
        for entry in &self.offsite {
            println!(
                "[{}] -> [{}] | {}",
                entry.source,
                entry.destination,
                if entry.valid { "Valid" } else { "Invalid" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, day)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn populated_session() -> CrawlSession {
        let mut session = CrawlSession::new(16);
        session.pages.insert("/");
        session.pages.insert("/a");
        session.record_image("/logo.png");
        session.record_not_found("/gone");
        session.record_redirect("/old", "/new");
        session.record_offsite("example.org", None, "/x", "/");
        session.record_offsite("other.net", Some(8080), "/y", "/a");
        session.extremes.record("/", 100, stamp(5));
        session.extremes.record("/a", 900, stamp(20));
        session
    }

    #[test]
    fn test_build_counts_and_urls() {
        let session = populated_session();
        let report = CrawlReport::build("mysite.com", &session, &[true, false]);

        // 2 pages + 1 image + 2 off-site hosts
        assert_eq!(report.total_distinct_urls, 5);
        assert_eq!(report.page_count, 2);
        assert_eq!(report.image_count, 1);

        assert_eq!(report.smallest_page.as_ref().unwrap().url, "http://mysite.com/");
        assert_eq!(report.smallest_page.as_ref().unwrap().bytes, 100);
        assert_eq!(report.largest_page.as_ref().unwrap().url, "http://mysite.com/a");
        assert_eq!(report.oldest_page.as_ref().unwrap().timestamp, stamp(5));
        assert_eq!(report.most_recent_page.as_ref().unwrap().timestamp, stamp(20));

        assert_eq!(report.not_found, vec!["http://mysite.com/gone"]);
    }

    #[test]
    fn test_build_zips_aligned_registries() {
        let session = populated_session();
        let report = CrawlReport::build("mysite.com", &session, &[true, false]);

        assert_eq!(report.redirects.len(), 1);
        assert_eq!(report.redirects[0].source, "http://mysite.com/old");
        assert_eq!(report.redirects[0].destination, "http://mysite.com/new");

        assert_eq!(report.offsite.len(), 2);
        assert_eq!(report.offsite[0].source, "http://mysite.com/");
        assert_eq!(report.offsite[0].destination, "http://example.org/x");
        assert!(report.offsite[0].valid);
        // The recorded port shows up in the rendered destination
        assert_eq!(report.offsite[1].destination, "http://other.net:8080/y");
        assert!(!report.offsite[1].valid);
    }

    #[test]
    fn test_empty_session_builds_an_empty_report() {
        let session = CrawlSession::new(4);
        let report = CrawlReport::build("mysite.com", &session, &[]);

        assert_eq!(report.total_distinct_urls, 0);
        assert!(report.smallest_page.is_none());
        assert!(report.not_found.is_empty());
        assert!(report.offsite.is_empty());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let session = populated_session();
        let report = CrawlReport::build("mysite.com", &session, &[true, false]);

        let json = serde_json::to_string_pretty(&report).unwrap();
        assert!(json.contains("\"total_distinct_urls\": 5"));
        assert!(json.contains("\"http://other.net:8080/y\""));
        assert!(json.contains("\"valid\": false"));
    }
}
