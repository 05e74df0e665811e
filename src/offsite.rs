// src/offsite.rs
// =============================================================================
// This module validates the off-site hosts discovered during the crawl.
//
// After the main crawl finishes, each distinct off-site host gets exactly
// one lightweight probe: a HEAD request to its root, on the port the link
// specified (or 80 when it didn't). A host is Valid when the probe comes
// back with a recognizable HTTP status-line marker in the bytes.
//
// This phase is best-effort by design: a host that cannot be resolved,
// refuses the connection, or answers with something that isn't HTTP is
// simply marked Invalid. Nothing here can fail the run - the opposite of
// the main crawl's strict error policy.
// =============================================================================

use crate::crawl::session::CrawlSession;
use crate::transport::{Method, Transport};

// Port used when the off-site link did not specify one
const DEFAULT_PORT: u16 = 80;

// Probes every recorded off-site host once, in discovery order
//
// Returns one flag per host, index-aligned with the session's off-site
// registries (the report zips them back together).
pub async fn validate_offsite_hosts<T: Transport>(
    transport: &T,
    session: &CrawlSession,
) -> Vec<bool> {
    let mut flags = Vec::with_capacity(session.offsite_hosts.len());

    for (index, host) in session.offsite_hosts.iter().enumerate() {
        let port = session
            .offsite_ports
            .get(index)
            .copied()
            .flatten()
            .unwrap_or(DEFAULT_PORT);

        let valid = probe_host(transport, host, port).await;
        println!(
            "  Probing {}:{} ... {}",
            host,
            port,
            if valid { "Valid" } else { "Invalid" }
        );
        flags.push(valid);
    }

    flags
}

// One reachability probe; every failure mode collapses to false
async fn probe_host<T: Transport>(transport: &T, host: &str, port: u16) -> bool {
    match transport.fetch(host, port, "/", Method::Head).await {
        Ok(bytes) => bytes.windows(4).any(|window| window == b"HTTP"),
        Err(_) => false,
    }
}
