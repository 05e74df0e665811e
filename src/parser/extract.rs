// src/parser/extract.rs
// =============================================================================
// This module extracts link and image references from a response body.
//
// The scan is a single left-to-right pass over the raw bytes looking for
// two literal markers: `<a href="` and `<img src="`. Whatever sits inside
// the quoted attribute value is the raw reference; three named rules turn
// it into a classified LinkReference:
//
// - Directory-sibling resolution: a reference that does not start with '/'
//   is resolved against the directory of the page it appeared on
//   ("logo.png" on /blog/post1 becomes /blog/logo.png)
// - Protocol-relative host splitting: a reference containing "//" names a
//   host explicitly; the host is the text between the "//" and the next
//   '/', ':', or the end of the value
// - Host comparison is case-sensitive against the crawl's own host name;
//   anything else is off-site
//
// The extractor only classifies. Registry and frontier updates belong to
// the scheduler, so scanning the same body twice yields the same sequence.
// =============================================================================

use crate::parser::scan::{find_from, read_until};

const ANCHOR_MARKER: &[u8] = b"<a href=\"";
const IMAGE_MARKER: &[u8] = b"<img src=\"";

// Runaway-scan guard for malformed bodies; matches the transport's read
// budget, so a well-formed fetch is never cut short by it
const MAX_SCAN_BYTES: usize = 16384;

// One classified reference found in a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkReference {
    /// A page on the crawled host, as a rooted path
    Page { path: String },
    /// An image on the crawled host, as a rooted path
    Image { path: String },
    /// A link to a different host
    OffSite {
        host: String,
        /// None means unspecified: default to 80 when probing
        port: Option<u16>,
        path: String,
    },
}

// Scans a body and returns every reference in body order
//
// Parameters:
//   body: raw response bytes (headers included; the markers only occur
//         in HTML, so scanning the whole buffer is safe)
//   current_path: the rooted path this body was fetched from
//   own_host: the crawl's configured host name
pub fn extract_references(body: &[u8], current_path: &str, own_host: &str) -> Vec<LinkReference> {
    let mut references = Vec::new();
    let mut cursor = 0;

    loop {
        let next_anchor = find_from(body, ANCHOR_MARKER, cursor);
        let next_image = find_from(body, IMAGE_MARKER, cursor);

        // Advance to whichever marker occurs first; neither means done
        let (marker_at, marker, is_image) = match (next_anchor, next_image) {
            (Some(anchor_at), Some(image_at)) if image_at < anchor_at => {
                (image_at, IMAGE_MARKER, true)
            }
            (Some(anchor_at), _) => (anchor_at, ANCHOR_MARKER, false),
            (None, Some(image_at)) => (image_at, IMAGE_MARKER, true),
            (None, None) => break,
        };
        if marker_at > MAX_SCAN_BYTES {
            break;
        }

        let value_at = marker_at + marker.len();
        let raw_value = match read_until(body, value_at, |byte| byte == b'"') {
            Some(value) => value,
            // Unterminated attribute: nothing trustworthy past this point
            None => break,
        };
        let value = String::from_utf8_lossy(raw_value);

        if is_image {
            references.push(LinkReference::Image {
                path: resolve_sibling(current_path, &value),
            });
        } else {
            references.push(classify_anchor(&value, current_path, own_host));
        }

        cursor = value_at + raw_value.len() + 1; // past the closing quote
    }

    references
}

// Directory-sibling resolution, shared by images and plain anchors
//
// A rooted reference is used as-is. Anything else is appended to the
// directory of the current path: everything up to and including its
// last '/'.
fn resolve_sibling(current_path: &str, reference: &str) -> String {
    if reference.starts_with('/') {
        return reference.to_string();
    }
    // current_path is always rooted, so there is always a '/' to find
    let directory_end = current_path.rfind('/').map(|at| at + 1).unwrap_or(1);
    format!("{}{}", &current_path[..directory_end], reference)
}

// Classifies one anchor value as on-site or off-site
fn classify_anchor(value: &str, current_path: &str, own_host: &str) -> LinkReference {
    let Some(protocol_at) = value.find("//") else {
        // No protocol marker: already relative (or rooted) on our host
        return LinkReference::Page {
            path: resolve_sibling(current_path, value),
        };
    };

    // "http://host:port/path" -> split at the "//", then walk the host
    let after_protocol = &value[protocol_at + 2..];
    let host_end = after_protocol
        .find(|ch| ch == '/' || ch == ':')
        .unwrap_or(after_protocol.len());
    let host = &after_protocol[..host_end];
    let rest = &after_protocol[host_end..];

    let (port, path_part) = if let Some(port_text) = rest.strip_prefix(':') {
        let port_end = port_text.find('/').unwrap_or(port_text.len());
        (
            port_text[..port_end].parse::<u16>().ok(),
            &port_text[port_end..],
        )
    } else {
        (None, rest)
    };

    // A bare host links to its root
    let path = if path_part.is_empty() {
        "/".to_string()
    } else {
        path_part.to_string()
    };

    if host == own_host {
        LinkReference::Page { path }
    } else {
        LinkReference::OffSite {
            host: host.to_string(),
            port,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> LinkReference {
        LinkReference::Page {
            path: path.to_string(),
        }
    }

    fn image(path: &str) -> LinkReference {
        LinkReference::Image {
            path: path.to_string(),
        }
    }

    #[test]
    fn test_rooted_anchor() {
        let refs = extract_references(br#"<a href="/about">About</a>"#, "/", "mysite.com");
        assert_eq!(refs, vec![page("/about")]);
    }

    #[test]
    fn test_relative_anchor_resolves_as_sibling() {
        let refs = extract_references(br#"<a href="part2.html">"#, "/blog/part1.html", "mysite.com");
        assert_eq!(refs, vec![page("/blog/part2.html")]);
    }

    #[test]
    fn test_image_sibling_resolution() {
        let refs = extract_references(br#"<img src="logo.png">"#, "/blog/post1", "mysite.com");
        assert_eq!(refs, vec![image("/blog/logo.png")]);
    }

    #[test]
    fn test_rooted_image_is_kept_as_is() {
        let refs = extract_references(br#"<img src="/static/logo.png">"#, "/blog/post1", "mysite.com");
        assert_eq!(refs, vec![image("/static/logo.png")]);
    }

    #[test]
    fn test_offsite_anchor_without_port() {
        let refs = extract_references(br#"<a href="//example.org/x">"#, "/", "mysite.com");
        assert_eq!(
            refs,
            vec![LinkReference::OffSite {
                host: "example.org".to_string(),
                port: None,
                path: "/x".to_string(),
            }]
        );
    }

    #[test]
    fn test_offsite_anchor_with_port_and_full_protocol() {
        let refs = extract_references(
            br#"<a href="http://example.org:8080/docs">"#,
            "/",
            "mysite.com",
        );
        assert_eq!(
            refs,
            vec![LinkReference::OffSite {
                host: "example.org".to_string(),
                port: Some(8080),
                path: "/docs".to_string(),
            }]
        );
    }

    #[test]
    fn test_bare_offsite_host_defaults_to_root_path() {
        let refs = extract_references(br#"<a href="http://example.org">"#, "/", "mysite.com");
        assert_eq!(
            refs,
            vec![LinkReference::OffSite {
                host: "example.org".to_string(),
                port: None,
                path: "/".to_string(),
            }]
        );
    }

    #[test]
    fn test_protocol_link_to_own_host_is_onsite() {
        let refs = extract_references(br#"<a href="http://mysite.com/inner">"#, "/", "mysite.com");
        assert_eq!(refs, vec![page("/inner")]);
    }

    #[test]
    fn test_host_comparison_is_case_sensitive() {
        let refs = extract_references(br#"<a href="http://MySite.com/">"#, "/", "mysite.com");
        assert!(matches!(refs[0], LinkReference::OffSite { .. }));
    }

    #[test]
    fn test_references_come_back_in_body_order() {
        let body = br#"
            <img src="banner.png">
            <a href="/first">
            <a href="//example.org/away">
            <img src="/footer.png">
        "#;
        let refs = extract_references(body, "/", "mysite.com");
        assert_eq!(
            refs,
            vec![
                image("/banner.png"),
                page("/first"),
                LinkReference::OffSite {
                    host: "example.org".to_string(),
                    port: None,
                    path: "/away".to_string(),
                },
                image("/footer.png"),
            ]
        );
    }

    #[test]
    fn test_unterminated_attribute_stops_the_scan() {
        let refs = extract_references(br#"<a href="/ok"> <a href="/broken"#, "/", "mysite.com");
        assert_eq!(refs, vec![page("/ok")]);
    }

    #[test]
    fn test_scan_is_idempotent() {
        let body = br#"<a href="/a"> <img src="pic.png"> <a href="//example.org/b">"#;
        let first = extract_references(body, "/page", "mysite.com");
        let second = extract_references(body, "/page", "mysite.com");
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_references_in_plain_body() {
        assert!(extract_references(b"just some text", "/", "mysite.com").is_empty());
    }
}
