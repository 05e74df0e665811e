// src/parser/response.rs
// =============================================================================
// This module parses one raw HTTP response into the fields the crawl
// cares about: the status class, the Last-Modified timestamp, and the
// Content-Length.
//
// This is deliberately NOT a general HTTP parser. It looks for three
// literal markers in the byte stream and applies a fixed layout to each.
// Two rules shape the error handling:
// - A response without a recognizable status line cannot be classified
//   at all, so it is an error (and the crawl treats it as fatal)
// - Header extraction only happens for Ok responses; 404s and redirects
//   are bookkept by their status alone
//
// Last-Modified is parsed in strict mode: an Ok page without a parseable
// Last-Modified header aborts the crawl. Content-Length is the lenient
// one: missing or malformed just means "no size known".
// =============================================================================

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;

use crate::parser::scan::{find_from, read_until};

const STATUS_MARKER: &[u8] = b"HTTP/1.";
const MODIFIED_MARKER: &[u8] = b"Last-Modified: ";
const LENGTH_MARKER: &[u8] = b"Content-Length: ";

// Layout of a Last-Modified value after the weekday prefix is stripped:
// "08 Jan 2020 12:15:00 GMT"
const MODIFIED_LAYOUT: &str = "%d %b %Y %H:%M:%S GMT";

// Coarse bucket derived from the numeric status code
//
// The crawler does not distinguish 5xx or other 2xx codes: anything that
// is not a 404 or a 301/302 counts as Ok.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Ok,
    Redirect,
    NotFound,
}

// Everything one fetch produced, ready for the scheduler and extractor
#[derive(Debug)]
pub struct FetchResult {
    pub status: StatusClass,
    /// Present exactly when status is Ok (strict mode guarantees it)
    pub last_modified: Option<NaiveDateTime>,
    /// None when the header is missing or malformed; treated as size 0
    pub content_length: Option<u64>,
    /// The full raw response; the extractor scans this
    pub raw: Vec<u8>,
}

// Parses the raw bytes of one response
//
// Errors here are protocol parse errors: the scheduler propagates them
// and the whole crawl aborts (see the module header for why).
pub fn parse_response(raw: Vec<u8>) -> Result<FetchResult> {
    let status = parse_status(&raw)?;

    // Only Ok pages carry the metadata the report aggregates; redirect
    // and not-found responses are recorded by status alone
    let (last_modified, content_length) = match status {
        StatusClass::Ok => (Some(parse_last_modified(&raw)?), parse_content_length(&raw)),
        StatusClass::Redirect | StatusClass::NotFound => (None, None),
    };

    Ok(FetchResult {
        status,
        last_modified,
        content_length,
        raw,
    })
}

// Finds the status line and buckets its three-digit code
fn parse_status(raw: &[u8]) -> Result<StatusClass> {
    let marker_at =
        find_from(raw, STATUS_MARKER, 0).ok_or_else(|| anyhow!("response has no HTTP status line"))?;

    // The marker is followed by the minor version digit, a space, then
    // the three-digit status code: "HTTP/1.1 200"
    let code_at = marker_at + STATUS_MARKER.len() + 2;
    let code = raw
        .get(code_at..code_at + 3)
        .ok_or_else(|| anyhow!("response status line is truncated"))?;
    if !code.iter().all(u8::is_ascii_digit) {
        return Err(anyhow!("response status code is not numeric"));
    }

    Ok(match code {
        b"404" => StatusClass::NotFound,
        b"301" | b"302" => StatusClass::Redirect,
        _ => StatusClass::Ok,
    })
}

// Extracts and parses the Last-Modified header (strict)
fn parse_last_modified(raw: &[u8]) -> Result<NaiveDateTime> {
    let marker_at = find_from(raw, MODIFIED_MARKER, 0)
        .ok_or_else(|| anyhow!("ok response is missing a Last-Modified header"))?;
    let value_at = marker_at + MODIFIED_MARKER.len();

    let line = read_until(raw, value_at, |byte| byte == b'\r' || byte == b'\n')
        .ok_or_else(|| anyhow!("Last-Modified header is unterminated"))?;
    let text = std::str::from_utf8(line)
        .map_err(|_| anyhow!("Last-Modified header is not valid UTF-8"))?;

    // "Wed, 08 Jan 2020 12:15:00 GMT" -> drop the weekday, keep the rest
    let (_, stamp) = text
        .split_once(", ")
        .ok_or_else(|| anyhow!("Last-Modified header has no weekday prefix: '{}'", text))?;

    NaiveDateTime::parse_from_str(stamp, MODIFIED_LAYOUT)
        .map_err(|err| anyhow!("cannot parse Last-Modified date '{}': {}", stamp, err))
}

// Extracts the Content-Length header (lenient: None on any trouble)
fn parse_content_length(raw: &[u8]) -> Option<u64> {
    let marker_at = find_from(raw, LENGTH_MARKER, 0)?;
    let value_at = marker_at + LENGTH_MARKER.len();

    let digits = read_until(raw, value_at, |byte| !byte.is_ascii_digit())?;
    if digits.is_empty() {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn response(text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    #[test]
    fn test_ok_response_with_all_headers() {
        let result = parse_response(response(
            "HTTP/1.1 200 OK\r\n\
             Last-Modified: Wed, 08 Jan 2020 12:15:00 GMT\r\n\
             Content-Length: 1234\r\n\
             \r\n\
             <html></html>",
        ))
        .unwrap();

        assert_eq!(result.status, StatusClass::Ok);
        let expected = NaiveDate::from_ymd_opt(2020, 1, 8)
            .unwrap()
            .and_hms_opt(12, 15, 0)
            .unwrap();
        assert_eq!(result.last_modified, Some(expected));
        assert_eq!(result.content_length, Some(1234));
    }

    #[test]
    fn test_not_found_skips_header_extraction() {
        // No Last-Modified anywhere; must not be an error because the
        // 404 classification alone settles this fetch
        let result = parse_response(response("HTTP/1.1 404 Not Found\r\n\r\ngone")).unwrap();
        assert_eq!(result.status, StatusClass::NotFound);
        assert_eq!(result.last_modified, None);
        assert_eq!(result.content_length, None);
    }

    #[test]
    fn test_redirect_classification() {
        for code in ["301", "302"] {
            let result = parse_response(response(&format!(
                "HTTP/1.1 {} Moved\r\nLocation: /new\r\n\r\n",
                code
            )))
            .unwrap();
            assert_eq!(result.status, StatusClass::Redirect);
            assert_eq!(result.last_modified, None);
        }
    }

    #[test]
    fn test_other_codes_default_to_ok() {
        // 500 is not special-cased; it needs the Ok headers to parse
        let result = parse_response(response(
            "HTTP/1.1 500 Oops\r\n\
             Last-Modified: Mon, 02 Mar 2020 08:00:00 GMT\r\n\
             \r\n",
        ))
        .unwrap();
        assert_eq!(result.status, StatusClass::Ok);
    }

    #[test]
    fn test_missing_status_line_is_an_error() {
        assert!(parse_response(response("not an http response at all")).is_err());
    }

    #[test]
    fn test_unparseable_date_is_an_error() {
        let result = parse_response(response(
            "HTTP/1.1 200 OK\r\n\
             Last-Modified: Wed, 08 Floop 2020 12:15:00 GMT\r\n\
             \r\n",
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_last_modified_on_ok_is_an_error() {
        assert!(parse_response(response("HTTP/1.1 200 OK\r\n\r\nbody")).is_err());
    }

    #[test]
    fn test_missing_content_length_is_tolerated() {
        let result = parse_response(response(
            "HTTP/1.1 200 OK\r\n\
             Last-Modified: Wed, 08 Jan 2020 12:15:00 GMT\r\n\
             \r\n",
        ))
        .unwrap();
        assert_eq!(result.content_length, None);
    }

    #[test]
    fn test_malformed_content_length_is_tolerated() {
        let result = parse_response(response(
            "HTTP/1.1 200 OK\r\n\
             Last-Modified: Wed, 08 Jan 2020 12:15:00 GMT\r\n\
             Content-Length: soon\r\n\
             \r\n",
        ))
        .unwrap();
        assert_eq!(result.content_length, None);
    }
}
