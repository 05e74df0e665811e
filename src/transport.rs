// src/transport.rs
// =============================================================================
// This module performs the raw HTTP exchange over TCP.
//
// Key functionality:
// - Formats minimal HTTP/1.0 requests (GET for crawl fetches, HEAD for
//   off-site probes)
// - Connects, writes the request, and reads the reply until the server
//   closes the connection or a fixed byte budget is reached
// - Exposes the exchange behind a Transport trait so the crawl loop can
//   run against a real socket in production and an in-memory fake in tests
//
// We deliberately do NOT use an HTTP client library here: the surveyor
// parses status lines and headers out of the raw bytes itself, so the
// transport's whole job is to hand those bytes over untouched.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

// How many response bytes we keep per fetch. HTTP/1.0 servers close the
// connection after one response, so normally the read stops well before
// this; the budget protects us against a peer that never stops talking.
pub const MAX_RESPONSE_BYTES: usize = 16384;

// The two request methods the surveyor ever sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Full fetch of a page during the main crawl
    Get,
    /// Lightweight reachability probe for off-site hosts
    Head,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }
}

// Formats the request line we put on the wire
//
// HTTP/1.0 with no extra headers: the server replies with one complete
// response and closes the connection, which is exactly the read model
// the rest of the surveyor is built around.
//
// Example: format_request(Method::Get, "/about") == "GET /about HTTP/1.0\r\n\r\n"
pub fn format_request(method: Method, path: &str) -> String {
    format!("{} {} HTTP/1.0\r\n\r\n", method.as_str(), path)
}

// One request/response exchange with a server
//
// The crawl scheduler and the off-site validator both talk to this trait
// rather than to a socket, which is what lets the tests drive them with
// canned responses.
#[async_trait]
pub trait Transport {
    /// Performs exactly one request and returns all bytes received before
    /// the peer closed the connection or the read budget ran out.
    async fn fetch(&self, host: &str, port: u16, path: &str, method: Method) -> Result<Vec<u8>>;
}

// The production transport: one TCP connection per fetch
pub struct TcpTransport {
    max_response_bytes: usize,
}

impl TcpTransport {
    pub fn new() -> Self {
        TcpTransport {
            max_response_bytes: MAX_RESPONSE_BYTES,
        }
    }

    /// Same transport with a custom read budget (used by tests)
    pub fn with_response_limit(max_response_bytes: usize) -> Self {
        TcpTransport { max_response_bytes }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn fetch(&self, host: &str, port: u16, path: &str, method: Method) -> Result<Vec<u8>> {
        // connect() resolves the host name and establishes the connection;
        // either failing is a resource error the caller decides how to treat
        let mut stream = TcpStream::connect((host, port))
            .await
            .with_context(|| format!("failed to connect to {}:{}", host, port))?;

        let request = format_request(method, path);
        stream
            .write_all(request.as_bytes())
            .await
            .with_context(|| format!("failed to send request for {}", path))?;

        // Read until the server closes the connection (HTTP/1.0 behavior)
        // or we hit the byte budget
        let mut response = Vec::new();
        let mut buf = [0u8; 256];
        loop {
            let nbytes = stream
                .read(&mut buf)
                .await
                .with_context(|| format!("failed to read response for {}", path))?;
            if nbytes == 0 {
                break; // peer closed the connection
            }
            let room = self.max_response_bytes - response.len();
            response.extend_from_slice(&buf[..nbytes.min(room)]);
            if response.len() >= self.max_response_bytes {
                break;
            }
        }

        Ok(response)
    }
}
