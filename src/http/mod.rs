//! HTTP message model and incremental wire parsing.
//!
//! # Data Flow
//! ```text
//! Client side:
//!     HttpRequest (caller-built)
//!         → wire_chunks() gather list
//!         → transport write
//!     transport reads → parser::ResponseParser → HttpResponse
//!
//! Server side:
//!     transport reads → parser::RequestParser → HttpRequest
//!         → dispatcher → HttpResponse
//!         → wire_chunks() gather list → transport write
//! ```

pub mod parser;
pub mod request;
pub mod response;

pub use request::HttpRequest;
pub use response::HttpResponse;

use http::HeaderMap;

const CRLF: &[u8] = b"\r\n";
const HEADER_SEP: &[u8] = b": ";

/// Gather list over a message's storage: start line, headers, blank line,
/// body. Nothing is copied; the slices alias the message, so the message
/// must stay untouched until the write completes. The borrow enforces
/// that.
pub(crate) fn wire_chunks<'m>(
    start_line: &'m str,
    headers: &'m HeaderMap,
    content: &'m [u8],
) -> Vec<&'m [u8]> {
    let mut chunks = Vec::with_capacity(2 + headers.len() * 4 + 1);
    chunks.push(start_line.as_bytes());
    for (name, value) in headers {
        chunks.push(name.as_str().as_bytes());
        chunks.push(HEADER_SEP);
        chunks.push(value.as_bytes());
        chunks.push(CRLF);
    }
    chunks.push(CRLF);
    if !content.is_empty() {
        chunks.push(content);
    }
    chunks
}
