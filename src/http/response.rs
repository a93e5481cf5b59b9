//! Response message container.

use http::header::{HeaderMap, HeaderValue, IntoHeaderName, CONTENT_LENGTH};
use http::StatusCode;

/// An HTTP response: parsed off the wire on the client side, built by the
/// dispatcher on the server side.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    content: Vec<u8>,
    start_line: String,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            content: Vec::new(),
            start_line: String::new(),
        }
    }

    /// A headerless response with an empty body, start line ready: the
    /// shape every rejection path sends.
    pub fn empty(status: StatusCode) -> Self {
        let mut response = Self::new(status);
        response.set_content(Vec::new());
        response.make_start_line();
        response
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn set_header<K: IntoHeaderName>(&mut self, name: K, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Store the body and set `Content-Length` accordingly.
    pub fn set_content(&mut self, content: impl Into<Vec<u8>>) {
        self.content = content.into();
        self.headers
            .insert(CONTENT_LENGTH, HeaderValue::from(self.content.len()));
    }

    pub(crate) fn push_content(&mut self, bytes: &[u8]) {
        self.content.extend_from_slice(bytes);
    }

    /// Compose the status line. Must be called before
    /// [`wire_chunks`](Self::wire_chunks).
    pub fn make_start_line(&mut self) {
        self.start_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("")
        );
    }

    /// Borrowed gather list ready for the wire; see
    /// [`make_start_line`](Self::make_start_line).
    pub fn wire_chunks(&self) -> Vec<&[u8]> {
        super::wire_chunks(&self.start_line, &self.headers, &self.content)
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_is_wire_ready() {
        let response = HttpResponse::empty(StatusCode::BAD_REQUEST);
        let wire: Vec<u8> = response.wire_chunks().concat();
        let text = String::from_utf8(wire).unwrap();
        assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(text.contains("content-length: 0\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }
}
