//! Request message container.

use http::header::{self, HeaderMap, HeaderValue, IntoHeaderName};
use http::Method;

/// Port substituted when a request names none.
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// An outgoing (or, on the server side, parsed) HTTP request.
///
/// The caller populates method, target, host, headers and body, then calls
/// [`make_start_line`](Self::make_start_line) before handing the request to
/// the client engine for serialization.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    /// Request target: a path like `/items/42?q=1`, or an absolute URL.
    target: String,
    host: String,
    port: Option<u16>,
    headers: HeaderMap,
    content: Vec<u8>,
    start_line: String,
}

impl HttpRequest {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            host: String::new(),
            port: None,
            headers: HeaderMap::new(),
            content: Vec::new(),
            start_line: String::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The request's port, with [`DEFAULT_HTTP_PORT`] substituted when none
    /// was given.
    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_HTTP_PORT)
    }

    /// Record the endpoint and insert the `Host` header.
    ///
    /// A host that is not representable as a header value is skipped here;
    /// resolution rejects it later.
    pub fn set_host(&mut self, host: impl Into<String>, port: Option<u16>) {
        self.host = host.into();
        self.port = port;

        let authority = match port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        };
        if let Ok(value) = HeaderValue::try_from(authority) {
            self.headers.insert(header::HOST, value);
        }
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
            .insert(header::CONTENT_LENGTH, HeaderValue::from(self.content.len()));
    }

    pub(crate) fn push_content(&mut self, bytes: &[u8]) {
        self.content.extend_from_slice(bytes);
    }

    /// Compose the start line from method and target. Must be called before
    /// [`wire_chunks`](Self::wire_chunks).
    pub fn make_start_line(&mut self) {
        self.start_line = format!("{} {} HTTP/1.1\r\n", self.method, self.target);
    }

    pub fn start_line(&self) -> &str {
        &self.start_line
    }

    /// Borrowed gather list ready for the wire; see
    /// [`make_start_line`](Self::make_start_line).
    pub fn wire_chunks(&self) -> Vec<&[u8]> {
        super::wire_chunks(&self.start_line, &self.headers, &self.content)
    }
}

impl Default for HttpRequest {
    fn default() -> Self {
        Self::new(Method::GET, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_line_has_method_target_and_version() {
        let mut request = HttpRequest::new(Method::POST, "/items");
        request.make_start_line();
        assert_eq!(request.start_line(), "POST /items HTTP/1.1\r\n");
    }

    #[test]
    fn set_host_inserts_host_header_with_port() {
        let mut request = HttpRequest::new(Method::GET, "/");
        request.set_host("example.com", Some(8080));
        assert_eq!(request.headers().get(header::HOST).unwrap(), "example.com:8080");
        assert_eq!(request.port_or_default(), 8080);

        request.set_host("example.com", None);
        assert_eq!(request.headers().get(header::HOST).unwrap(), "example.com");
        assert_eq!(request.port_or_default(), DEFAULT_HTTP_PORT);
    }

    #[test]
    fn set_content_tracks_content_length() {
        let mut request = HttpRequest::new(Method::PUT, "/items/1");
        request.set_content(&b"{\"id\":1}"[..]);
        assert_eq!(request.headers().get(header::CONTENT_LENGTH).unwrap(), "8");
    }

    #[test]
    fn wire_chunks_reassemble_into_a_full_message() {
        let mut request = HttpRequest::new(Method::POST, "/items");
        request.set_host("example.com", None);
        request.set_content(&b"abc"[..]);
        request.make_start_line();

        let wire: Vec<u8> = request.wire_chunks().concat();
        let text = String::from_utf8(wire).unwrap();
        assert!(text.starts_with("POST /items HTTP/1.1\r\n"));
        assert!(text.contains("host: example.com\r\n"));
        assert!(text.contains("content-length: 3\r\n"));
        assert!(text.ends_with("\r\n\r\nabc"));
    }
}
