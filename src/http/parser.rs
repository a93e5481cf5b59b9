//! Incremental HTTP/1.1 message parsing.
//!
//! # Responsibilities
//! - Accumulate head bytes across reads until the head parses completely
//! - Convert the parsed head into `http` types
//! - Collect `Content-Length` bytes of body, then report finished
//!
//! # Design Decisions
//! - Bytes are fed strictly in arrival order; a message split across any
//!   number of feeds parses identically to a single feed
//! - A message without `Content-Length` has an empty body and finishes at
//!   the end of its head (chunked transfer is not handled here)
//! - Bytes beyond the declared length are discarded

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};
use http::{Method, StatusCode};
use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

const MAX_HEADERS: usize = 64;

/// Terminal parse failures. Once `feed` errors, the message is garbage and
/// the transaction aborts.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The start line or a header line is not valid HTTP.
    #[error("malformed message head: {0}")]
    Head(#[from] httparse::Error),

    /// The status code is outside the representable range.
    #[error("invalid status code")]
    Status,

    /// A header name or value is not representable.
    #[error("invalid header")]
    Header,

    /// The request method is not a token.
    #[error("invalid request method")]
    Method,

    /// `Content-Length` is present but not a number.
    #[error("invalid Content-Length")]
    ContentLength,
}

fn content_length_of(headers: &HeaderMap) -> Result<usize, ParseError> {
    match headers.get(CONTENT_LENGTH) {
        None => Ok(0),
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|text| text.trim().parse::<usize>().ok())
            .ok_or(ParseError::ContentLength),
    }
}

fn convert_headers(raw: &[httparse::Header<'_>]) -> Result<HeaderMap, ParseError> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for header in raw {
        let name =
            HeaderName::from_bytes(header.name.as_bytes()).map_err(|_| ParseError::Header)?;
        let value = HeaderValue::from_bytes(header.value).map_err(|_| ParseError::Header)?;
        headers.append(name, value);
    }
    Ok(headers)
}

/// Incremental parser for one response message.
#[derive(Debug, Default)]
pub struct ResponseParser {
    head: Vec<u8>,
    head_done: bool,
    content_length: usize,
    response: HttpResponse,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of received bytes. An error is terminal.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), ParseError> {
        if self.finished() {
            return Ok(());
        }

        if self.head_done {
            self.take_body_from(data.to_vec());
            return Ok(());
        }

        self.head.extend_from_slice(data);

        let parsed = {
            let mut slots = [httparse::EMPTY_HEADER; MAX_HEADERS];
            let mut head = httparse::Response::new(&mut slots);
            match head.parse(&self.head)? {
                httparse::Status::Partial => None,
                httparse::Status::Complete(head_len) => {
                    let code = head.code.ok_or(ParseError::Status)?;
                    let status = StatusCode::from_u16(code).map_err(|_| ParseError::Status)?;
                    Some((head_len, status, convert_headers(head.headers)?))
                }
            }
        };

        if let Some((head_len, status, headers)) = parsed {
            self.content_length = content_length_of(&headers)?;
            self.response.set_status(status);
            *self.response.headers_mut() = headers;
            self.head_done = true;

            let body = self.head.split_off(head_len);
            self.take_body_from(body);
        }
        Ok(())
    }

    fn take_body_from(&mut self, data: Vec<u8>) {
        let missing = self.content_length - self.response.content().len();
        let take = data.len().min(missing);
        self.response.push_content(&data[..take]);
    }

    /// True once the head is complete and the declared body has arrived.
    pub fn finished(&self) -> bool {
        self.head_done && self.response.content().len() >= self.content_length
    }

    /// The parsed message. Meaningful only once [`finished`](Self::finished)
    /// is true; resets the parser.
    pub fn take_response(&mut self) -> HttpResponse {
        std::mem::take(&mut self.response)
    }
}

/// Incremental parser for one request message, used by the server session
/// loop. Same machine as [`ResponseParser`] over a request start line.
#[derive(Debug, Default)]
pub struct RequestParser {
    head: Vec<u8>,
    head_done: bool,
    content_length: usize,
    request: HttpRequest,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of received bytes. An error is terminal.
    pub fn feed(&mut self, data: &[u8]) -> Result<(), ParseError> {
        if self.finished() {
            return Ok(());
        }

        if self.head_done {
            self.take_body_from(data.to_vec());
            return Ok(());
        }

        self.head.extend_from_slice(data);

        let parsed = {
            let mut slots = [httparse::EMPTY_HEADER; MAX_HEADERS];
            let mut head = httparse::Request::new(&mut slots);
            match head.parse(&self.head)? {
                httparse::Status::Partial => None,
                httparse::Status::Complete(head_len) => {
                    let method = head
                        .method
                        .and_then(|name| Method::from_bytes(name.as_bytes()).ok())
                        .ok_or(ParseError::Method)?;
                    let target = head.path.ok_or(ParseError::Method)?.to_string();
                    Some((head_len, method, target, convert_headers(head.headers)?))
                }
            }
        };

        if let Some((head_len, method, target, headers)) = parsed {
            self.content_length = content_length_of(&headers)?;
            self.request = HttpRequest::new(method, target);
            *self.request.headers_mut() = headers;
            self.head_done = true;

            let body = self.head.split_off(head_len);
            self.take_body_from(body);
        }
        Ok(())
    }

    fn take_body_from(&mut self, data: Vec<u8>) {
        let missing = self.content_length - self.request.content().len();
        let take = data.len().min(missing);
        self.request.push_content(&data[..take]);
    }

    /// True once the head is complete and the declared body has arrived.
    pub fn finished(&self) -> bool {
        self.head_done && self.request.content().len() >= self.content_length
    }

    /// The parsed message. Meaningful only once [`finished`](Self::finished)
    /// is true; resets the parser.
    pub fn take_request(&mut self) -> HttpRequest {
        std::mem::take(&mut self.request)
    }
}
