use crate::{
    Body, Error, Headers, HttpConfig, Method, Parse, Result, Uri, Version,
    parse::{content_length, headers_from, map_head_error, version_from},
    util::encoding,
};
use std::{
    fmt::{self, Formatter},
    io::Write,
};

/// An http request: method, percent-encoded request-target, version,
/// headers, and a [`Body`].
///
/// The optional scheme is not part of the wire format; the client uses
/// it to choose between plain and TLS transports.
#[derive(Debug)]
pub struct Request {
    method: Method,
    target: String,
    scheme: Option<String>,
    version: Version,
    headers: Headers,
    body: Body,
}

impl Request {
    /// constructs a request for a server-side target such as `/foo`,
    /// with no headers and an empty body
    pub fn new(method: impl Into<Method>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
            scheme: None,
            version: Version::default(),
            headers: Headers::new(),
            body: Body::empty(),
        }
    }

    /// Constructs a request from a full [`Uri`]: the request-target
    /// becomes the uri's path-and-query, the scheme is retained for
    /// transport selection, and a `Host: host[:port]` header is set.
    pub fn from_uri(method: impl Into<Method>, uri: &Uri) -> Self {
        let mut request = Self::new(method, uri.to_path_string());
        request.scheme = Some(uri.scheme.clone());
        let mut host = uri.host.clone();
        if !uri.port.is_empty() {
            host.push(':');
            host.push_str(&uri.port);
        }
        request.headers.insert("Host", host);
        request
    }

    /// the request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// the request-target as it appears on the request line
    pub fn target(&self) -> &str {
        &self.target
    }

    /// the scheme this request should travel over, if one was given
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// sets the scheme used for transport selection
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = Some(scheme.into());
    }

    /// the http version from the request line
    pub fn version(&self) -> Version {
        self.version
    }

    /// a read-only reference to the request headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// a mutable reference to the request headers
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// a read-only reference to the request body
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// a mutable reference to the request body
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Sets a fixed body, along with `Content-Type` and
    /// `Content-Length` headers.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>, content_type: &str) {
        let content = body.into();
        self.headers.insert("Content-Type", content_type);
        self.headers
            .insert("Content-Length", content.len().to_string());
        self.body = Body::fixed(content);
    }

    /// Sets a chunked body from a producer function, along with a
    /// `Content-Type` header. No `Content-Length` is set; on the wire,
    /// chunked output is framed by closing the connection.
    pub fn set_chunked_body(
        &mut self,
        produce: impl FnMut() -> Option<Vec<u8>> + Send + Sync + 'static,
        content_type: &str,
    ) {
        self.headers.insert("Content-Type", content_type);
        self.headers.remove("Content-Length");
        self.body = Body::from_chunk_fn(produce);
    }

    /// drains a chunked body into fixed content and borrows it. see
    /// [`Body::gather`]
    pub fn gather_body(&mut self) -> &[u8] {
        self.body.gather()
    }

    /// the body decoded as text, using the `Content-Type` charset when
    /// one is declared
    pub fn body_string(&mut self) -> String {
        let encoding = encoding(&self.headers);
        let (decoded, _, _) = encoding.decode(self.body.gather());
        decoded.into_owned()
    }

    /// serializes the request line and headers, terminated by the
    /// blank line
    pub fn write_head(&self, buf: &mut Vec<u8>) -> Result<()> {
        write!(buf, "{} {} {}\r\n{}\r\n", self.method, self.target, self.version, self.headers)?;
        Ok(())
    }

    /// # Serializes the whole request
    ///
    /// # Panics
    ///
    /// Panics on a chunked body; outbound request bodies are always
    /// fixed-length, so gather first.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(128);
        self.write_head(&mut buf).expect("writing to a vec cannot fail");
        buf.extend_from_slice(self.body.bytes());
        buf
    }

    /// # Parses one request from the front of `buf`
    ///
    /// Returns [`Parse::Partial`] while the buffer holds only a prefix
    /// of the message. `\r\n` and bare `\n` line endings are both
    /// accepted. A request without a `Content-Length` header has no
    /// body; one with a `Content-Length` beyond
    /// [`max_request_body_len`][HttpConfig::max_request_body_len] is
    /// rejected with [`Error::RequestBodyTooLong`].
    ///
    /// # Errors
    ///
    /// Any error means the input can never become a valid request and
    /// the connection should be dropped (after a 400 or 413, at the
    /// server's discretion).
    pub fn parse(buf: &[u8], config: &HttpConfig) -> Result<Parse<Self>> {
        let mut headers = vec![httparse::EMPTY_HEADER; config.max_headers()];
        let mut head = httparse::Request::new(&mut headers);

        let head_len = match head.parse(buf).map_err(map_head_error)? {
            httparse::Status::Complete(head_len) => head_len,
            httparse::Status::Partial => {
                return if buf.len() > config.max_head_len() {
                    Err(Error::HeadersTooLong)
                } else {
                    Ok(Parse::Partial)
                };
            }
        };
        if head_len > config.max_head_len() {
            return Err(Error::HeadersTooLong);
        }

        let method = Method::from(head.method.ok_or(Error::MissingMethod)?);
        let target = head.path.ok_or(Error::InvalidHead)?.to_string();
        let version = version_from(head.version)?;
        let request_headers = headers_from(head.headers)?;

        let body_len = match content_length(&request_headers)? {
            Some(length) if length > config.max_request_body_len() => {
                return Err(Error::RequestBodyTooLong(length));
            }
            Some(length) => length as usize,
            None => 0,
        };
        if buf.len() < head_len + body_len {
            return Ok(Parse::Partial);
        }
        let body = if body_len == 0 {
            Body::empty()
        } else {
            Body::fixed(buf[head_len..head_len + body_len].to_vec())
        };

        log::trace!("received request head: {method} {target} {version}");

        Ok(Parse::Complete {
            message: Self {
                method,
                target,
                scheme: None,
                version,
                headers: request_headers,
                body,
            },
            consumed: head_len + body_len,
        })
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\r\n{}\r\n",
            self.method, self.target, self.version, self.headers
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::DEFAULT_CONFIG;

    fn parse(input: &[u8]) -> Result<Parse<Request>> {
        Request::parse(input, &DEFAULT_CONFIG)
    }

    #[test]
    fn get_without_body() {
        let raw = b"GET /foo/bar HTTP/1.1\r\nHost: example.org\r\n\r\n";
        let (request, consumed) = parse(raw).unwrap().unwrap_complete();
        assert_eq!(consumed, raw.len());
        assert_eq!(request.method(), &Method::get());
        assert_eq!(request.target(), "/foo/bar");
        assert_eq!(request.version(), Version::Http1_1);
        assert_eq!(request.headers().get_str("Host"), Some("example.org"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn every_prefix_is_partial() {
        let raw = b"POST /submit HTTP/1.0\r\nContent-Length: 5\r\n\r\nhello";
        for len in 0..raw.len() {
            assert!(
                matches!(parse(&raw[..len]), Ok(Parse::Partial)),
                "prefix of {len} bytes should be partial"
            );
        }
        let (request, consumed) = parse(raw).unwrap().unwrap_complete();
        assert_eq!(consumed, raw.len());
        assert_eq!(request.body().bytes(), b"hello");
        assert_eq!(request.version(), Version::Http1_0);
    }

    #[test]
    fn pipelined_tail_is_not_consumed() {
        let raw = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";
        let (request, consumed) = parse(raw).unwrap().unwrap_complete();
        assert_eq!(request.target(), "/a");
        let (second, _) = parse(&raw[consumed..]).unwrap().unwrap_complete();
        assert_eq!(second.target(), "/b");
    }

    #[test]
    fn bare_newlines_are_accepted() {
        let raw = b"GET / HTTP/1.1\nHost: sla\n\n";
        let (request, _) = parse(raw).unwrap().unwrap_complete();
        assert_eq!(request.headers().get_str("Host"), Some("sla"));
    }

    #[test]
    fn unsupported_version_is_invalid() {
        assert!(parse(b"GET / HTTP/4.2\r\n\r\n").is_err());
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(parse(b"\0\0\0\0\r\n\r\n").is_err());
    }

    #[test]
    fn header_line_without_colon_is_invalid() {
        assert!(parse(b"GET / HTTP/1.1\r\nnot a header\r\n\r\n").is_err());
    }

    #[test]
    fn duplicate_headers_collapse_to_last() {
        let raw = b"GET / HTTP/1.1\r\nX-Tag: one\r\nX-Tag: two\r\n\r\n";
        let (request, _) = parse(raw).unwrap().unwrap_complete();
        assert_eq!(request.headers().get_str("X-Tag"), Some("two"));
    }

    #[test]
    fn content_length_over_ceiling_is_rejected() {
        let raw = b"PUT /big HTTP/1.1\r\nContent-Length: 10000000\r\n\r\n";
        assert!(matches!(
            parse(raw),
            Err(Error::RequestBodyTooLong(10_000_000))
        ));
    }

    #[test]
    fn content_length_ceiling_is_configurable() {
        let config = DEFAULT_CONFIG.with_max_request_body_len(4);
        let raw = b"PUT / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        assert!(matches!(
            Request::parse(raw, &config),
            Err(Error::RequestBodyTooLong(5))
        ));
    }

    #[test]
    fn serialization_round_trips() {
        let mut request = Request::new("PUT", "/res");
        request.set_body("content", "text/plain");
        let raw = request.to_bytes();
        let (parsed, consumed) = parse(&raw).unwrap().unwrap_complete();
        assert_eq!(consumed, raw.len());
        assert_eq!(parsed.method(), &Method::put());
        assert_eq!(parsed.target(), "/res");
        assert_eq!(parsed.body().bytes(), b"content");
        assert_eq!(
            parsed.headers().get_str("Content-Type"),
            Some("text/plain")
        );
        assert_eq!(parsed.headers().get_str("Content-Length"), Some("7"));
    }

    #[test]
    fn from_uri_sets_host_and_scheme() {
        let uri = Uri::parse("http://example.org:1337/foo/bar").unwrap();
        let request = Request::from_uri("GET", &uri);
        assert_eq!(request.target(), "/foo/bar");
        assert_eq!(request.scheme(), Some("http"));
        assert_eq!(
            request.headers().get_str("Host"),
            Some("example.org:1337")
        );
    }
}
