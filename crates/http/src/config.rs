/// Tunable limits and buffer sizes for the codec and the connection
/// loops built on it.
#[derive(Clone, Copy, Debug)]
pub struct HttpConfig {
    pub(crate) read_buffer_len: usize,
    pub(crate) max_head_len: usize,
    pub(crate) max_headers: usize,
    pub(crate) max_request_body_len: u64,
}

impl HttpConfig {
    /// the number of bytes a single transport read may deliver
    pub fn read_buffer_len(&self) -> usize {
        self.read_buffer_len
    }

    /// the maximum accepted head (start line + headers) length in bytes
    pub fn max_head_len(&self) -> usize {
        self.max_head_len
    }

    /// the maximum accepted number of headers
    pub fn max_headers(&self) -> usize {
        self.max_headers
    }

    /// The largest inbound request `Content-Length` accepted. Requests
    /// declaring more are rejected; the server answers 413.
    pub fn max_request_body_len(&self) -> u64 {
        self.max_request_body_len
    }

    /// chainable setter for [`HttpConfig::read_buffer_len`]
    pub fn with_read_buffer_len(mut self, read_buffer_len: usize) -> Self {
        self.read_buffer_len = read_buffer_len;
        self
    }

    /// chainable setter for [`HttpConfig::max_head_len`]
    pub fn with_max_head_len(mut self, max_head_len: usize) -> Self {
        self.max_head_len = max_head_len;
        self
    }

    /// chainable setter for [`HttpConfig::max_headers`]
    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    /// chainable setter for [`HttpConfig::max_request_body_len`]
    pub fn with_max_request_body_len(mut self, max_request_body_len: u64) -> Self {
        self.max_request_body_len = max_request_body_len;
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        DEFAULT_CONFIG
    }
}

/// the default [`HttpConfig`]
pub const DEFAULT_CONFIG: HttpConfig = HttpConfig {
    read_buffer_len: 8_192,
    max_head_len: 8_192,
    max_headers: 128,
    max_request_body_len: 9_999_999,
};
