/// Versions accepted on the request line, compared case-insensitively.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["HTTP/1.1", "HTTP/1.0"];

/// A parsed request line.
///
/// Only the first line of a request is ever read. Tokens the client did not
/// send are `None`; nothing beyond token count is validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The method token exactly as sent (e.g. "GET")
    pub method: String,
    /// The request target (e.g. "/docs/")
    pub target: Option<String>,
    /// The protocol version token (e.g. "HTTP/1.1")
    pub version: Option<String>,
}

impl Request {
    /// Whether the method is GET, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::request::Request;
    /// let req = Request { method: "get".to_string(), target: None, version: None };
    /// assert!(req.is_get());
    /// ```
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Returns the version token if it is one the server speaks.
    pub fn supported_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .filter(|v| SUPPORTED_VERSIONS.iter().any(|s| v.eq_ignore_ascii_case(s)))
    }
}
