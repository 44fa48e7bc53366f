/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): File found and readable
/// - `BadRequest` (400): Malformed request line or unsupported version
/// - `Forbidden` (403): File exists but cannot be read, or the path leaves the root
/// - `NotFound` (404): Nothing exists at the requested path
/// - `InternalServerError` (500): The filesystem could not be queried
/// - `NotImplemented` (501): Any method other than GET
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Maps a numeric code onto the set of error pages.
    ///
    /// Codes the server has no error page for, 200 included, fall back to
    /// `NotImplemented`.
    ///
    /// # Example
    ///
    /// ```
    /// # use webroot::http::response::StatusCode;
    /// assert_eq!(StatusCode::from_u16(404), StatusCode::NotFound);
    /// assert_eq!(StatusCode::from_u16(418), StatusCode::NotImplemented);
    /// assert_eq!(StatusCode::from_u16(200), StatusCode::NotImplemented);
    /// ```
    pub fn from_u16(code: u16) -> Self {
        match code {
            400 => StatusCode::BadRequest,
            403 => StatusCode::Forbidden,
            404 => StatusCode::NotFound,
            500 => StatusCode::InternalServerError,
            _ => StatusCode::NotImplemented,
        }
    }

    /// Returns the numeric HTTP status code.
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// One-line explanation shown on the error page and in the server log.
    pub fn explanation(&self) -> &'static str {
        match self {
            StatusCode::Ok => "",
            StatusCode::BadRequest => "Bad syntax request.",
            StatusCode::Forbidden => "File found. Read permission denied.",
            StatusCode::NotFound => {
                "The resource that you requested does not exist on this server."
            }
            StatusCode::InternalServerError => "Unexpected error in handling the connection.",
            StatusCode::NotImplemented => "Invalid request method.",
        }
    }
}

/// Default protocol version written on status lines.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// A response head plus an in-memory body.
///
/// File bodies are not held here; the handler writes the head from a
/// `Response` with an empty body and then streams the file.
#[derive(Debug)]
pub struct Response {
    /// Protocol version echoed on the status line
    pub version: String,
    /// The HTTP status code
    pub status: StatusCode,
    /// Headers in the order they are written
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use webroot::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .header("Content-Type", "text/plain")
///     .body(b"hi".to_vec())
///     .build();
/// assert_eq!(response.headers[0], ("Content-Type".to_string(), "text/plain".to_string()));
/// ```
#[derive(Debug)]
pub struct ResponseBuilder {
    version: String,
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    /// Creates a new response builder with the specified status code.
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: HTTP_VERSION.to_string(),
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Overrides the protocol version on the status line.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds or replaces a header, keeping its original position on replace.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    pub fn build(self) -> Response {
        Response {
            version: self.version,
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Builds the HTML error page for `status`.
    ///
    /// Every page closes the connection and carries no `Content-Length`.
    /// `Ok` has no error page and renders as 501.
    pub fn error_page(status: StatusCode) -> Self {
        let status = match status {
            StatusCode::Ok => StatusCode::NotImplemented,
            other => other,
        };
        let body = format!(
            "<html><head><title>Error</title></head><body>\r\n\
             <h2>Error: {} {}</h2>\r\n\
             <p>{}</p>\r\n\
             </body></html>\r\n",
            status.as_u16(),
            status.reason_phrase(),
            status.explanation(),
        );

        ResponseBuilder::new(status)
            .header("Connection", "close")
            .header("Content-Type", "text/html")
            .body(body.into_bytes())
            .build()
    }

    /// Builds the head of a 200 response for a file of `len` bytes.
    pub fn file_head(version: &str, content_type: &str, len: u64) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .version(version)
            .header("Connection", "close")
            .header("Content-Type", content_type)
            .header("Content-Length", len.to_string())
            .build()
    }
}
