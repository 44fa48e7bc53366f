use std::fmt;

use crate::http::request::Request;

/// Longest request line accepted, including any blank lines before it.
pub const MAX_REQUEST_LINE: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// No complete request line yet
    Incomplete,
    /// More than method, target and version on the request line
    TooManyTokens,
    LineTooLong,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Incomplete => f.write_str("incomplete request line"),
            ParseError::TooManyTokens => f.write_str("too many tokens on request line"),
            ParseError::LineTooLong => {
                write!(f, "request line longer than {} bytes", MAX_REQUEST_LINE)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses the first non-blank, newline-terminated line in `buf`.
///
/// Returns the request and the number of bytes consumed, blank lines included.
pub fn parse_request_line(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let mut start = 0;

    loop {
        let Some(end) = find_line_end(&buf[start..]) else {
            if buf.len() > MAX_REQUEST_LINE {
                return Err(ParseError::LineTooLong);
            }
            return Err(ParseError::Incomplete);
        };

        let line = &buf[start..start + end];
        let consumed = start + end + 1;

        if is_blank(line) {
            start = consumed;
            continue;
        }

        if consumed > MAX_REQUEST_LINE {
            return Err(ParseError::LineTooLong);
        }

        return parse_tokens(line).map(|request| (request, consumed));
    }
}

/// Parses whatever is buffered once the peer has stopped sending.
///
/// A trailing line without `\n` counts as the request line.
pub fn parse_unterminated(buf: &[u8]) -> Result<Request, ParseError> {
    match parse_request_line(buf) {
        Ok((request, _)) => Ok(request),
        Err(ParseError::Incomplete) => {
            let tail_start = buf
                .iter()
                .rposition(|&b| b == b'\n')
                .map_or(0, |pos| pos + 1);
            let tail = &buf[tail_start..];
            if is_blank(tail) {
                return Err(ParseError::Incomplete);
            }
            parse_tokens(tail)
        }
        Err(e) => Err(e),
    }
}

fn parse_tokens(line: &[u8]) -> Result<Request, ParseError> {
    let line = String::from_utf8_lossy(line);
    let mut parts = line.split_ascii_whitespace();

    let method = parts.next().ok_or(ParseError::Incomplete)?;
    let target = parts.next();
    let version = parts.next();

    if parts.next().is_some() {
        return Err(ParseError::TooManyTokens);
    }

    Ok(Request {
        method: method.to_string(),
        target: target.map(str::to_string),
        version: version.map(str::to_string),
    })
}

fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}
