use std::io;
use std::mem;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::{Buf, BytesMut};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::files::{self, FileState, ResolvedPath};
use crate::http::mime::content_type_for;
use crate::http::parser::{ParseError, parse_request_line, parse_unterminated};
use crate::http::request::Request;
use crate::http::response::{HTTP_VERSION, Response, StatusCode};
use crate::http::writer::{ResponseWriter, send_error};

/// Body written, without any status line, when the target is a directory.
pub const NOT_A_FILE_MESSAGE: &str = "The requested item is not a file. Please try again.";

/// Upper bound on unread client bytes discarded after the response.
const DRAIN_LIMIT: usize = 64 * 1024;
const DRAIN_TIMEOUT: Duration = Duration::from_millis(100);

/// One client connection, served for exactly one request and then closed.
#[derive(Debug)]
pub struct Connection<S> {
    stream: S,
    root: Arc<Path>,
    buffer: BytesMut,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Writing(Reply),
    Closed,
}

/// The single answer a connection will get.
#[derive(Debug)]
pub enum Reply {
    Error(StatusCode),
    /// Plain text, no HTTP framing
    NotAFile,
    File {
        version: String,
        path: ResolvedPath,
        file: File,
        len: u64,
    },
}

impl Reply {
    /// Picks the reply for what the filesystem holds at `path`.
    pub fn for_state(state: io::Result<FileState>, version: &str, path: ResolvedPath) -> Self {
        match state {
            Ok(FileState::Directory) => Reply::NotAFile,
            Ok(FileState::ReadableFile { file, len }) => Reply::File {
                version: version.to_string(),
                path,
                file,
                len,
            },
            Ok(FileState::UnreadableFile) => Reply::Error(StatusCode::Forbidden),
            Ok(FileState::Missing) => Reply::Error(StatusCode::NotFound),
            Err(e) => {
                error!(path = %path.as_path().display(), "Filesystem query failed: {}", e);
                Reply::Error(StatusCode::InternalServerError)
            }
        }
    }
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, root: Arc<Path>) -> Self {
        Self {
            stream,
            root,
            buffer: BytesMut::with_capacity(1024),
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion and always shuts the stream down,
    /// whether or not handling succeeded.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        let result = self.run().await;

        if let Err(e) = self.stream.shutdown().await {
            debug!("Shutdown after response failed: {}", e);
        }
        self.drain().await;

        result
    }

    /// Discards request bytes that were never read, so closing the socket
    /// does not reset it while the client is still reading the response.
    async fn drain(&mut self) {
        let mut scratch = [0u8; 4096];
        let mut drained = 0;

        while drained < DRAIN_LIMIT {
            match timeout(DRAIN_TIMEOUT, self.stream.read(&mut scratch)).await {
                Ok(Ok(n)) if n > 0 => drained += n,
                _ => break,
            }
        }

        if drained > 0 {
            debug!(bytes = drained, "Discarded unread request bytes");
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => match self.read_request().await? {
                    Ok(req) => {
                        self.state = ConnectionState::Dispatching(req);
                    }
                    Err(ParseError::Incomplete) => {
                        anyhow::bail!("connection closed before a request line was received");
                    }
                    Err(e) => {
                        warn!("Rejecting request line: {}", e);
                        self.state = ConnectionState::Writing(Reply::Error(StatusCode::BadRequest));
                    }
                },

                ConnectionState::Dispatching(req) => {
                    let reply = self.dispatch(req).await;
                    self.state = ConnectionState::Writing(reply);
                }

                ConnectionState::Writing(reply) => {
                    self.write_reply(reply).await?;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until a request line is available or the peer stops sending.
    ///
    /// The outer error is I/O; the inner one is a protocol failure.
    pub async fn read_request(&mut self) -> anyhow::Result<Result<Request, ParseError>> {
        loop {
            match parse_request_line(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(Ok(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(Err(e)),
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // Client stopped sending; use what we have
                return Ok(parse_unterminated(&self.buffer));
            }
        }
    }

    async fn dispatch(&self, req: Request) -> Reply {
        if !req.is_get() {
            return Reply::Error(StatusCode::NotImplemented);
        }

        let (Some(target), Some(version)) = (req.target.as_deref(), req.supported_version())
        else {
            debug!(version = ?req.version, "Missing target or unsupported version");
            return Reply::Error(StatusCode::BadRequest);
        };

        let path = match files::resolve(&self.root, target) {
            Ok(path) => path,
            Err(e) => {
                warn!(request_target = %target, "{}", e);
                return Reply::Error(StatusCode::Forbidden);
            }
        };

        let state = files::classify(path.as_path()).await;
        Reply::for_state(state, version, path)
    }

    async fn write_reply(&mut self, reply: Reply) -> anyhow::Result<()> {
        match reply {
            Reply::Error(status) => {
                send_error(status, &mut self.stream).await?;
                info!(
                    status = status.as_u16(),
                    "{} {} {}: {}",
                    HTTP_VERSION,
                    status.as_u16(),
                    status.reason_phrase(),
                    status.explanation()
                );
            }

            Reply::NotAFile => {
                ResponseWriter::raw(NOT_A_FILE_MESSAGE)
                    .write_to_stream(&mut self.stream)
                    .await?;
                info!("Requested item is a directory");
            }

            Reply::File {
                version,
                path,
                file,
                len,
            } => {
                let head = Response::file_head(&version, content_type_for(&path.file_name()), len);
                ResponseWriter::new(&head)
                    .write_to_stream(&mut self.stream)
                    .await?;

                let sent = files::send_file(file, &mut self.stream).await?;
                info!(
                    path = %path.as_path().display(),
                    bytes = sent,
                    "{} 200 OK",
                    version
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> ResolvedPath {
        files::resolve(Path::new("/srv/www"), "/page.html").unwrap()
    }

    fn status_of(reply: Reply) -> Option<StatusCode> {
        match reply {
            Reply::Error(status) => Some(status),
            _ => None,
        }
    }

    #[test]
    fn unreadable_file_is_forbidden() {
        let reply = Reply::for_state(Ok(FileState::UnreadableFile), "HTTP/1.1", resolved());
        assert_eq!(status_of(reply), Some(StatusCode::Forbidden));
    }

    #[test]
    fn missing_file_is_not_found() {
        let reply = Reply::for_state(Ok(FileState::Missing), "HTTP/1.1", resolved());
        assert_eq!(status_of(reply), Some(StatusCode::NotFound));
    }

    #[test]
    fn directory_is_not_a_file() {
        let reply = Reply::for_state(Ok(FileState::Directory), "HTTP/1.1", resolved());
        assert!(matches!(reply, Reply::NotAFile));
    }

    #[test]
    fn query_failure_is_internal_error() {
        let err = io::Error::other("disk on fire");
        let reply = Reply::for_state(Err(err), "HTTP/1.1", resolved());
        assert_eq!(status_of(reply), Some(StatusCode::InternalServerError));
    }

    #[tokio::test]
    async fn readable_file_keeps_version_and_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "12345").unwrap();
        let file = File::open(&path).await.unwrap();

        let state = Ok(FileState::ReadableFile { file, len: 5 });
        let reply = Reply::for_state(state, "HTTP/1.0", resolved());

        match reply {
            Reply::File { version, len, .. } => {
                assert_eq!(version, "HTTP/1.0");
                assert_eq!(len, 5);
            }
            other => panic!("unexpected reply {:?}", other),
        }
    }
}
