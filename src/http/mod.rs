//! HTTP protocol implementation.
//!
//! The server speaks a deliberately small subset of HTTP/1.x: one request
//! line per connection, GET only, and the connection is closed after the
//! response.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection request handler state machine
//! - **`parser`**: Parses the request line from a byte buffer
//! - **`request`**: Request line representation
//! - **`response`**: Status codes, response builder and error pages
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Content type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for the request line
//!        └──────┬──────┘
//!               │ Request line received (malformed → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Dispatching    │ ← Method, version, path and file checks
//!        └──────┬───────────┘
//!               │ 200 / 400 / 403 / 404 / 500 / 501 / not-a-file
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send the one response
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use std::sync::Arc;
//! use webroot::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:50500").await?;
//!     let root: Arc<Path> = Arc::from(Path::new("/var/www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let root = Arc::clone(&root);
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, root).serve().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
