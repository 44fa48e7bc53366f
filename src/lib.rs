//! Webroot - concurrent static file server
//!
//! Serves files below a single root directory, one request per connection.

pub mod config;
pub mod files;
pub mod http;
pub mod server;
