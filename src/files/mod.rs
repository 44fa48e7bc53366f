//! Filesystem side of request handling: path resolution, state checks and
//! streaming file bodies.

pub mod resolve;
pub mod stream;

pub use resolve::{FileState, ResolveError, ResolvedPath, classify, resolve};
pub use stream::send_file;
