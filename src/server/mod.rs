//! Connection dispatch: the listening socket and one task per client.

pub mod listener;

pub use listener::Server;
