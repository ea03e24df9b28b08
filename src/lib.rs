//! A `SOCK_SEQPACKET` sink server.
//!
//! Binds one abstract-namespace endpoint, serves a single peer at a time,
//! discards whatever the peer sends and writes a fixed sentinel record until
//! the peer goes away.

pub mod config;
pub mod error;
pub mod net;
pub mod payload;
pub mod poll;
pub mod server;
pub mod trace;

pub use config::Config;
pub use error::Fatal;
pub use net::{SeqpacketConn, SeqpacketListener};
pub use server::{Disconnect, Server};
