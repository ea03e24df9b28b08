use std::convert::Infallible;
use std::fmt;
use std::io;
use std::os::unix::io::AsRawFd;

use tracing::{debug, info, trace, warn};

use crate::config::Config;
use crate::error::Fatal;
use crate::net::{SeqpacketConn, SeqpacketListener};
use crate::payload::{SENTINEL, SENTINEL_LEN};
use crate::poll::{Interest, Poller};

/// Why a connection cycle ended. Every variant leaves the server ready to
/// accept the next peer.
#[derive(Debug)]
pub enum Disconnect {
    /// The peer shut down its write side (a zero-length read).
    EndOfFile,
    /// Draining the peer failed.
    ReadFailed(io::Error),
    /// The payload went out incomplete. Not retried.
    ShortWrite { written: usize },
    /// Sending the payload failed.
    WriteFailed(io::Error),
    /// No connection was established: `accept` failed with a transient error.
    AcceptFailed(io::Error),
}

impl fmt::Display for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disconnect::EndOfFile => write!(f, "read: end of file"),
            Disconnect::ReadFailed(err) => write!(f, "read: {}", err),
            Disconnect::ShortWrite { written } => {
                write!(f, "write: short write ({} of {} bytes)", written, SENTINEL_LEN)
            }
            Disconnect::WriteFailed(err) => write!(f, "write: {}", err),
            Disconnect::AcceptFailed(err) => write!(f, "accept: {}", err),
        }
    }
}

/// Serves one peer at a time, writing the sentinel record until it goes away.
pub struct Server {
    config: Config,
    listener: SeqpacketListener,
    /// Present only in non-blocking mode.
    poller: Option<Poller>,
}

impl Server {
    pub fn start(config: Config) -> Result<Server, Fatal> {
        let listener = SeqpacketListener::bind(&config.name, config.backlog, config.non_blocking)?;

        let poller = if config.non_blocking {
            let poller = Poller::new().map_err(Fatal::tag("epoll_create"))?;
            poller
                .insert(listener.as_raw_fd())
                .map_err(Fatal::tag("epoll_ctl"))?;
            Some(poller)
        } else {
            None
        };

        info!(
            name = %config.name,
            non_blocking = config.non_blocking,
            backlog = config.backlog,
            "listening"
        );

        Ok(Server {
            config,
            listener,
            poller,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accepts and serves connections forever. Returns only on a fatal error.
    pub fn run(&self) -> Result<Infallible, Fatal> {
        loop {
            self.serve_next()?;
        }
    }

    /// Waits for one peer, serves it until it disconnects and closes it.
    pub fn serve_next(&self) -> Result<Disconnect, Fatal> {
        if let Some(poller) = &self.poller {
            poller
                .wait_for(self.listener.as_raw_fd(), Interest::READABLE)
                .map_err(Fatal::tag("epoll_wait"))?;
        }

        let conn = match self.listener.accept() {
            Ok(conn) => conn,
            Err(err) if is_transient_accept_error(&err) => {
                warn!("accept: {}", err);
                return Ok(Disconnect::AcceptFailed(err));
            }
            Err(err) => return Err(Fatal::new("accept", err)),
        };
        debug!(fd = conn.as_raw_fd(), "accepted");

        let reason = match &self.poller {
            Some(poller) => self.serve_polled(poller, &conn),
            None => Ok(self.serve_blocking(&conn)),
        }?;

        match &reason {
            Disconnect::EndOfFile => info!("{}", reason),
            _ => warn!("{}", reason),
        }
        debug!(fd = conn.as_raw_fd(), "closing");
        Ok(reason)
    }

    fn serve_polled(&self, poller: &Poller, conn: &SeqpacketConn) -> Result<Disconnect, Fatal> {
        let fd = conn.as_raw_fd();
        poller.insert(fd).map_err(Fatal::tag("epoll_ctl"))?;

        let reason = self.poll_loop(poller, conn);

        // deregister before the descriptor is closed and its number reused
        if let Err(err) = poller.remove(fd) {
            debug!(fd, "epoll_ctl: {}", err);
        }
        reason
    }

    fn poll_loop(&self, poller: &Poller, conn: &SeqpacketConn) -> Result<Disconnect, Fatal> {
        let fd = conn.as_raw_fd();
        let mut scratch = vec![0u8; self.config.drain_len];

        loop {
            let ev = poller
                .wait_for(fd, Interest::BOTH)
                .map_err(Fatal::tag("epoll_wait"))?;
            trace!(fd, readable = ev.readable, writable = ev.writable, "ready");

            if ev.readable {
                match conn.recv(&mut scratch) {
                    Ok(0) => return Ok(Disconnect::EndOfFile),
                    Ok(n) => trace!(fd, n, "drained"),
                    Err(err) if is_retryable(&err) => {}
                    Err(err) => return Ok(Disconnect::ReadFailed(err)),
                }
            }

            if !ev.writable {
                continue;
            }

            match conn.send(&SENTINEL) {
                Ok(n) if n == SENTINEL_LEN => {}
                Ok(n) => return Ok(Disconnect::ShortWrite { written: n }),
                Err(err) if is_retryable(&err) => {}
                Err(err) => return Ok(Disconnect::WriteFailed(err)),
            }
        }
    }

    fn serve_blocking(&self, conn: &SeqpacketConn) -> Disconnect {
        loop {
            match conn.send(&SENTINEL) {
                Ok(n) if n == SENTINEL_LEN => {}
                Ok(n) => return Disconnect::ShortWrite { written: n },
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Disconnect::WriteFailed(err),
            }
        }
    }
}

fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

/// Errors after which the listener is still usable.
fn is_transient_accept_error(err: &io::Error) -> bool {
    if is_retryable(err) {
        return true;
    }
    matches!(
        err.raw_os_error(),
        Some(libc::ECONNABORTED)
            | Some(libc::EPROTO)
            | Some(libc::EMFILE)
            | Some(libc::ENFILE)
            | Some(libc::ENOBUFS)
            | Some(libc::ENOMEM)
    )
}
