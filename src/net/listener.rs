use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use socket2::{Domain, Socket, Type};

use crate::error::Fatal;
use crate::net::{abstract_addr, SeqpacketConn};

/// A `SOCK_SEQPACKET` socket listening on an abstract-namespace name.
#[derive(Debug)]
pub struct SeqpacketListener {
    inner: Socket,
    non_blocking: bool,
}

impl SeqpacketListener {
    /// Creates, binds and listens. Each failing step is reported with the
    /// name of the system call behind it.
    pub fn bind(name: &str, backlog: i32, non_blocking: bool) -> Result<SeqpacketListener, Fatal> {
        // socket2 sets close-on-exec at creation
        let socket = Socket::new(Domain::UNIX, Type::SEQPACKET, None).map_err(Fatal::tag("socket"))?;

        if non_blocking {
            socket.set_nonblocking(true).map_err(Fatal::tag("fcntl"))?;
        }

        let addr = abstract_addr(name).map_err(Fatal::tag("bind"))?;
        socket.bind(&addr).map_err(Fatal::tag("bind"))?;
        socket.listen(backlog).map_err(Fatal::tag("listen"))?;

        Ok(SeqpacketListener {
            inner: socket,
            non_blocking,
        })
    }

    /// Accepts one pending connection.
    ///
    /// Linux does not carry `O_NONBLOCK` over to accepted sockets, so a
    /// non-blocking listener hands out connections switched to non-blocking mode.
    pub fn accept(&self) -> io::Result<SeqpacketConn> {
        let (socket, _) = self.inner.accept()?;
        if self.non_blocking {
            socket.set_nonblocking(true)?;
        }
        Ok(SeqpacketConn::from_socket(socket))
    }

    pub fn is_non_blocking(&self) -> bool {
        self.non_blocking
    }

    pub fn get_ref(&self) -> &Socket {
        &self.inner
    }
}

impl AsRawFd for SeqpacketListener {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}
