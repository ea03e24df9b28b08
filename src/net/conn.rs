use std::io::{self, Read};
use std::net::Shutdown;
use std::os::unix::io::{AsRawFd, RawFd};

use socket2::{Domain, Socket, Type};

use crate::net::abstract_addr;

/// One end of a `SOCK_SEQPACKET` connection. The descriptor is closed on drop.
#[derive(Debug)]
pub struct SeqpacketConn {
    inner: Socket,
}

impl SeqpacketConn {
    /// Connects to an abstract-namespace listener in blocking mode.
    pub fn connect(name: &str) -> io::Result<SeqpacketConn> {
        let addr = abstract_addr(name)?;
        let socket = Socket::new(Domain::UNIX, Type::SEQPACKET, None)?;
        socket.connect(&addr)?;
        Ok(SeqpacketConn { inner: socket })
    }

    pub(crate) fn from_socket(socket: Socket) -> SeqpacketConn {
        SeqpacketConn { inner: socket }
    }

    /// Receives one record. Bytes beyond `buf.len()` are discarded by the kernel.
    pub fn recv(&self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.inner).read(buf)
    }

    /// Sends `buf` as one record. A vanished peer yields `EPIPE`, never `SIGPIPE`.
    pub fn send(&self, buf: &[u8]) -> io::Result<usize> {
        self.inner.send_with_flags(buf, libc::MSG_NOSIGNAL)
    }

    pub fn shutdown(&self, how: Shutdown) -> io::Result<()> {
        self.inner.shutdown(how)
    }

    pub fn get_ref(&self) -> &Socket {
        &self.inner
    }
}

impl AsRawFd for SeqpacketConn {
    fn as_raw_fd(&self) -> RawFd {
        self.inner.as_raw_fd()
    }
}
