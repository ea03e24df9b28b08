//! Blocking readiness wait over a single descriptor at a time.

use std::io;
use std::os::unix::io::RawFd;

use cfg_if::cfg_if;

macro_rules! syscall {
    ($fn:ident $args:tt) => {{
        let res = unsafe { libc::$fn $args };
        if res == -1 {
            Err(std::io::Error::last_os_error())
        } else {
            Ok(res)
        }
    }};
}

cfg_if! {
    if #[cfg(any(target_os = "linux", target_os = "android"))] {
        mod epoll;
        use epoll as sys;
    } else {
        compile_error!("abstract-namespace sockets require linux or android");
    }
}

/// Readiness reported for a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Event {
    /// Is the descriptor readable (including hang-up and error)?
    pub readable: bool,
    /// Is the descriptor writable (including hang-up and error)?
    pub writable: bool,
}

/// The readiness a caller is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interest {
    pub read: bool,
    pub write: bool,
}

impl Interest {
    pub const READABLE: Interest = Interest {
        read: true,
        write: false,
    };
    pub const WRITABLE: Interest = Interest {
        read: false,
        write: true,
    };
    pub const BOTH: Interest = Interest {
        read: true,
        write: true,
    };
}

pub struct Poller {
    reactor: sys::Reactor,
}

impl Poller {
    pub fn new() -> io::Result<Poller> {
        Ok(Poller {
            reactor: sys::Reactor::new()?,
        })
    }

    /// Starts tracking `fd`. No interest is armed until `wait_for`.
    pub fn insert(&self, fd: RawFd) -> io::Result<()> {
        self.reactor.insert(fd)
    }

    pub fn remove(&self, fd: RawFd) -> io::Result<()> {
        self.reactor.remove(fd)
    }

    /// Blocks until `fd` is ready for at least one side of `interest`.
    ///
    /// `fd` must have been registered with `insert`. Interrupted waits are
    /// retried; there is no timeout.
    pub fn wait_for(&self, fd: RawFd, interest: Interest) -> io::Result<Event> {
        self.reactor.interest(fd, interest.read, interest.write)?;

        let mut events = sys::Events::new();
        loop {
            match self.reactor.wait(&mut events) {
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }

            let ready = events
                .iter()
                .filter(|(key, _)| *key == fd)
                .fold(None, |acc: Option<Event>, (_, ev)| {
                    let acc = acc.unwrap_or_default();
                    Some(Event {
                        readable: acc.readable || ev.readable,
                        writable: acc.writable || ev.writable,
                    })
                });

            if let Some(ev) = ready {
                return Ok(ev);
            }
        }
    }
}
