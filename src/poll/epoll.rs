use std::io;
use std::os::unix::io::RawFd;
use std::ptr;

use super::Event;

/// Epoll flags for all possible readability events.
fn read_flags() -> libc::c_int {
    libc::EPOLLIN | libc::EPOLLRDHUP | libc::EPOLLHUP | libc::EPOLLERR | libc::EPOLLPRI
}

/// Epoll flags for all possible writability events.
fn write_flags() -> libc::c_int {
    libc::EPOLLOUT | libc::EPOLLHUP | libc::EPOLLERR
}

pub struct Reactor {
    epoll_fd: RawFd,
}

impl Reactor {
    pub fn new() -> io::Result<Reactor> {
        let epoll_fd = syscall!(epoll_create1(libc::EPOLL_CLOEXEC))?;
        Ok(Reactor { epoll_fd })
    }

    /// Re-arms `fd` for a single notification. The key is the descriptor itself.
    pub fn interest(&self, fd: RawFd, read: bool, write: bool) -> io::Result<()> {
        let mut flags = libc::EPOLLONESHOT;
        if read {
            flags |= read_flags();
        }
        if write {
            flags |= write_flags();
        }

        let mut ev = libc::epoll_event {
            events: flags as _,
            u64: fd as u64,
        };

        syscall!(epoll_ctl(self.epoll_fd, libc::EPOLL_CTL_MOD, fd, &mut ev))?;
        Ok(())
    }

    pub fn insert(&self, fd: RawFd) -> io::Result<()> {
        let mut ev = libc::epoll_event {
            events: libc::EPOLLONESHOT as _,
            u64: fd as u64,
        };

        syscall!(epoll_ctl(self.epoll_fd, libc::EPOLL_CTL_ADD, fd, &mut ev))?;
        Ok(())
    }

    pub fn remove(&self, fd: RawFd) -> io::Result<()> {
        syscall!(epoll_ctl(
            self.epoll_fd,
            libc::EPOLL_CTL_DEL,
            fd,
            ptr::null_mut()
        ))?;
        Ok(())
    }

    /// Waits without a timeout.
    pub fn wait(&self, events: &mut Events) -> io::Result<usize> {
        let res = syscall!(epoll_wait(
            self.epoll_fd,
            events.list.as_mut_ptr(),
            events.list.len() as libc::c_int,
            -1,
        ))?;

        events.len = res as usize;
        Ok(events.len)
    }
}

impl Drop for Reactor {
    fn drop(&mut self) {
        let _ = syscall!(close(self.epoll_fd));
    }
}

/// A list of reported I/O events.
pub struct Events {
    list: Box<[libc::epoll_event]>,
    len: usize,
}

impl Events {
    pub fn new() -> Events {
        let ev = libc::epoll_event { events: 0, u64: 0 };
        let list = vec![ev; 8].into_boxed_slice();
        Events { list, len: 0 }
    }

    /// Yields `(fd, readiness)` for every reported event.
    pub fn iter(&self) -> impl Iterator<Item = (RawFd, Event)> + '_ {
        self.list[..self.len].iter().map(|ev| {
            let flags = ev.events as libc::c_int;
            let key = ev.u64;
            (
                key as RawFd,
                Event {
                    readable: (flags & read_flags()) != 0,
                    writable: (flags & write_flags()) != 0,
                },
            )
        })
    }
}
