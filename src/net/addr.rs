use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;

use socket2::SockAddr;

/// Builds an `AF_UNIX` address in the abstract namespace.
///
/// The first byte of `sun_path` is NUL and the address length covers exactly
/// the name, with no trailing terminator.
pub fn abstract_addr(name: &str) -> io::Result<SockAddr> {
    let mut path = Vec::with_capacity(name.len() + 1);
    path.push(0);
    path.extend_from_slice(name.as_bytes());
    SockAddr::unix(OsStr::from_bytes(&path))
}
