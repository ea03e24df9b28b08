use std::io;

use thiserror::Error;

/// An unrecoverable failure of the listening side, tagged with the system call
/// that produced it.
#[derive(Debug, Error)]
#[error("{op}: {source}")]
pub struct Fatal {
    pub op: &'static str,
    #[source]
    pub source: io::Error,
}

impl Fatal {
    pub fn new(op: &'static str, source: io::Error) -> Fatal {
        Fatal { op, source }
    }

    /// Returns a closure suitable for `map_err` that tags an error with `op`.
    pub(crate) fn tag(op: &'static str) -> impl FnOnce(io::Error) -> Fatal {
        move |source| Fatal::new(op, source)
    }
}
