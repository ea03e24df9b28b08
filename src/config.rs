/// Abstract-namespace name the server binds to.
pub const DEFAULT_NAME: &str = "seqpacket/test";

/// Maximum number of bytes drained from a peer per readiness cycle.
pub const DRAIN_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    /// Name inside the abstract namespace, without the leading NUL.
    pub name: String,
    /// Poll for readiness before every read and write. When false the server
    /// blocks in `accept` and `send` and never drains the peer.
    pub non_blocking: bool,
    /// Pending connection queue length passed to `listen`.
    pub backlog: i32,
    /// Scratch buffer size used when draining inbound data.
    pub drain_len: usize,
}

impl Config {
    pub fn with_name(mut self, name: impl Into<String>) -> Config {
        self.name = name.into();
        self
    }

    pub fn with_non_blocking(mut self, non_blocking: bool) -> Config {
        self.non_blocking = non_blocking;
        self
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            name: DEFAULT_NAME.to_string(),
            non_blocking: true,
            backlog: 0,
            drain_len: DRAIN_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.name, "seqpacket/test");
        assert!(config.non_blocking);
        assert_eq!(config.backlog, 0);
        assert_eq!(config.drain_len, 10);
    }

    #[test]
    fn setters() {
        let config = Config::default()
            .with_name("seqsink/other")
            .with_non_blocking(false);
        assert_eq!(config.name, "seqsink/other");
        assert!(!config.non_blocking);
        assert_eq!(config.backlog, 0);
    }
}
